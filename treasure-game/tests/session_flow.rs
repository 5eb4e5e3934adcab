use treasure_game::{
    AchievementId, GameConfig, GameContent, ManualClock, MemoryStore, SessionError,
    TreasureSession,
};

const BUNDLED_CONTENT: &str =
    include_str!("../../treasure-web/static/assets/data/game-content.json");

const HOTEL: [(&str, usize); 6] = [
    ("reception-desk", 0),
    ("bellhop", 1),
    ("room-key", 0),
    ("luggage-cart", 1),
    ("concierge", 1),
    ("elevator", 0),
];

const RESTAURANT: [(&str, usize); 6] = [
    ("menu", 1),
    ("waiter", 0),
    ("bill", 0),
    ("tip-jar", 1),
    ("reservation", 1),
    ("specials-board", 1),
];

fn content() -> GameContent {
    GameContent::from_json(BUNDLED_CONTENT).expect("bundled content parses")
}

fn open_session(storage: &MemoryStore) -> TreasureSession<MemoryStore, ManualClock> {
    TreasureSession::open(
        storage.clone(),
        ManualClock::starting_at(1_700_000_000_000),
        content(),
        GameConfig::default(),
    )
}

#[test]
fn bundled_content_has_two_full_scenarios() {
    let content = content();
    assert_eq!(content.total_treasures(), 12);
    for (id, answer) in HOTEL.iter().chain(RESTAURANT.iter()) {
        let treasure = content.find_treasure(id).expect("treasure present");
        assert!(treasure.quiz.is_correct(*answer), "{id}");
        assert!(treasure.quiz.has_option(*answer));
    }
    assert_eq!(content.scenario("hotel-lobby").unwrap().treasures.len(), 6);
}

#[test]
fn first_click_unlocks_first_treasure_with_celebration() {
    let storage = MemoryStore::new();
    let mut session = open_session(&storage);
    let outcome = session.click_treasure("menu").unwrap();
    assert!(outcome.first_discovery);
    assert_eq!(outcome.points_awarded, 5);
    assert_eq!(outcome.unlocked, vec![AchievementId::FirstTreasure]);
    assert!(outcome.celebrate);

    let repeat = session.click_treasure("menu").unwrap();
    assert!(!repeat.first_discovery);
    assert_eq!(repeat.points_awarded, 0);
    assert!(repeat.unlocked.is_empty());
    assert_eq!(repeat.total_score, 5);
}

#[test]
fn half_way_arrives_with_sixth_discovery() {
    let storage = MemoryStore::new();
    let mut session = open_session(&storage);
    for (id, _) in &RESTAURANT[..5] {
        let outcome = session.click_treasure(id).unwrap();
        assert!(!outcome.unlocked.contains(&AchievementId::HalfWay));
    }
    assert!(!session.snapshot().has_achievement("half-way"));
    let sixth = session.click_treasure(RESTAURANT[5].0).unwrap();
    assert_eq!(sixth.unlocked, vec![AchievementId::HalfWay]);
}

#[test]
fn scholar_unlocks_at_exactly_fifty_from_quizzes() {
    let storage = MemoryStore::new();
    let mut session = open_session(&storage);
    let quizzes: Vec<_> = HOTEL.iter().chain(RESTAURANT.iter()).take(10).collect();
    for (index, (id, answer)) in quizzes.iter().enumerate() {
        let outcome = session.answer_quiz(id, *answer).unwrap();
        assert!(outcome.correct);
        assert!(outcome.first_completion);
        assert_eq!(outcome.points_awarded, 5);
        if index < 9 {
            assert!(outcome.unlocked.is_empty(), "scholar too early at {}", outcome.total_score);
        } else {
            assert_eq!(outcome.total_score, 50);
            assert_eq!(outcome.unlocked, vec![AchievementId::Scholar]);
            assert!(!outcome.celebrate);
        }
    }
    // Quiz completion alone never counts as a discovery.
    assert_eq!(session.snapshot().discovered_count(), 0);
}

#[test]
fn wrong_answers_never_award() {
    let storage = MemoryStore::new();
    let mut session = open_session(&storage);
    let outcome = session.answer_quiz("bellhop", 0).unwrap();
    assert!(!outcome.correct);
    assert_eq!(outcome.points_awarded, 0);
    assert!(!session.snapshot().has_completed_quiz("bellhop"));
    assert!(!outcome.explanation.is_empty());

    let retry = session.answer_quiz("bellhop", 1).unwrap();
    assert!(retry.correct);
    assert_eq!(retry.total_score, 5);
    let again = session.answer_quiz("bellhop", 1).unwrap();
    assert!(!again.first_completion);
    assert_eq!(again.total_score, 5);
}

#[test]
fn invalid_input_is_rejected_without_mutation() {
    let storage = MemoryStore::new();
    let mut session = open_session(&storage);
    assert_eq!(
        session.click_treasure("swimming-pool").unwrap_err(),
        SessionError::UnknownTreasure("swimming-pool".to_string())
    );
    assert!(matches!(
        session.answer_quiz("bellhop", 3),
        Err(SessionError::OptionOutOfRange { choice: 3, options: 3, .. })
    ));
    assert!(session.snapshot().is_blank());
    assert!(!storage.contains(&session.config().storage_key));
}

#[test]
fn full_run_unlocks_every_achievement_once() {
    let storage = MemoryStore::new();
    let mut session = open_session(&storage);
    let mut unlocked = Vec::new();
    for (id, answer) in HOTEL.iter().chain(RESTAURANT.iter()) {
        unlocked.extend(session.click_treasure(id).unwrap().unlocked);
        unlocked.extend(session.answer_quiz(id, *answer).unwrap().unlocked);
        // Replaying a finished treasure changes nothing.
        unlocked.extend(session.click_treasure(id).unwrap().unlocked);
    }
    assert_eq!(
        unlocked,
        vec![
            AchievementId::FirstTreasure,
            // 50 points arrive with the fifth hotel quiz, before the sixth discovery.
            AchievementId::Scholar,
            AchievementId::HalfWay,
            AchievementId::HotelMaster,
            AchievementId::PerfectScore,
            AchievementId::TreasureHunter,
        ]
    );
    let summary = session.summary();
    assert_eq!(summary.total_score, 120);
    assert_eq!(summary.total_score, summary.score_target);
    assert_eq!(summary.achievements_unlocked, summary.achievements_total);
    assert!((summary.completion_pct - 100.0).abs() < f64::EPSILON);
    assert!(session.achievements().iter().all(|status| status.unlocked));
}

#[test]
fn hotel_master_only_for_designated_scenario() {
    let storage = MemoryStore::new();
    let mut session = open_session(&storage);
    for (id, _) in &RESTAURANT {
        session.click_treasure(id).unwrap();
    }
    assert!(!session.snapshot().has_achievement("hotel-master"));

    let mut last = None;
    for (id, _) in &HOTEL {
        last = Some(session.click_treasure(id).unwrap());
    }
    let last = last.unwrap();
    assert!(last.unlocked.contains(&AchievementId::HotelMaster));
    assert!(last.unlocked.contains(&AchievementId::TreasureHunter));
}

#[test]
fn reopened_session_resumes_and_catches_up() {
    let storage = MemoryStore::new();
    {
        let mut session = open_session(&storage);
        session.click_treasure("reception-desk").unwrap();
        session.answer_quiz("reception-desk", 0).unwrap();
    }
    let reopened = open_session(&storage);
    assert_eq!(reopened.snapshot().total_score(), 10);
    assert!(reopened.snapshot().has_achievement("first-treasure"));

    // A record saved before its unlock was written gets synced on open.
    let other = MemoryStore::new();
    other.insert_raw(
        "treasure-hunt-v2-progress",
        r#"{"discoveredTreasures":["menu"],"totalScore":5,"completedQuizzes":[],"achievements":[],"lastUpdated":1}"#,
    );
    let synced = open_session(&other);
    assert!(synced.snapshot().has_achievement("first-treasure"));
}

#[test]
fn reset_clears_progress_and_summary() {
    let storage = MemoryStore::new();
    let mut session = open_session(&storage);
    session.click_treasure("menu").unwrap();
    session.answer_quiz("menu", 1).unwrap();
    assert!(session.reset().is_blank());

    let summary = session.summary();
    assert_eq!(summary.discovered, 0);
    assert_eq!(summary.total_score, 0);
    assert!(summary.scenarios.iter().all(|s| s.discovered == 0 && s.total == 6));

    let fresh = open_session(&storage);
    assert!(fresh.snapshot().is_blank());
}

#[test]
fn degraded_storage_keeps_the_game_running() {
    let storage = MemoryStore::new();
    let mut session = open_session(&storage);
    storage.set_unavailable(true);
    let outcome = session.click_treasure("menu").unwrap();
    assert_eq!(outcome.total_score, 5);
    assert!(session.storage_degraded());
    assert!(session.snapshot().has_achievement("first-treasure"));

    let reloaded = open_session(&storage);
    assert!(reloaded.snapshot().is_blank());
}

#[test]
fn summary_tracks_per_scenario_counts() {
    let storage = MemoryStore::new();
    let mut session = open_session(&storage);
    session.click_treasure("menu").unwrap();
    session.click_treasure("bellhop").unwrap();
    session.click_treasure("waiter").unwrap();
    let summary = session.summary();
    assert_eq!(summary.discovered, 3);
    assert_eq!(summary.total_treasures, 12);
    assert!((summary.completion_pct - 25.0).abs() < f64::EPSILON);
    let by_id: Vec<_> = summary
        .scenarios
        .iter()
        .map(|s| (s.id.as_str(), s.discovered))
        .collect();
    assert_eq!(by_id, vec![("hotel-lobby", 1), ("restaurant", 2)]);
}
