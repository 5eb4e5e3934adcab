use anyhow::{Result, ensure};

use crate::common::scenario::TestScenario;
use crate::logic::{Action, PlaythroughPlan, PlaythroughSummary, TesterAssets};
use treasure_game::AchievementId;
use treasure_game::constants::{HALF_WAY_COUNT, PERFECT_SCORE, SCHOLAR_SCORE};

const MISSING_TREASURE: &str = "no-such-treasure";
const TRUNCATED_RECORD: &str = "{\"discoveredTreasures\":[\"recep";

/// Facts about the loaded content that expectations compare against.
#[derive(Debug, Clone)]
struct ContentFacts {
    total: usize,
    treasure_ids: Vec<String>,
    first_points: u64,
    possible_score: u64,
    quiz_bonus: u64,
    designated: String,
    designated_total: usize,
}

impl ContentFacts {
    fn from_assets(assets: &TesterAssets) -> Self {
        let content = assets.content();
        let config = assets.config();
        let treasures: Vec<_> = content
            .scenarios
            .iter()
            .flat_map(|scenario| scenario.treasures.iter())
            .collect();
        let quiz_bonus = u64::from(config.quiz_bonus_points);
        let points: u64 = treasures.iter().map(|t| u64::from(t.points)).sum();
        Self {
            total: treasures.len(),
            treasure_ids: treasures.iter().map(|t| t.id.clone()).collect(),
            first_points: treasures.first().map_or(0, |t| u64::from(t.points)),
            possible_score: points + quiz_bonus * treasures.len() as u64,
            quiz_bonus,
            designated: config.designated_scenario.clone(),
            designated_total: content
                .scenario(&config.designated_scenario)
                .map_or(0, |scenario| scenario.treasures.len()),
        }
    }

    fn first_id(&self) -> String {
        self.treasure_ids
            .first()
            .cloned()
            .unwrap_or_else(|| MISSING_TREASURE.to_string())
    }
}

pub fn catalog_scenarios(assets: &TesterAssets) -> Vec<TestScenario> {
    let facts = ContentFacts::from_assets(assets);
    vec![
        TestScenario::new(
            "smoke",
            "Discover one treasure and read the save back",
            smoke_plan(&facts),
        ),
        TestScenario::new(
            "idempotent-clicks",
            "Clicking the same treasure repeatedly scores once",
            idempotent_plan(&facts),
        ),
        TestScenario::new(
            "half-way",
            "Discover six treasures for Halfway There",
            half_way_plan(&facts),
        ),
        TestScenario::new(
            "scholar-quizzes",
            "Quiz bonuses alone unlock English Scholar without a celebration",
            scholar_plan(&facts),
        ),
        TestScenario::new(
            "wrong-answers",
            "Wrong quiz answers change nothing",
            wrong_answers_plan(&facts),
        ),
        TestScenario::new(
            "hotel-master",
            "Discover every treasure in the designated scenario",
            hotel_master_plan(&facts),
        ),
        TestScenario::new(
            "full-game",
            "Discover everything and ace every quiz",
            full_game_plan(&facts),
        ),
        TestScenario::new(
            "reload-resume",
            "Progress survives a reload mid-game without duplicate unlocks",
            reload_plan(&facts),
        ),
        TestScenario::new(
            "reset",
            "Reset clears progress durably and achievements can be earned again",
            reset_plan(&facts),
        ),
        TestScenario::new(
            "corrupt-save",
            "A malformed save starts a fresh game",
            corrupt_save_plan(&facts),
        ),
        TestScenario::new(
            "unknown-treasure",
            "Unknown ids and out-of-range answers are rejected without mutation",
            unknown_treasure_plan(&facts),
        ),
    ]
}

fn ensure_persisted(summary: &PlaythroughSummary) -> Result<()> {
    ensure!(!summary.storage_degraded, "storage reported degraded");
    ensure!(
        summary.persisted.as_ref() == Some(&summary.progress),
        "saved record differs from in-memory progress"
    );
    Ok(())
}

fn ensure_unlocked_once(summary: &PlaythroughSummary) -> Result<()> {
    for id in AchievementId::ALL {
        ensure!(
            summary.unlock_count(id) <= 1,
            "{id} reported {} times",
            summary.unlock_count(id)
        );
    }
    Ok(())
}

fn smoke_plan(facts: &ContentFacts) -> PlaythroughPlan {
    let facts = facts.clone();
    PlaythroughPlan::new(vec![Action::ClickFirst(1)])
        .with_expectation(move |summary: &PlaythroughSummary| -> Result<()> {
            let expected = facts.total.min(1);
            ensure!(
                summary.progress.discovered_count() == expected,
                "expected {expected} discovered"
            );
            ensure!(
                summary.progress.total_score() == facts.first_points,
                "expected score {}",
                facts.first_points
            );
            if facts.total > 0 {
                ensure!(
                    summary.unlocked(AchievementId::FirstTreasure),
                    "first-treasure not unlocked"
                );
                ensure!(summary.celebrations >= 1, "no celebration for first discovery");
            }
            Ok(())
        })
        .with_expectation(ensure_persisted)
}

fn idempotent_plan(facts: &ContentFacts) -> PlaythroughPlan {
    let facts = facts.clone();
    PlaythroughPlan::new(vec![Action::ClickFirst(1); 5])
        .with_expectation(move |summary: &PlaythroughSummary| -> Result<()> {
            ensure!(
                summary.progress.discovered_count() == facts.total.min(1),
                "repeat clicks added discoveries"
            );
            ensure!(
                summary.progress.total_score() == facts.first_points,
                "repeat clicks changed the score to {}",
                summary.progress.total_score()
            );
            Ok(())
        })
        .with_expectation(ensure_unlocked_once)
        .with_expectation(ensure_persisted)
}

fn half_way_plan(facts: &ContentFacts) -> PlaythroughPlan {
    let facts = facts.clone();
    PlaythroughPlan::new(vec![Action::ClickFirst(HALF_WAY_COUNT)])
        .with_expectation(move |summary: &PlaythroughSummary| -> Result<()> {
            let discovered = summary.progress.discovered_count();
            ensure!(
                discovered == facts.total.min(HALF_WAY_COUNT),
                "expected {} discovered, saw {discovered}",
                facts.total.min(HALF_WAY_COUNT)
            );
            ensure!(
                summary.unlocked(AchievementId::HalfWay) == (facts.total >= HALF_WAY_COUNT),
                "half-way unlock mismatch at {discovered} discovered"
            );
            ensure!(
                summary.unlocked(AchievementId::TreasureHunter)
                    == (facts.total > 0 && discovered == facts.total),
                "treasure-hunter unlock mismatch"
            );
            Ok(())
        })
        .with_expectation(ensure_persisted)
}

fn scholar_plan(facts: &ContentFacts) -> PlaythroughPlan {
    let facts = facts.clone();
    let quizzes = usize::try_from(SCHOLAR_SCORE.div_ceil(facts.quiz_bonus.max(1))).unwrap_or(0);
    PlaythroughPlan::new(vec![Action::AnswerFirst(quizzes)])
        .with_expectation(move |summary: &PlaythroughSummary| -> Result<()> {
            let answered = facts.total.min(quizzes);
            ensure!(summary.correct_answers == answered, "expected {answered} correct answers");
            ensure!(
                summary.progress.discovered_count() == 0,
                "quizzes must not discover treasures"
            );
            let score = summary.progress.total_score();
            ensure!(
                score == facts.quiz_bonus * answered as u64,
                "unexpected quiz score {score}"
            );
            ensure!(
                summary.unlocked(AchievementId::Scholar) == (score >= SCHOLAR_SCORE),
                "scholar unlock mismatch at {score}"
            );
            let perfect = summary.unlocked(AchievementId::PerfectScore);
            ensure!(
                summary.celebrations == usize::from(perfect),
                "scholar must unlock silently, saw {} celebrations",
                summary.celebrations
            );
            Ok(())
        })
        .with_expectation(ensure_persisted)
}

fn wrong_answers_plan(facts: &ContentFacts) -> PlaythroughPlan {
    let actions = facts
        .treasure_ids
        .iter()
        .map(|id| Action::AnswerWrong(id.clone()))
        .collect();
    PlaythroughPlan::new(actions).with_expectation(|summary: &PlaythroughSummary| -> Result<()> {
        ensure!(summary.progress.is_blank(), "wrong answers changed progress");
        ensure!(summary.correct_answers == 0, "a wrong answer was graded correct");
        ensure!(summary.unlock_log.is_empty(), "wrong answers unlocked achievements");
        Ok(())
    })
}

fn hotel_master_plan(facts: &ContentFacts) -> PlaythroughPlan {
    let facts = facts.clone();
    PlaythroughPlan::new(vec![Action::ClickScenario(facts.designated.clone())])
        .with_expectation(move |summary: &PlaythroughSummary| -> Result<()> {
            ensure!(
                summary.progress.discovered_count() == facts.designated_total,
                "expected the {} treasures of {}",
                facts.designated_total,
                facts.designated
            );
            ensure!(
                summary.unlocked(AchievementId::HotelMaster) == (facts.designated_total > 0),
                "hotel-master unlock mismatch"
            );
            Ok(())
        })
        .with_expectation(ensure_persisted)
}

fn full_game_plan(facts: &ContentFacts) -> PlaythroughPlan {
    let facts = facts.clone();
    PlaythroughPlan::new(vec![Action::ClickAll, Action::AnswerAllCorrect])
        .with_expectation(move |summary: &PlaythroughSummary| -> Result<()> {
            ensure!(
                summary.progress.total_score() == facts.possible_score,
                "expected maximum score {}, got {}",
                facts.possible_score,
                summary.progress.total_score()
            );
            ensure!(
                summary.overview.discovered == facts.total,
                "not every treasure discovered"
            );
            if facts.total > 0 {
                ensure!(
                    summary.unlocked(AchievementId::TreasureHunter),
                    "treasure-hunter not unlocked"
                );
                ensure!(
                    (summary.overview.completion_pct - 100.0).abs() < f64::EPSILON,
                    "completion at {}%",
                    summary.overview.completion_pct
                );
            }
            ensure!(
                summary.unlocked(AchievementId::PerfectScore)
                    == (facts.possible_score >= PERFECT_SCORE),
                "perfect-score unlock mismatch"
            );
            Ok(())
        })
        .with_expectation(ensure_unlocked_once)
        .with_expectation(ensure_persisted)
}

fn reload_plan(facts: &ContentFacts) -> PlaythroughPlan {
    let facts = facts.clone();
    PlaythroughPlan::new(vec![Action::ClickFirst(3), Action::AnswerFirst(2), Action::Reload])
        .then(Action::ClickFirst(HALF_WAY_COUNT))
        .then(Action::Reload)
        .with_expectation(move |summary: &PlaythroughSummary| -> Result<()> {
            ensure!(
                summary.progress.discovered_count() == facts.total.min(HALF_WAY_COUNT),
                "discoveries lost across reload"
            );
            ensure!(
                summary.progress.completed_quizzes().len() == facts.total.min(2),
                "quiz completions lost across reload"
            );
            Ok(())
        })
        .with_expectation(ensure_unlocked_once)
        .with_expectation(ensure_persisted)
}

fn reset_plan(facts: &ContentFacts) -> PlaythroughPlan {
    let facts = facts.clone();
    PlaythroughPlan::new(vec![
        Action::ClickAll,
        Action::AnswerAllCorrect,
        Action::Reset,
        Action::Reload,
        Action::ClickFirst(1),
    ])
    .with_expectation(move |summary: &PlaythroughSummary| -> Result<()> {
        ensure!(
            summary.progress.discovered_count() == facts.total.min(1),
            "reset left discoveries behind"
        );
        ensure!(
            summary.progress.completed_quizzes().is_empty(),
            "reset left quiz completions behind"
        );
        ensure!(
            summary.progress.total_score() == facts.first_points,
            "score not restarted after reset"
        );
        if facts.total > 0 {
            ensure!(
                summary.unlock_count(AchievementId::FirstTreasure) == 2,
                "first-treasure should unlock again after reset"
            );
        }
        Ok(())
    })
    .with_expectation(ensure_persisted)
}

fn corrupt_save_plan(facts: &ContentFacts) -> PlaythroughPlan {
    let facts = facts.clone();
    PlaythroughPlan::new(vec![
        Action::ClickFirst(2),
        Action::CorruptSave(TRUNCATED_RECORD.to_string()),
        Action::ClickFirst(1),
    ])
    .with_expectation(move |summary: &PlaythroughSummary| -> Result<()> {
        ensure!(
            summary.progress.discovered_count() == facts.total.min(1),
            "corrupt save was not discarded"
        );
        ensure!(
            summary.progress.total_score() == facts.first_points,
            "score carried over from a corrupt save"
        );
        Ok(())
    })
    .with_expectation(ensure_persisted)
}

fn unknown_treasure_plan(facts: &ContentFacts) -> PlaythroughPlan {
    PlaythroughPlan::new(vec![
        Action::Click(MISSING_TREASURE.to_string()),
        Action::AnswerCorrect(MISSING_TREASURE.to_string()),
        Action::Answer(facts.first_id(), usize::MAX),
    ])
    .with_expectation(|summary: &PlaythroughSummary| -> Result<()> {
        ensure!(
            summary.rejected.len() == 3,
            "expected 3 rejected actions, saw {}",
            summary.rejected.len()
        );
        ensure!(summary.progress.is_blank(), "rejected actions changed progress");
        Ok(())
    })
}
