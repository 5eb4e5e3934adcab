//! Session transaction: one call per user action, mutation plus achievement sync.
use serde::Serialize;

use crate::achievements::{
    AchievementEvaluator, AchievementId, AchievementStatus, achievement_board, rule,
};
use crate::clock::{Clock, SystemClock};
use crate::config::GameConfig;
use crate::content::{GameContent, Treasure};
use crate::progress::GameProgress;
use crate::storage::KeyValueStore;
use crate::store::ProgressStore;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("unknown treasure: {0}")]
    UnknownTreasure(String),
    #[error("quiz for {treasure_id} has {options} options, got choice {choice}")]
    OptionOutOfRange {
        treasure_id: String,
        choice: usize,
        options: usize,
    },
}

/// Result of clicking a treasure hotspot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryOutcome {
    pub treasure_id: String,
    pub first_discovery: bool,
    pub points_awarded: u32,
    pub total_score: u64,
    pub unlocked: Vec<AchievementId>,
    pub celebrate: bool,
}

/// Result of submitting a quiz answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOutcome {
    pub treasure_id: String,
    pub correct: bool,
    pub first_completion: bool,
    pub points_awarded: u32,
    pub total_score: u64,
    pub explanation: String,
    pub unlocked: Vec<AchievementId>,
    pub celebrate: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioProgress {
    pub id: String,
    pub name: String,
    pub discovered: usize,
    pub total: usize,
}

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub discovered: usize,
    pub total_treasures: usize,
    /// 0.0 when no content is loaded
    pub completion_pct: f64,
    pub total_score: u64,
    pub score_target: u64,
    pub achievements_unlocked: usize,
    pub achievements_total: usize,
    pub scenarios: Vec<ScenarioProgress>,
}

/// High-level session wrapper binding a progress store to immutable content.
///
/// Each public action performs its mutation, re-evaluates achievements
/// against the updated snapshot and unlocks whatever became eligible,
/// all before returning.
#[derive(Debug)]
pub struct TreasureSession<S, C = SystemClock>
where
    S: KeyValueStore,
    C: Clock,
{
    store: ProgressStore<S, C>,
    content: GameContent,
    evaluator: AchievementEvaluator,
    config: GameConfig,
}

impl<S, C> TreasureSession<S, C>
where
    S: KeyValueStore,
    C: Clock,
{
    /// Open the configured storage key and sync achievements once, so a
    /// snapshot saved before an unlock was recorded catches up.
    pub fn open(storage: S, clock: C, content: GameContent, config: GameConfig) -> Self {
        let store = ProgressStore::open(storage, clock, config.storage_key.clone());
        Self::from_store(store, content, config)
    }

    /// Build a session around an existing store.
    pub fn from_store(
        store: ProgressStore<S, C>,
        content: GameContent,
        config: GameConfig,
    ) -> Self {
        let evaluator = AchievementEvaluator::from_content(&content, &config.designated_scenario);
        let mut session = Self {
            store,
            content,
            evaluator,
            config,
        };
        session.sync_achievements();
        session
    }

    /// Reveal a treasure. Points are awarded on the first click only.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownTreasure`] if the id is not in the content.
    pub fn click_treasure(&mut self, treasure_id: &str) -> Result<DiscoveryOutcome, SessionError> {
        let points = self.treasure(treasure_id)?.points;
        let first_discovery = !self.store.snapshot().has_discovered(treasure_id);
        let total_score = self.store.discover_treasure(treasure_id, points).total_score();
        let unlocked = self.sync_achievements();
        Ok(DiscoveryOutcome {
            treasure_id: treasure_id.to_string(),
            first_discovery,
            points_awarded: if first_discovery { points } else { 0 },
            total_score,
            celebrate: celebrates(&unlocked),
            unlocked,
        })
    }

    /// Submit `choice` for the quiz of `treasure_id`.
    /// A wrong answer leaves progress untouched; the quiz can be retried.
    ///
    /// # Errors
    ///
    /// Returns an error if the treasure is unknown or `choice` is not one of
    /// the quiz options.
    pub fn answer_quiz(
        &mut self,
        treasure_id: &str,
        choice: usize,
    ) -> Result<QuizOutcome, SessionError> {
        let quiz = &self.treasure(treasure_id)?.quiz;
        if !quiz.has_option(choice) {
            return Err(SessionError::OptionOutOfRange {
                treasure_id: treasure_id.to_string(),
                choice,
                options: quiz.options.len(),
            });
        }
        let correct = quiz.is_correct(choice);
        let explanation = quiz.explanation.clone();

        if !correct {
            return Ok(QuizOutcome {
                treasure_id: treasure_id.to_string(),
                correct,
                first_completion: false,
                points_awarded: 0,
                total_score: self.store.snapshot().total_score(),
                explanation,
                unlocked: Vec::new(),
                celebrate: false,
            });
        }

        let bonus = self.config.quiz_bonus_points;
        let first_completion = !self.store.snapshot().has_completed_quiz(treasure_id);
        let total_score = self.store.complete_quiz(treasure_id, bonus).total_score();
        let unlocked = self.sync_achievements();
        Ok(QuizOutcome {
            treasure_id: treasure_id.to_string(),
            correct,
            first_completion,
            points_awarded: if first_completion { bonus } else { 0 },
            total_score,
            explanation,
            celebrate: celebrates(&unlocked),
            unlocked,
        })
    }

    /// Erase all progress, in memory and in durable storage.
    pub fn reset(&mut self) -> &GameProgress {
        self.store.reset()
    }

    /// Evaluate the current snapshot and unlock anything newly eligible.
    /// Returns the ids unlocked by this call.
    pub fn sync_achievements(&mut self) -> Vec<AchievementId> {
        let unlocked = self.evaluator.evaluate(self.store.snapshot());
        for id in &unlocked {
            self.store.unlock_achievement(id.as_str());
        }
        unlocked
    }

    #[must_use]
    pub const fn snapshot(&self) -> &GameProgress {
        self.store.snapshot()
    }

    #[must_use]
    pub const fn content(&self) -> &GameContent {
        &self.content
    }

    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub const fn store(&self) -> &ProgressStore<S, C> {
        &self.store
    }

    #[must_use]
    pub const fn storage_degraded(&self) -> bool {
        self.store.storage_degraded()
    }

    #[must_use]
    pub fn achievements(&self) -> Vec<AchievementStatus> {
        achievement_board(self.store.snapshot())
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn summary(&self) -> ProgressSummary {
        let progress = self.store.snapshot();
        let total_treasures = self.content.total_treasures();
        let discovered = progress.discovered_count();
        let completion_pct = if total_treasures == 0 {
            0.0
        } else {
            (discovered as f64 / total_treasures as f64) * 100.0
        };
        let scenarios = self
            .content
            .scenarios
            .iter()
            .map(|scenario| ScenarioProgress {
                id: scenario.id.clone(),
                name: scenario.name.clone(),
                discovered: scenario
                    .treasures
                    .iter()
                    .filter(|t| progress.has_discovered(&t.id))
                    .count(),
                total: scenario.treasures.len(),
            })
            .collect();
        ProgressSummary {
            discovered,
            total_treasures,
            completion_pct,
            total_score: progress.total_score(),
            score_target: self.config.score_target,
            achievements_unlocked: AchievementId::ALL
                .iter()
                .filter(|id| progress.has_achievement(id.as_str()))
                .count(),
            achievements_total: AchievementId::ALL.len(),
            scenarios,
        }
    }

    fn treasure(&self, treasure_id: &str) -> Result<&Treasure, SessionError> {
        self.content
            .find_treasure(treasure_id)
            .ok_or_else(|| SessionError::UnknownTreasure(treasure_id.to_string()))
    }
}

fn celebrates(unlocked: &[AchievementId]) -> bool {
    unlocked.iter().any(|id| rule(*id).celebrates)
}
