//! The durable progress snapshot and its first-time bookkeeping.
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Everything a player has earned so far.
///
/// Mutations are only reachable through the crate so that discoveries,
/// quiz completions and achievements can grow but never shrink; the only
/// way back to an empty record is a full reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameProgress {
    discovered_treasures: BTreeSet<String>,
    total_score: u64,
    completed_quizzes: BTreeSet<String>,
    #[serde(rename = "achievements")]
    unlocked_achievements: BTreeSet<String>,
    last_updated: i64,
}

impl GameProgress {
    /// Empty progress stamped with `now_millis`.
    #[must_use]
    pub const fn new(now_millis: i64) -> Self {
        Self {
            discovered_treasures: BTreeSet::new(),
            total_score: 0,
            completed_quizzes: BTreeSet::new(),
            unlocked_achievements: BTreeSet::new(),
            last_updated: now_millis,
        }
    }

    #[must_use]
    pub const fn discovered_treasures(&self) -> &BTreeSet<String> {
        &self.discovered_treasures
    }

    #[must_use]
    pub fn discovered_count(&self) -> usize {
        self.discovered_treasures.len()
    }

    #[must_use]
    pub fn has_discovered(&self, treasure_id: &str) -> bool {
        self.discovered_treasures.contains(treasure_id)
    }

    #[must_use]
    pub const fn total_score(&self) -> u64 {
        self.total_score
    }

    #[must_use]
    pub const fn completed_quizzes(&self) -> &BTreeSet<String> {
        &self.completed_quizzes
    }

    #[must_use]
    pub fn has_completed_quiz(&self, treasure_id: &str) -> bool {
        self.completed_quizzes.contains(treasure_id)
    }

    #[must_use]
    pub const fn unlocked_achievements(&self) -> &BTreeSet<String> {
        &self.unlocked_achievements
    }

    #[must_use]
    pub fn has_achievement(&self, achievement_id: &str) -> bool {
        self.unlocked_achievements.contains(achievement_id)
    }

    /// Epoch millis of the last persisted write.
    #[must_use]
    pub const fn last_updated(&self) -> i64 {
        self.last_updated
    }

    /// Whether nothing has been earned yet. Ignores the timestamp.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.discovered_treasures.is_empty()
            && self.completed_quizzes.is_empty()
            && self.unlocked_achievements.is_empty()
            && self.total_score == 0
    }

    /// Record a discovery. Points are added only the first time `treasure_id`
    /// is seen; returns whether this call was that first time.
    pub(crate) fn record_discovery(&mut self, treasure_id: &str, points: u32) -> bool {
        if self.discovered_treasures.contains(treasure_id) {
            return false;
        }
        self.discovered_treasures.insert(treasure_id.to_string());
        self.total_score = self.total_score.saturating_add(u64::from(points));
        true
    }

    /// Record a quiz completion with the same first-time rule as discoveries.
    pub(crate) fn record_quiz(&mut self, treasure_id: &str, bonus_points: u32) -> bool {
        if self.completed_quizzes.contains(treasure_id) {
            return false;
        }
        self.completed_quizzes.insert(treasure_id.to_string());
        self.total_score = self.total_score.saturating_add(u64::from(bonus_points));
        true
    }

    pub(crate) fn record_achievement(&mut self, achievement_id: &str) -> bool {
        if self.unlocked_achievements.contains(achievement_id) {
            return false;
        }
        self.unlocked_achievements.insert(achievement_id.to_string());
        true
    }

    pub(crate) const fn touch(&mut self, now_millis: i64) {
        self.last_updated = now_millis;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovery_awards_points_once() {
        let mut progress = GameProgress::new(0);
        assert!(progress.record_discovery("t1", 10));
        assert!(!progress.record_discovery("t1", 10));
        assert_eq!(progress.total_score(), 10);
        assert_eq!(progress.discovered_count(), 1);
        assert!(progress.has_discovered("t1"));
    }

    #[test]
    fn quiz_tracking_is_independent_of_discovery() {
        let mut progress = GameProgress::new(0);
        assert!(progress.record_quiz("t9", 5));
        assert!(!progress.record_quiz("t9", 5));
        assert!(progress.has_completed_quiz("t9"));
        assert!(!progress.has_discovered("t9"));
        assert_eq!(progress.total_score(), 5);
    }

    #[test]
    fn achievements_never_touch_score() {
        let mut progress = GameProgress::new(0);
        assert!(progress.record_achievement("scholar"));
        assert!(!progress.record_achievement("scholar"));
        assert_eq!(progress.total_score(), 0);
        assert_eq!(progress.unlocked_achievements().len(), 1);
        assert!(!progress.is_blank());
    }

    #[test]
    fn score_saturates_instead_of_wrapping() {
        let mut progress = GameProgress::new(0);
        progress.total_score = u64::MAX - 1;
        progress.record_discovery("t1", 10);
        assert_eq!(progress.total_score(), u64::MAX);
    }

    #[test]
    fn new_progress_is_blank_and_stamped() {
        let progress = GameProgress::new(42);
        assert!(progress.is_blank());
        assert_eq!(progress.last_updated(), 42);
    }
}
