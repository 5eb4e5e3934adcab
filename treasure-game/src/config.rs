//! Runtime configuration for a treasure-hunt session.
use serde::{Deserialize, Serialize};

use crate::constants::{DESIGNATED_SCENARIO_ID, QUIZ_BONUS_POINTS, SCORE_TARGET, STORAGE_KEY};

/// Tunables that a platform shell may override, typically from a JSON asset.
/// Every field falls back to its default when missing from the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameConfig {
    /// Key under which the progress record is written.
    pub storage_key: String,
    /// Scenario whose full discovery unlocks `hotel-master`.
    pub designated_scenario: String,
    /// Points awarded for the first correct answer to a treasure's quiz.
    pub quiz_bonus_points: u32,
    pub score_target: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            storage_key: STORAGE_KEY.to_string(),
            designated_scenario: DESIGNATED_SCENARIO_ID.to_string(),
            quiz_bonus_points: QUIZ_BONUS_POINTS,
            score_target: SCORE_TARGET,
        }
    }
}

impl GameConfig {
    /// Parse a configuration document, filling missing fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a field has the wrong type.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = GameConfig::from_json(r#"{ "quizBonusPoints": 8 }"#).unwrap();
        assert_eq!(config.quiz_bonus_points, 8);
        assert_eq!(config.storage_key, STORAGE_KEY);
        assert_eq!(config.designated_scenario, "hotel-lobby");
        assert_eq!(config.score_target, 120);
    }

    #[test]
    fn wrong_type_is_rejected() {
        assert!(GameConfig::from_json(r#"{ "quizBonusPoints": "many" }"#).is_err());
    }
}
