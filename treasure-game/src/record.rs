//! Wire codec for the persisted progress record.
//!
//! The record is a JSON object with camelCase keys; sets are written as
//! arrays. Decoding rebuilds the sets, so duplicate entries collapse
//! silently rather than being reported as corruption.
use crate::progress::GameProgress;

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("progress record could not be encoded: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("progress record is malformed: {0}")]
    Malformed(#[source] serde_json::Error),
}

/// Serialize progress into its durable JSON form.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode(progress: &GameProgress) -> Result<String, RecordError> {
    serde_json::to_string(progress).map_err(RecordError::Encode)
}

/// Parse a durable record.
///
/// Truncated JSON, missing fields, and values of the wrong type (including a
/// negative score) are all reported as [`RecordError::Malformed`].
///
/// # Errors
///
/// Returns an error if the record does not match the expected schema.
pub fn decode(raw: &str) -> Result<GameProgress, RecordError> {
    serde_json::from_str(raw).map_err(RecordError::Malformed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn sample() -> GameProgress {
        let mut progress = GameProgress::new(1_700_000_000_000);
        progress.record_discovery("reception", 10);
        progress.record_discovery("bellhop", 10);
        progress.record_quiz("reception", 5);
        progress.record_achievement("first-treasure");
        progress
    }

    #[test]
    fn encoded_record_uses_wire_field_names() {
        let value: Value = serde_json::from_str(&encode(&sample()).unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "discoveredTreasures": ["bellhop", "reception"],
                "totalScore": 25,
                "completedQuizzes": ["reception"],
                "achievements": ["first-treasure"],
                "lastUpdated": 1_700_000_000_000_i64
            })
        );
    }

    #[test]
    fn decode_restores_sets_and_score() {
        let restored = decode(&encode(&sample()).unwrap()).unwrap();
        assert_eq!(restored, sample());
    }

    #[test]
    fn duplicate_entries_collapse() {
        let raw = r#"{
            "discoveredTreasures": ["a", "a", "b"],
            "totalScore": 20,
            "completedQuizzes": [],
            "achievements": ["scholar", "scholar"],
            "lastUpdated": 5
        }"#;
        let progress = decode(raw).unwrap();
        assert_eq!(progress.discovered_count(), 2);
        assert_eq!(progress.unlocked_achievements().len(), 1);
    }

    #[test]
    fn unknown_achievement_ids_survive() {
        let raw = r#"{"discoveredTreasures":[],"totalScore":0,"completedQuizzes":[],
            "achievements":["retired-badge"],"lastUpdated":0}"#;
        assert!(decode(raw).unwrap().has_achievement("retired-badge"));
    }

    #[test]
    fn malformed_records_are_rejected() {
        let cases = [
            r#"{"discoveredTreasures":["a"],"totalSc"#,
            r#"{"discoveredTreasures":[],"completedQuizzes":[],"achievements":[],"lastUpdated":0}"#,
            r#"{"discoveredTreasures":[],"totalScore":-4,"completedQuizzes":[],"achievements":[],"lastUpdated":0}"#,
            r#"{"discoveredTreasures":"a","totalScore":0,"completedQuizzes":[],"achievements":[],"lastUpdated":0}"#,
            "null",
            "",
        ];
        for raw in cases {
            assert!(
                matches!(decode(raw), Err(RecordError::Malformed(_))),
                "expected malformed: {raw}"
            );
        }
    }
}
