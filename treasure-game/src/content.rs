//! Read-only game content: scenarios, their treasures, and treasure quizzes.
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Multiple-choice quiz attached to a treasure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub question: String,
    pub options: Vec<String>,
    /// Zero-based index into `options`
    pub correct_answer: usize,
    #[serde(default)]
    pub explanation: String,
}

impl Quiz {
    /// Whether `choice` is a valid index into the option list.
    #[must_use]
    pub fn has_option(&self, choice: usize) -> bool {
        choice < self.options.len()
    }

    #[must_use]
    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.correct_answer
    }
}

/// A vocabulary item hidden in a scenario image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Treasure {
    pub id: String,
    pub name: String,
    /// Hotspot position as a percentage of image width
    #[serde(default)]
    pub x: f32,
    /// Hotspot position as a percentage of image height
    #[serde(default)]
    pub y: f32,
    /// Text handed to speech synthesis for pronunciation
    #[serde(default)]
    pub vocabulary: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub example: String,
    #[serde(default)]
    pub grammar_topic: String,
    #[serde(default)]
    pub difficulty: String,
    pub points: u32,
    pub quiz: Quiz,
}

/// A scene the player explores, holding an ordered list of treasures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub treasures: Vec<Treasure>,
}

impl Scenario {
    /// Ids of every treasure in this scenario.
    #[must_use]
    pub fn treasure_ids(&self) -> BTreeSet<String> {
        self.treasures.iter().map(|t| t.id.clone()).collect()
    }
}

/// Container for all scenario content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GameContent {
    pub scenarios: Vec<Scenario>,
}

impl GameContent {
    /// Content with no scenarios, used when the feed failed to load
    #[must_use]
    pub fn empty() -> Self {
        Self {
            scenarios: Vec::new(),
        }
    }

    /// Load content from a JSON document
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into valid content.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn from_scenarios(scenarios: Vec<Scenario>) -> Self {
        Self { scenarios }
    }

    /// Number of treasures across all scenarios.
    #[must_use]
    pub fn total_treasures(&self) -> usize {
        self.scenarios.iter().map(|s| s.treasures.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_treasures() == 0
    }

    #[must_use]
    pub fn scenario(&self, scenario_id: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.id == scenario_id)
    }

    /// Find a treasure by id across all scenarios.
    /// The first match wins when content repeats an id.
    #[must_use]
    pub fn find_treasure(&self, treasure_id: &str) -> Option<&Treasure> {
        self.scenarios
            .iter()
            .flat_map(|s| s.treasures.iter())
            .find(|t| t.id == treasure_id)
    }

    /// Scenario shown first when a session opens.
    #[must_use]
    pub fn first_scenario(&self) -> Option<&Scenario> {
        self.scenarios.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "scenarios": [
            {
                "id": "hotel-lobby",
                "name": "Hotel Lobby",
                "image": "/images/hotel.png",
                "treasures": [
                    {
                        "id": "reception",
                        "name": "Reception Desk",
                        "x": 42.5,
                        "y": 60,
                        "vocabulary": "reception desk",
                        "grammarTopic": "Compound nouns",
                        "points": 10,
                        "quiz": {
                            "question": "Where do you check in?",
                            "options": ["Reception desk", "Elevator"],
                            "correctAnswer": 0,
                            "explanation": "Guests check in at reception."
                        }
                    }
                ]
            },
            { "id": "airport", "name": "Airport" }
        ]
    }"#;

    #[test]
    fn content_from_json_reads_camel_case_fields() {
        let content = GameContent::from_json(SAMPLE).unwrap();
        assert_eq!(content.scenarios.len(), 2);
        assert_eq!(content.total_treasures(), 1);

        let treasure = content.find_treasure("reception").expect("treasure exists");
        assert_eq!(treasure.points, 10);
        assert_eq!(treasure.grammar_topic, "Compound nouns");
        assert!(treasure.quiz.is_correct(0));
        assert!(!treasure.quiz.is_correct(1));
        assert!(treasure.quiz.has_option(1));
        assert!(!treasure.quiz.has_option(2));
        assert!(treasure.difficulty.is_empty());
    }

    #[test]
    fn scenario_lookup_and_ids() {
        let content = GameContent::from_json(SAMPLE).unwrap();
        let hotel = content.scenario("hotel-lobby").expect("scenario exists");
        assert_eq!(hotel.treasure_ids().len(), 1);
        assert!(content.scenario("airport").unwrap().treasures.is_empty());
        assert!(content.scenario("beach").is_none());
        assert_eq!(content.first_scenario().map(|s| s.id.as_str()), Some("hotel-lobby"));
    }

    #[test]
    fn empty_content_has_no_treasures() {
        let content = GameContent::empty();
        assert!(content.is_empty());
        assert!(content.find_treasure("reception").is_none());
        assert!(content.first_scenario().is_none());
    }

    #[test]
    fn missing_points_is_rejected() {
        let json = r#"{ "scenarios": [ { "id": "s", "name": "S", "treasures": [
            { "id": "t", "name": "T", "quiz": { "question": "q", "options": [], "correctAnswer": 0 } }
        ] } ] }"#;
        assert!(GameContent::from_json(json).is_err());
    }
}
