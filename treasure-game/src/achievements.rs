//! Achievement catalog and evaluation.
//!
//! Rules are checked as "is the condition true now", not "did it just
//! cross the threshold". Evaluation therefore has to run after every
//! mutation, and only ids missing from the unlocked set are reported.
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::constants::{FIRST_TREASURE_COUNT, HALF_WAY_COUNT, PERFECT_SCORE, SCHOLAR_SCORE};
use crate::content::GameContent;
use crate::progress::GameProgress;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AchievementId {
    FirstTreasure,
    HalfWay,
    TreasureHunter,
    Scholar,
    PerfectScore,
    HotelMaster,
}

impl AchievementId {
    /// Every id in evaluation priority order.
    pub const ALL: [Self; 6] = [
        Self::FirstTreasure,
        Self::HalfWay,
        Self::TreasureHunter,
        Self::Scholar,
        Self::PerfectScore,
        Self::HotelMaster,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FirstTreasure => "first-treasure",
            Self::HalfWay => "half-way",
            Self::TreasureHunter => "treasure-hunter",
            Self::Scholar => "scholar",
            Self::PerfectScore => "perfect-score",
            Self::HotelMaster => "hotel-master",
        }
    }
}

impl fmt::Display for AchievementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown achievement id: {0}")]
pub struct UnknownAchievement(pub String);

impl FromStr for AchievementId {
    type Err = UnknownAchievement;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownAchievement(s.to_string()))
    }
}

/// Static totals derived from content once per session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContentTotals {
    total_treasures: usize,
    designated_treasures: BTreeSet<String>,
}

impl ContentTotals {
    #[must_use]
    pub const fn new(total_treasures: usize, designated_treasures: BTreeSet<String>) -> Self {
        Self {
            total_treasures,
            designated_treasures,
        }
    }

    /// Totals for `content`, with `designated_scenario` naming the scenario
    /// whose full discovery unlocks `hotel-master`.
    #[must_use]
    pub fn from_content(content: &GameContent, designated_scenario: &str) -> Self {
        Self {
            total_treasures: content.total_treasures(),
            designated_treasures: content
                .scenario(designated_scenario)
                .map(crate::content::Scenario::treasure_ids)
                .unwrap_or_default(),
        }
    }

    const fn content_loaded(&self) -> bool {
        self.total_treasures > 0
    }
}

type Predicate = fn(&GameProgress, &ContentTotals) -> bool;

/// A named milestone and the condition that unlocks it.
#[derive(Clone, Copy)]
pub struct AchievementRule {
    pub id: AchievementId,
    pub name: &'static str,
    pub description: &'static str,
    /// Whether unlocking should trigger the celebration effect.
    pub celebrates: bool,
    predicate: Predicate,
}

impl AchievementRule {
    #[must_use]
    pub fn is_satisfied(&self, progress: &GameProgress, totals: &ContentTotals) -> bool {
        (self.predicate)(progress, totals)
    }
}

impl fmt::Debug for AchievementRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AchievementRule")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("celebrates", &self.celebrates)
            .finish_non_exhaustive()
    }
}

// Count-based rules stay false until content is known, so an empty feed
// cannot make `discovered == total` hold at zero.
fn first_treasure(progress: &GameProgress, totals: &ContentTotals) -> bool {
    totals.content_loaded() && progress.discovered_count() == FIRST_TREASURE_COUNT
}

fn half_way(progress: &GameProgress, totals: &ContentTotals) -> bool {
    totals.content_loaded() && progress.discovered_count() == HALF_WAY_COUNT
}

fn treasure_hunter(progress: &GameProgress, totals: &ContentTotals) -> bool {
    totals.content_loaded() && progress.discovered_count() == totals.total_treasures
}

fn scholar(progress: &GameProgress, _totals: &ContentTotals) -> bool {
    progress.total_score() >= SCHOLAR_SCORE
}

fn perfect_score(progress: &GameProgress, _totals: &ContentTotals) -> bool {
    progress.total_score() >= PERFECT_SCORE
}

fn hotel_master(progress: &GameProgress, totals: &ContentTotals) -> bool {
    totals.content_loaded()
        && !totals.designated_treasures.is_empty()
        && totals
            .designated_treasures
            .iter()
            .all(|id| progress.has_discovered(id))
}

pub static ACHIEVEMENTS: [AchievementRule; 6] = [
    AchievementRule {
        id: AchievementId::FirstTreasure,
        name: "First Discovery",
        description: "Discover your first treasure",
        celebrates: true,
        predicate: first_treasure,
    },
    AchievementRule {
        id: AchievementId::HalfWay,
        name: "Halfway There",
        description: "Discover 6 treasures",
        celebrates: true,
        predicate: half_way,
    },
    AchievementRule {
        id: AchievementId::TreasureHunter,
        name: "Treasure Hunter",
        description: "Discover every treasure",
        celebrates: true,
        predicate: treasure_hunter,
    },
    AchievementRule {
        id: AchievementId::Scholar,
        name: "English Scholar",
        description: "Get 50 points",
        celebrates: false,
        predicate: scholar,
    },
    AchievementRule {
        id: AchievementId::PerfectScore,
        name: "Perfect Score",
        description: "Get 100 points",
        celebrates: true,
        predicate: perfect_score,
    },
    AchievementRule {
        id: AchievementId::HotelMaster,
        name: "Hotel Master",
        description: "Discover all Hotel Lobby treasures",
        celebrates: true,
        predicate: hotel_master,
    },
];

/// Look up the catalog entry for `id`.
#[must_use]
pub fn rule(id: AchievementId) -> &'static AchievementRule {
    // The catalog is declared in `AchievementId::ALL` order.
    &ACHIEVEMENTS[id as usize]
}

/// Ids whose rule holds for `progress` and that are not yet unlocked,
/// in catalog order.
#[must_use]
pub fn newly_eligible(progress: &GameProgress, totals: &ContentTotals) -> Vec<AchievementId> {
    ACHIEVEMENTS
        .iter()
        .filter(|rule| !progress.has_achievement(rule.id.as_str()))
        .filter(|rule| rule.is_satisfied(progress, totals))
        .map(|rule| rule.id)
        .collect()
}

/// Evaluates the fixed rule set against a session's content totals.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AchievementEvaluator {
    totals: ContentTotals,
}

impl AchievementEvaluator {
    #[must_use]
    pub const fn new(totals: ContentTotals) -> Self {
        Self { totals }
    }

    #[must_use]
    pub fn from_content(content: &GameContent, designated_scenario: &str) -> Self {
        Self::new(ContentTotals::from_content(content, designated_scenario))
    }

    #[must_use]
    pub fn evaluate(&self, progress: &GameProgress) -> Vec<AchievementId> {
        newly_eligible(progress, &self.totals)
    }
}

/// Catalog entry paired with whether the player holds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementStatus {
    pub id: AchievementId,
    pub name: &'static str,
    pub description: &'static str,
    pub unlocked: bool,
}

/// The whole catalog annotated with unlock state, for glossary views.
#[must_use]
pub fn achievement_board(progress: &GameProgress) -> Vec<AchievementStatus> {
    ACHIEVEMENTS
        .iter()
        .map(|rule| AchievementStatus {
            id: rule.id,
            name: rule.name,
            description: rule.description,
            unlocked: progress.has_achievement(rule.id.as_str()),
        })
        .collect()
}
