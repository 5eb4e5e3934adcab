//! Treasure Hunt Game Engine
//!
//! Platform-agnostic progress tracking and achievement evaluation for the
//! Treasure Hunt vocabulary game. This crate owns discovery state, scoring,
//! quiz completion and achievement unlocking, without UI or
//! platform-specific dependencies.

pub mod achievements;
pub mod clock;
pub mod config;
pub mod constants;
pub mod content;
pub mod progress;
pub mod record;
pub mod session;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use achievements::{
    ACHIEVEMENTS, AchievementEvaluator, AchievementId, AchievementRule, AchievementStatus,
    ContentTotals, achievement_board, newly_eligible,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::GameConfig;
pub use content::{GameContent, Quiz, Scenario, Treasure};
pub use progress::GameProgress;
pub use record::RecordError;
pub use session::{
    DiscoveryOutcome, ProgressSummary, QuizOutcome, ScenarioProgress, SessionError,
    TreasureSession,
};
pub use storage::{KeyValueStore, MemoryStore, MemoryStoreError};
pub use store::ProgressStore;

/// Trait for abstracting content loading operations
/// Platform-specific implementations should provide this
pub trait ContentLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the scenario feed from the platform-specific source
    ///
    /// # Errors
    ///
    /// Returns an error if the content cannot be loaded or parsed.
    fn load_content(&self) -> Result<GameContent, Self::Error>;

    /// Load session configuration. Defaults apply unless overridden.
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration source exists but cannot be parsed.
    fn load_config(&self) -> Result<GameConfig, Self::Error> {
        Ok(GameConfig::default())
    }
}

/// Main game engine for opening treasure-hunt sessions
pub struct GameEngine<L, S>
where
    L: ContentLoader,
    S: KeyValueStore + Clone,
{
    content_loader: L,
    storage: S,
}

impl<L, S> GameEngine<L, S>
where
    L: ContentLoader,
    S: KeyValueStore + Clone,
{
    /// Create a new game engine with the provided content loader and storage
    pub const fn new(content_loader: L, storage: S) -> Self {
        Self {
            content_loader,
            storage,
        }
    }

    /// Load content and configuration, then open a session over the stored progress.
    ///
    /// # Errors
    ///
    /// Returns an error if content or configuration cannot be loaded.
    pub fn start_session<C: Clock>(&self, clock: C) -> Result<TreasureSession<S, C>, L::Error> {
        let config = self.content_loader.load_config()?;
        let content = self.content_loader.load_content()?;
        Ok(TreasureSession::open(
            self.storage.clone(),
            clock,
            content,
            config,
        ))
    }

    /// Open a session with no scenarios, for when the content feed failed.
    /// Progress still loads and persists; count-based achievements stay locked.
    pub fn start_session_without_content<C: Clock>(&self, clock: C) -> TreasureSession<S, C> {
        let config = self.content_loader.load_config().unwrap_or_else(|err| {
            log::warn!("falling back to default config: {err}");
            GameConfig::default()
        });
        TreasureSession::open(self.storage.clone(), clock, GameContent::empty(), config)
    }
}
