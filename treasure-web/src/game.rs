//! Web-specific game engine implementation
//!
//! This module provides web-specific implementations of the treasure-game traits
//! and re-exports the core game logic types.

// Re-export all types from treasure-game
pub use treasure_game::*;

use crate::dom;

const BUNDLED_CONTENT: &str = include_str!("../static/assets/data/game-content.json");
const BUNDLED_CONFIG: &str = include_str!("../static/assets/data/config.json");

/// Web-specific content loader backed by a JSON document.
/// Defaults to the content bundled with the build.
pub struct WebContentLoader {
    content_json: String,
}

#[derive(Debug, thiserror::Error)]
pub enum WebContentError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl WebContentLoader {
    /// Loader over the bundled `game-content.json`.
    #[must_use]
    pub fn bundled() -> Self {
        Self::from_json(BUNDLED_CONTENT)
    }

    /// Loader over an already-fetched content document.
    #[must_use]
    pub fn from_json(content_json: impl Into<String>) -> Self {
        Self {
            content_json: content_json.into(),
        }
    }

    /// Fetch the content document from `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; parse errors surface later
    /// from [`ContentLoader::load_content`].
    #[allow(clippy::future_not_send)] // Wasm futures rely on `JsFuture`, which is not `Send`.
    pub async fn fetch(url: &str) -> Result<Self, WebContentError> {
        let json = dom::fetch_text(url)
            .await
            .map_err(|err| WebContentError::Network(dom::js_error_message(&err)))?;
        Ok(Self::from_json(json))
    }
}

impl ContentLoader for WebContentLoader {
    type Error = WebContentError;

    fn load_content(&self) -> Result<GameContent, Self::Error> {
        GameContent::from_json(&self.content_json).map_err(WebContentError::Json)
    }

    fn load_config(&self) -> Result<GameConfig, Self::Error> {
        GameConfig::from_json(BUNDLED_CONFIG).map_err(WebContentError::Json)
    }
}

/// Web-specific progress storage using localStorage
#[derive(Debug, Clone, Copy, Default)]
pub struct WebProgressStorage;

#[derive(Debug, thiserror::Error)]
pub enum WebStorageError {
    #[error("Storage error: {0}")]
    Storage(String),
}

impl WebProgressStorage {
    fn handle() -> Result<web_sys::Storage, WebStorageError> {
        dom::local_storage().map_err(|e| WebStorageError::Storage(dom::js_error_message(&e)))
    }
}

impl KeyValueStore for WebProgressStorage {
    type Error = WebStorageError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Self::handle()?
            .get_item(key)
            .map_err(|e| WebStorageError::Storage(dom::js_error_message(&e)))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        Self::handle()?
            .set_item(key, value)
            .map_err(|e| WebStorageError::Storage(dom::js_error_message(&e)))
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        Self::handle()?
            .remove_item(key)
            .map_err(|e| WebStorageError::Storage(dom::js_error_message(&e)))
    }
}

/// Clock reading `Date.now()`; the system clock is unavailable on `wasm32-unknown-unknown`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsClock;

impl Clock for JsClock {
    #[allow(clippy::cast_possible_truncation)]
    fn now_millis(&self) -> i64 {
        js_sys::Date::now() as i64
    }
}

/// Create a web-compatible game engine with `WebContentLoader` and `WebProgressStorage`
#[must_use]
pub fn create_web_game_engine(
    loader: WebContentLoader,
) -> treasure_game::GameEngine<WebContentLoader, WebProgressStorage> {
    treasure_game::GameEngine::new(loader, WebProgressStorage)
}
