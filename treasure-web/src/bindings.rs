//! JavaScript-facing facade for the presentation layer.
//!
//! Every method returns plain JS objects (camelCase keys) built with
//! `serde-wasm-bindgen`; errors surface as rejected values carrying a message.
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::game::{
    GameEngine, JsClock, TreasureSession, WebContentLoader, WebProgressStorage,
    create_web_game_engine,
};

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|err| JsValue::from_str(&err.to_string()))
}

fn start(engine: &GameEngine<WebContentLoader, WebProgressStorage>) -> TreasureHunt {
    let session = engine.start_session(JsClock).unwrap_or_else(|err| {
        log::error!("Failed to load game content: {err}");
        engine.start_session_without_content(JsClock)
    });
    TreasureHunt { session }
}

/// One player's session: progress, achievements and the scenario content.
#[wasm_bindgen]
pub struct TreasureHunt {
    session: TreasureSession<WebProgressStorage, JsClock>,
}

#[wasm_bindgen]
impl TreasureHunt {
    /// Open a session over the bundled content and saved progress.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> Self {
        start(&create_web_game_engine(WebContentLoader::bundled()))
    }

    /// Open a session over a content document supplied by the page.
    #[wasm_bindgen(js_name = fromContent)]
    #[must_use]
    pub fn from_content(content_json: &str) -> Self {
        start(&create_web_game_engine(WebContentLoader::from_json(
            content_json,
        )))
    }

    #[wasm_bindgen(js_name = clickTreasure)]
    pub fn click_treasure(&mut self, treasure_id: &str) -> Result<JsValue, JsValue> {
        let outcome = self
            .session
            .click_treasure(treasure_id)
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        to_js(&outcome)
    }

    #[wasm_bindgen(js_name = answerQuiz)]
    pub fn answer_quiz(&mut self, treasure_id: &str, choice: usize) -> Result<JsValue, JsValue> {
        let outcome = self
            .session
            .answer_quiz(treasure_id, choice)
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        to_js(&outcome)
    }

    pub fn reset(&mut self) -> Result<JsValue, JsValue> {
        to_js(self.session.reset())
    }

    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        to_js(self.session.snapshot())
    }

    pub fn summary(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.summary())
    }

    pub fn achievements(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.achievements())
    }

    pub fn content(&self) -> Result<JsValue, JsValue> {
        to_js(self.session.content())
    }

    #[wasm_bindgen(js_name = storageDegraded)]
    #[must_use]
    pub fn storage_degraded(&self) -> bool {
        self.session.storage_degraded()
    }
}

impl Default for TreasureHunt {
    fn default() -> Self {
        Self::new()
    }
}

/// Fetch content from `url` and open a session over it.
/// A failed fetch still opens a session, with no scenarios.
#[wasm_bindgen(js_name = loadTreasureHunt)]
#[allow(clippy::future_not_send)] // Wasm futures rely on `JsFuture`, which is not `Send`.
pub async fn load_treasure_hunt(url: String) -> TreasureHunt {
    match WebContentLoader::fetch(&url).await {
        Ok(loader) => start(&create_web_game_engine(loader)),
        Err(err) => {
            log::error!("Failed to load game content: {err}");
            let engine = create_web_game_engine(WebContentLoader::bundled());
            TreasureHunt {
                session: engine.start_session_without_content(JsClock),
            }
        }
    }
}
