use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use treasure_game::record;
use treasure_game::{
    AchievementId, GameConfig, GameContent, GameProgress, KeyValueStore, ManualClock,
    ProgressSummary, SessionError, TreasureSession,
};

use crate::storage::FileStore;

/// Milliseconds the replay clock moves forward per action.
const ACTION_TICK_MILLIS: i64 = 1_000;
const REPLAY_EPOCH_MILLIS: i64 = 1_700_000_000_000;

/// Immutable content and configuration shared by every playthrough.
#[derive(Debug, Clone)]
pub struct TesterAssets {
    content: GameContent,
    config: GameConfig,
}

impl TesterAssets {
    /// Load the bundled web assets, falling back to defaults when a file is
    /// missing or malformed.
    pub fn load_default() -> Self {
        let base = Self::assets_data_root();
        let content =
            Self::load_content_from(&base.join("game-content.json")).unwrap_or_else(|err| {
                log::warn!("bundled content unavailable: {err:#}");
                GameContent::empty()
            });
        let config = Self::load_config_from(&base.join("config.json")).unwrap_or_else(|err| {
            log::warn!("bundled config unavailable: {err:#}");
            GameConfig::default()
        });
        Self { content, config }
    }

    /// Load content from an explicit file, keeping the bundled configuration.
    pub fn with_content_file(path: &Path) -> Result<Self> {
        let content = Self::load_content_from(path)?;
        let config = Self::load_config_from(&Self::assets_data_root().join("config.json"))
            .unwrap_or_default();
        Ok(Self { content, config })
    }

    pub const fn content(&self) -> &GameContent {
        &self.content
    }

    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    fn assets_data_root() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("treasure-web")
            .join("static")
            .join("assets")
            .join("data")
    }

    fn load_content_from(path: &Path) -> Result<GameContent> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        GameContent::from_json(&json).with_context(|| format!("parsing {}", path.display()))
    }

    fn load_config_from(path: &Path) -> Result<GameConfig> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        GameConfig::from_json(&json).with_context(|| format!("parsing {}", path.display()))
    }
}

/// One scripted player action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Click(String),
    /// Click the first `n` treasures in content order.
    ClickFirst(usize),
    ClickScenario(String),
    ClickAll,
    Answer(String, usize),
    AnswerCorrect(String),
    AnswerWrong(String),
    /// Answer the first `n` quizzes in content order correctly.
    AnswerFirst(usize),
    AnswerAllCorrect,
    Reset,
    /// Drop the session and open a new one over the same store.
    Reload,
    /// Overwrite the saved record with raw text, then reload.
    CorruptSave(String),
}

/// Declarative plan for one playthrough.
#[derive(Debug, Clone, Default)]
pub struct PlaythroughPlan {
    pub actions: Vec<Action>,
    pub expectations: Vec<PlaythroughExpectation>,
}

impl PlaythroughPlan {
    #[must_use]
    pub fn new(actions: Vec<Action>) -> Self {
        Self {
            actions,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub fn then(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<PlaythroughExpectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }
}

/// Assertion hook run after a playthrough completes.
type PlaythroughExpectationFn =
    Arc<dyn Fn(&PlaythroughSummary) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct PlaythroughExpectation(PlaythroughExpectationFn);

impl std::fmt::Debug for PlaythroughExpectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaythroughExpectation").finish()
    }
}

impl PlaythroughExpectation {
    pub fn evaluate(&self, summary: &PlaythroughSummary) -> Result<()> {
        (self.0)(summary)
    }
}

impl<F> From<F> for PlaythroughExpectation
where
    F: Fn(&PlaythroughSummary) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(f))
    }
}

/// Complete record of a playthrough.
#[derive(Debug, Clone)]
pub struct PlaythroughSummary {
    pub steps: usize,
    pub progress: GameProgress,
    /// Unlocks in the order they were reported, across reloads.
    pub unlock_log: Vec<AchievementId>,
    /// Number of outcomes that asked for a celebration.
    pub celebrations: usize,
    pub correct_answers: usize,
    pub wrong_answers: usize,
    pub rejected: Vec<SessionError>,
    pub storage_degraded: bool,
    /// What a fresh process would load from disk after the run.
    pub persisted: Option<GameProgress>,
    pub overview: ProgressSummary,
}

impl PlaythroughSummary {
    pub fn unlocked(&self, id: AchievementId) -> bool {
        self.unlock_log.contains(&id)
    }

    pub fn unlock_count(&self, id: AchievementId) -> usize {
        self.unlock_log.iter().filter(|entry| **entry == id).count()
    }
}

/// Headless runner replaying plans against a file-backed store.
#[derive(Debug, Clone)]
pub struct GameTester {
    assets: Arc<TesterAssets>,
    verbose: bool,
}

impl GameTester {
    pub const fn new(assets: Arc<TesterAssets>, verbose: bool) -> Self {
        Self { assets, verbose }
    }

    pub fn assets(&self) -> &TesterAssets {
        &self.assets
    }

    /// Replay `plan` against a store rooted at `store_dir`. Any previous
    /// record in that directory is discarded first.
    pub fn run_plan(&self, plan: &PlaythroughPlan, store_dir: &Path) -> Result<PlaythroughSummary> {
        match fs::remove_dir_all(store_dir) {
            Err(err) if err.kind() != ErrorKind::NotFound => {
                return Err(err).with_context(|| format!("clearing {}", store_dir.display()));
            }
            _ => {}
        }

        let store = FileStore::new(store_dir);
        let clock = ManualClock::starting_at(REPLAY_EPOCH_MILLIS);
        let mut run = Playthrough {
            tester: self,
            store: store.clone(),
            clock: clock.clone(),
            session: self.open_session(&store, &clock),
            unlock_log: Vec::new(),
            celebrations: 0,
            correct_answers: 0,
            wrong_answers: 0,
            rejected: Vec::new(),
        };
        run.absorb_opening_unlocks();

        for action in &plan.actions {
            clock.advance(ACTION_TICK_MILLIS);
            run.apply(action)?;
        }

        let durable = run.session.store();
        let key = durable.key();
        let persisted = durable
            .storage()
            .get(key)
            .with_context(|| format!("reading back {key}"))?
            .and_then(|raw| record::decode(&raw).ok());

        Ok(PlaythroughSummary {
            steps: plan.actions.len(),
            progress: run.session.snapshot().clone(),
            unlock_log: run.unlock_log,
            celebrations: run.celebrations,
            correct_answers: run.correct_answers,
            wrong_answers: run.wrong_answers,
            rejected: run.rejected,
            storage_degraded: run.session.storage_degraded(),
            persisted,
            overview: run.session.summary(),
        })
    }

    fn open_session(
        &self,
        store: &FileStore,
        clock: &ManualClock,
    ) -> TreasureSession<FileStore, ManualClock> {
        TreasureSession::open(
            store.clone(),
            clock.clone(),
            self.assets.content.clone(),
            self.assets.config.clone(),
        )
    }

    fn treasure_ids(&self) -> impl Iterator<Item = &str> {
        self.assets
            .content
            .scenarios
            .iter()
            .flat_map(|scenario| scenario.treasures.iter())
            .map(|treasure| treasure.id.as_str())
    }
}

struct Playthrough<'a> {
    tester: &'a GameTester,
    store: FileStore,
    clock: ManualClock,
    session: TreasureSession<FileStore, ManualClock>,
    unlock_log: Vec<AchievementId>,
    celebrations: usize,
    correct_answers: usize,
    wrong_answers: usize,
    rejected: Vec<SessionError>,
}

impl Playthrough<'_> {
    fn apply(&mut self, action: &Action) -> Result<()> {
        if self.tester.verbose {
            log::info!("action {action:?}");
        }
        match action {
            Action::Click(id) => self.click(id),
            Action::ClickFirst(count) => {
                let ids: Vec<String> = self
                    .tester
                    .treasure_ids()
                    .take(*count)
                    .map(str::to_string)
                    .collect();
                ids.iter().for_each(|id| self.click(id));
            }
            Action::ClickScenario(scenario_id) => {
                let ids: Vec<String> = self
                    .tester
                    .assets
                    .content
                    .scenario(scenario_id)
                    .map(|scenario| scenario.treasures.iter().map(|t| t.id.clone()).collect())
                    .unwrap_or_default();
                ids.iter().for_each(|id| self.click(id));
            }
            Action::ClickAll => {
                let ids: Vec<String> = self.tester.treasure_ids().map(str::to_string).collect();
                ids.iter().for_each(|id| self.click(id));
            }
            Action::Answer(id, choice) => self.answer(id, *choice),
            Action::AnswerCorrect(id) => self.answer_by(id, true),
            Action::AnswerWrong(id) => self.answer_by(id, false),
            Action::AnswerFirst(count) => {
                let ids: Vec<String> = self
                    .tester
                    .treasure_ids()
                    .take(*count)
                    .map(str::to_string)
                    .collect();
                ids.iter().for_each(|id| self.answer_by(id, true));
            }
            Action::AnswerAllCorrect => {
                let ids: Vec<String> = self.tester.treasure_ids().map(str::to_string).collect();
                ids.iter().for_each(|id| self.answer_by(id, true));
            }
            Action::Reset => {
                self.session.reset();
            }
            Action::Reload => self.reload(),
            Action::CorruptSave(raw) => {
                let key = &self.tester.assets.config.storage_key;
                self.store
                    .set(key, raw)
                    .with_context(|| format!("overwriting {key}"))?;
                self.reload();
            }
        }
        Ok(())
    }

    fn click(&mut self, treasure_id: &str) {
        match self.session.click_treasure(treasure_id) {
            Ok(outcome) => {
                self.celebrations += usize::from(outcome.celebrate);
                self.unlock_log.extend(outcome.unlocked);
            }
            Err(err) => self.reject(err),
        }
    }

    fn answer(&mut self, treasure_id: &str, choice: usize) {
        match self.session.answer_quiz(treasure_id, choice) {
            Ok(outcome) => {
                if outcome.correct {
                    self.correct_answers += 1;
                } else {
                    self.wrong_answers += 1;
                }
                self.celebrations += usize::from(outcome.celebrate);
                self.unlock_log.extend(outcome.unlocked);
            }
            Err(err) => self.reject(err),
        }
    }

    fn answer_by(&mut self, treasure_id: &str, correct: bool) {
        let Some(quiz) = self
            .tester
            .assets
            .content
            .find_treasure(treasure_id)
            .map(|treasure| &treasure.quiz)
        else {
            self.reject(SessionError::UnknownTreasure(treasure_id.to_string()));
            return;
        };
        let choice = if correct || quiz.options.len() < 2 {
            quiz.correct_answer
        } else {
            (quiz.correct_answer + 1) % quiz.options.len()
        };
        self.answer(treasure_id, choice);
    }

    fn reject(&mut self, err: SessionError) {
        log::debug!("action rejected: {err}");
        self.rejected.push(err);
    }

    fn reload(&mut self) {
        self.session = self.tester.open_session(&self.store, &self.clock);
        self.absorb_opening_unlocks();
    }

    /// Opening a session syncs achievements; unlocks recorded there were
    /// earned by earlier actions and belong in the log too.
    fn absorb_opening_unlocks(&mut self) {
        for id in AchievementId::ALL {
            let recorded = self.session.snapshot().has_achievement(id.as_str());
            if recorded && !self.unlock_log.contains(&id) {
                self.unlock_log.push(id);
            }
        }
    }
}
