//! Progress store: owns the session snapshot and keeps durable storage in step.
use log::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::progress::GameProgress;
use crate::record;
use crate::storage::KeyValueStore;

/// Owns the single [`GameProgress`] snapshot for a session.
///
/// Every mutation writes the snapshot back before returning. A failed
/// write is logged and the in-memory snapshot stays authoritative; the
/// store reports the degraded state through [`ProgressStore::storage_degraded`].
#[derive(Debug)]
pub struct ProgressStore<S, C = SystemClock>
where
    S: KeyValueStore,
    C: Clock,
{
    storage: S,
    clock: C,
    key: String,
    progress: GameProgress,
    degraded: bool,
}

impl<S, C> ProgressStore<S, C>
where
    S: KeyValueStore,
    C: Clock,
{
    /// Create a store bound to `key` and load whatever is persisted there.
    pub fn open(storage: S, clock: C, key: impl Into<String>) -> Self {
        let key = key.into();
        let progress = read_progress(&storage, &clock, &key);
        Self {
            storage,
            clock,
            key,
            progress,
            degraded: false,
        }
    }

    /// Re-read the durable record, replacing the in-memory snapshot.
    /// A missing or malformed record yields defaults and is not written back.
    pub fn load(&mut self) -> &GameProgress {
        self.progress = read_progress(&self.storage, &self.clock, &self.key);
        &self.progress
    }

    /// Current snapshot.
    #[must_use]
    pub const fn snapshot(&self) -> &GameProgress {
        &self.progress
    }

    /// Mark `treasure_id` discovered. Points count only on the first discovery.
    pub fn discover_treasure(&mut self, treasure_id: &str, points: u32) -> &GameProgress {
        if self.progress.record_discovery(treasure_id, points) {
            debug!("discovered {treasure_id} (+{points})");
        }
        self.persist();
        &self.progress
    }

    /// Mark the quiz for `treasure_id` completed. The bonus counts only once.
    pub fn complete_quiz(&mut self, treasure_id: &str, bonus_points: u32) -> &GameProgress {
        if self.progress.record_quiz(treasure_id, bonus_points) {
            debug!("completed quiz {treasure_id} (+{bonus_points})");
        }
        self.persist();
        &self.progress
    }

    pub fn unlock_achievement(&mut self, achievement_id: &str) -> &GameProgress {
        if self.progress.record_achievement(achievement_id) {
            debug!("unlocked achievement {achievement_id}");
        }
        self.persist();
        &self.progress
    }

    /// Return to defaults and purge the durable entry before writing the
    /// default snapshot, so a later load in a fresh process starts empty.
    pub fn reset(&mut self) -> &GameProgress {
        self.progress = GameProgress::new(self.clock.now_millis());
        if let Err(err) = self.storage.remove(&self.key) {
            warn!("failed to erase progress under {}: {err}", self.key);
        }
        self.persist();
        &self.progress
    }

    /// Whether the most recent durable write failed.
    #[must_use]
    pub const fn storage_degraded(&self) -> bool {
        self.degraded
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    fn persist(&mut self) {
        self.progress.touch(self.clock.now_millis());
        let written = record::encode(&self.progress)
            .map_err(|err| err.to_string())
            .and_then(|json| {
                self.storage
                    .set(&self.key, &json)
                    .map_err(|err| err.to_string())
            });
        match written {
            Ok(()) => self.degraded = false,
            Err(err) => {
                warn!("progress not persisted under {}: {err}", self.key);
                self.degraded = true;
            }
        }
    }
}

fn read_progress<S, C>(storage: &S, clock: &C, key: &str) -> GameProgress
where
    S: KeyValueStore,
    C: Clock,
{
    match storage.get(key) {
        Ok(Some(raw)) => record::decode(&raw).unwrap_or_else(|err| {
            warn!("discarding saved progress under {key}: {err}");
            GameProgress::new(clock.now_millis())
        }),
        Ok(None) => GameProgress::new(clock.now_millis()),
        Err(err) => {
            warn!("could not read saved progress under {key}: {err}");
            GameProgress::new(clock.now_millis())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::constants::STORAGE_KEY;
    use crate::storage::MemoryStore;

    fn fresh() -> (ProgressStore<MemoryStore, ManualClock>, MemoryStore, ManualClock) {
        let storage = MemoryStore::new();
        let clock = ManualClock::starting_at(1_000);
        let store = ProgressStore::open(storage.clone(), clock.clone(), STORAGE_KEY);
        (store, storage, clock)
    }

    #[test]
    fn open_on_empty_storage_does_not_write() {
        let (store, storage, _) = fresh();
        assert!(store.snapshot().is_blank());
        assert_eq!(store.snapshot().last_updated(), 1_000);
        assert!(!storage.contains(STORAGE_KEY));
    }

    #[test]
    fn repeat_discovery_still_persists() {
        let (mut store, storage, clock) = fresh();
        store.discover_treasure("t1", 10);
        clock.advance(500);
        let progress = store.discover_treasure("t1", 10);
        assert_eq!(progress.total_score(), 10);
        assert_eq!(progress.last_updated(), 1_500);
        let saved = record::decode(&storage.raw(STORAGE_KEY).unwrap()).unwrap();
        assert_eq!(saved.last_updated(), 1_500);
    }

    #[test]
    fn malformed_record_loads_defaults_without_rewriting() {
        let (mut store, storage, _) = fresh();
        storage.insert_raw(STORAGE_KEY, "{\"discoveredTreasures\": [\"t1\"");
        assert!(store.load().is_blank());
        assert_eq!(
            storage.raw(STORAGE_KEY).as_deref(),
            Some("{\"discoveredTreasures\": [\"t1\"")
        );
    }

    #[test]
    fn write_failure_keeps_memory_authoritative() {
        let (mut store, storage, _) = fresh();
        storage.set_unavailable(true);
        store.discover_treasure("t1", 10);
        assert!(store.storage_degraded());
        assert_eq!(store.snapshot().total_score(), 10);
        assert!(!storage.contains(STORAGE_KEY));

        storage.set_unavailable(false);
        store.complete_quiz("t1", 5);
        assert!(!store.storage_degraded());
        let saved = record::decode(&storage.raw(STORAGE_KEY).unwrap()).unwrap();
        assert_eq!(saved.total_score(), 15);
    }

    #[test]
    fn reset_writes_defaults_over_old_record() {
        let (mut store, storage, _) = fresh();
        store.discover_treasure("t1", 10);
        store.unlock_achievement("first-treasure");
        assert!(store.reset().is_blank());
        let saved = record::decode(&storage.raw(STORAGE_KEY).unwrap()).unwrap();
        assert!(saved.is_blank());
    }

    #[test]
    fn custom_key_is_respected() {
        let storage = MemoryStore::new();
        let mut store = ProgressStore::open(storage.clone(), ManualClock::default(), "slot-b");
        store.discover_treasure("t1", 1);
        assert_eq!(store.key(), "slot-b");
        assert!(storage.contains("slot-b"));
        assert!(!storage.contains(STORAGE_KEY));
    }
}
