//! Time source used to stamp persisted progress.
use std::cell::Cell;
use std::rc::Rc;

/// Supplies the current time as epoch milliseconds.
/// Platform shells provide their own implementation where the system clock
/// is unavailable (e.g. `wasm32-unknown-unknown`).
pub trait Clock {
    fn now_millis(&self) -> i64;
}

/// Wall clock backed by the host system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Manually driven clock for deterministic tests and replays.
/// Clones share the same underlying time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<i64>>,
}

impl ManualClock {
    #[must_use]
    pub fn starting_at(millis: i64) -> Self {
        Self {
            now: Rc::new(Cell::new(millis)),
        }
    }

    pub fn set(&self, millis: i64) {
        self.now.set(millis);
    }

    pub fn advance(&self, millis: i64) {
        self.now.set(self.now.get().saturating_add(millis));
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.get()
    }
}
