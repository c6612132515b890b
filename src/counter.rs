//==============================================================================
// Static storage: the race counter
//==============================================================================

use std::sync::atomic::{AtomicU32, Ordering};

/// Constant metadata, baked into the binary.
pub const RACE_TYPE: &str = "Formula 1";

static RACE_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Handle to the process-wide race counter. Every increment goes through
/// here rather than touching the static directly.
#[derive(Debug, Clone, Copy)]
pub struct RaceContext {
    counter: &'static AtomicU32,
}

impl RaceContext {
    pub fn global() -> Self {
        Self::from_counter(&RACE_COUNTER)
    }

    pub fn from_counter(counter: &'static AtomicU32) -> Self {
        RaceContext { counter }
    }

    /// Counts one more race and returns the new total.
    pub fn start_race(&self) -> u32 {
        self.counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn races(&self) -> u32 {
        self.counter.load(Ordering::SeqCst)
    }

    pub fn race_type(&self) -> &'static str {
        RACE_TYPE
    }
}
