//! Manual tick scheduler — records scheduling instead of running timers.
//!
//! Tests deliver ticks themselves by calling the session's tick entry point
//! with the generation reported by `active()`.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use qriadrama_core::schedule::TickScheduler;

#[derive(Debug, Default)]
struct TickLog {
    scheduled: Vec<(u64, Duration)>,
    cancelled: Vec<u64>,
}

/// A scheduler that never fires on its own.
#[derive(Debug, Clone, Default)]
pub struct ManualTickScheduler {
    log: Arc<Mutex<TickLog>>,
}

impl ManualTickScheduler {
    /// Creates a scheduler with an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Generations scheduled so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn scheduled(&self) -> Vec<u64> {
        self.log
            .lock()
            .unwrap()
            .scheduled
            .iter()
            .map(|(generation, _)| *generation)
            .collect()
    }

    /// Period requested by the most recent `schedule` call.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn last_period(&self) -> Option<Duration> {
        self.log
            .lock()
            .unwrap()
            .scheduled
            .last()
            .map(|(_, period)| *period)
    }

    /// Generations whose handle has been dropped, in drop order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn cancelled(&self) -> Vec<u64> {
        self.log.lock().unwrap().cancelled.clone()
    }

    /// Generations scheduled and not yet cancelled.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn active(&self) -> Vec<u64> {
        let log = self.log.lock().unwrap();
        log.scheduled
            .iter()
            .map(|(generation, _)| *generation)
            .filter(|generation| !log.cancelled.contains(generation))
            .collect()
    }
}

/// Handle returned by `ManualTickScheduler`; records its own drop.
#[derive(Debug)]
pub struct ManualTickHandle {
    generation: u64,
    log: Arc<Mutex<TickLog>>,
}

impl Drop for ManualTickHandle {
    fn drop(&mut self) {
        if let Ok(mut log) = self.log.lock() {
            log.cancelled.push(self.generation);
        }
    }
}

impl TickScheduler for ManualTickScheduler {
    type Handle = ManualTickHandle;

    fn schedule(&mut self, period: Duration, generation: u64) -> Self::Handle {
        self.log
            .lock()
            .unwrap()
            .scheduled
            .push((generation, period));
        ManualTickHandle {
            generation,
            log: Arc::clone(&self.log),
        }
    }
}
