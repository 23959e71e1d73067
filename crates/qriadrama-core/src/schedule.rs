//! Periodic tick scheduling.
//!
//! The reveal engine never sleeps itself. It asks a scheduler for a
//! repeating tick and holds on to the returned handle for as long as the
//! reveal runs.

use std::time::Duration;

/// Schedules repeating reveal ticks.
pub trait TickScheduler: Send {
    /// Handle to one scheduled tick stream. Dropping it cancels the stream:
    /// no tick scheduled through it is delivered after the drop returns.
    type Handle: Send;

    /// Starts delivering ticks tagged with `generation`, one every `period`,
    /// the first one `period` from now.
    fn schedule(&mut self, period: Duration, generation: u64) -> Self::Handle;
}
