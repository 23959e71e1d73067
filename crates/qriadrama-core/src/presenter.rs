//! Presentation boundary.

use crate::style::RoleStyle;

/// Receives everything the playback core wants shown.
///
/// Implementations render; they never drive the session back. The only input
/// edge into the core is an advance request.
pub trait Presenter: Send {
    /// The current line's revealed prefix grew, or was completed at once.
    fn on_line_changed(&mut self, speaker: &str, revealed: &str, style: &RoleStyle);

    /// The current line is fully shown. Called once per line.
    fn on_line_fully_shown(&mut self);

    /// A new line became current. `current` is 1-based.
    fn on_progress(&mut self, current: usize, total: usize);

    /// The script is exhausted. Called once per session.
    fn on_finished(&mut self);
}
