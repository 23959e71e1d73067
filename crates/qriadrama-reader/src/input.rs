//! Keyboard input: raw mode and key-to-action mapping.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use qriadrama_playback::application::player::AdvanceHandle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// What a key press asks the player to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Advance,
    Quit,
}

/// Maps a key event to an action. Releases and repeats are ignored.
#[must_use]
pub fn key_action(key: KeyEvent) -> Option<KeyAction> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) | (KeyCode::Esc | KeyCode::Char('q'), _) => {
            Some(KeyAction::Quit)
        }
        (KeyCode::Char(' ') | KeyCode::Enter, _) => Some(KeyAction::Advance),
        _ => None,
    }
}

/// Keeps the terminal in raw mode until dropped.
#[derive(Debug)]
pub struct RawModeGuard(());

impl RawModeGuard {
    /// Enables raw mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal does not support raw mode.
    pub fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self(()))
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(error) = terminal::disable_raw_mode() {
            warn!(%error, "failed to restore terminal mode");
        }
    }
}

/// Forwards key presses to the player until it stops or the reader quits.
#[must_use]
pub fn spawn_key_reader(handle: AdvanceHandle) -> JoinHandle<io::Result<()>> {
    tokio::task::spawn_blocking(move || {
        while !handle.is_closed() {
            if !event::poll(POLL_INTERVAL)? {
                continue;
            }
            let Event::Key(key) = event::read()? else {
                continue;
            };
            match key_action(key) {
                Some(KeyAction::Advance) => {
                    if !handle.request_advance() {
                        break;
                    }
                }
                Some(KeyAction::Quit) => {
                    debug!("quit requested from keyboard");
                    if !handle.quit() {
                        debug!("player already stopped");
                    }
                    break;
                }
                None => {}
            }
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_space_and_enter_advance() {
        assert_eq!(
            key_action(press(KeyCode::Char(' '), KeyModifiers::NONE)),
            Some(KeyAction::Advance)
        );
        assert_eq!(
            key_action(press(KeyCode::Enter, KeyModifiers::NONE)),
            Some(KeyAction::Advance)
        );
    }

    #[test]
    fn test_escape_q_and_ctrl_c_quit() {
        assert_eq!(
            key_action(press(KeyCode::Esc, KeyModifiers::NONE)),
            Some(KeyAction::Quit)
        );
        assert_eq!(
            key_action(press(KeyCode::Char('q'), KeyModifiers::NONE)),
            Some(KeyAction::Quit)
        );
        assert_eq!(
            key_action(press(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(KeyAction::Quit)
        );
    }

    #[test]
    fn test_other_keys_do_nothing() {
        assert_eq!(key_action(press(KeyCode::Char('c'), KeyModifiers::NONE)), None);
        assert_eq!(key_action(press(KeyCode::Left, KeyModifiers::NONE)), None);
    }

    #[test]
    fn test_key_release_is_ignored() {
        let mut key = press(KeyCode::Enter, KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;

        assert_eq!(key_action(key), None);
    }
}
