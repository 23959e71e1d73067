//! Playback domain: the reveal engine and the session state machine.

pub mod reveal;
pub mod session;
