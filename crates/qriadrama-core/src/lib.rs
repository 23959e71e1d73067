//! Qriadrama Core — shared script model and boundary traits.
//!
//! This crate defines the data a script is made of and the traits the
//! playback core uses to talk to the outside world: where scripts come from
//! (`ScriptProvider`), where revealed text goes (`Presenter`), how reveal
//! ticks are timed (`TickScheduler`), and what time it is (`Clock`). It
//! contains no I/O.

pub mod clock;
pub mod error;
pub mod presenter;
pub mod provider;
pub mod schedule;
pub mod script;
pub mod style;
