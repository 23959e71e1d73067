//! Playback application layer: loading scripts and driving sessions in time.

pub mod loader;
pub mod player;
