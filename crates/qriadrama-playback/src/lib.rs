//! Qriadrama — script playback.
//!
//! Responsible for traversing a script line by line, revealing each line
//! character by character, honouring advance requests, and detecting the end
//! of the script. Rendering and data retrieval stay behind the traits in
//! `qriadrama-core`.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
