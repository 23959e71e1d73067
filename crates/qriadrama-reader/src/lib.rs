//! Qriadrama terminal reader.
//!
//! Lists the script library and plays one script at a time in the terminal,
//! one line per advance.

pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod presenter;
