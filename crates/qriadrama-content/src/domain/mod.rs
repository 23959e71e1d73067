//! On-disk content model.

pub mod manifest;
