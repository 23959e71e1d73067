//! Qriadrama — script content.
//!
//! Responsible for the on-disk layout of the script library and for serving
//! it through the `ScriptProvider` trait.

pub mod domain;
pub mod fs_provider;

pub use fs_provider::FsScriptProvider;
