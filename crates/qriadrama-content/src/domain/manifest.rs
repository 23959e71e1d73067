//! Script directory manifest (`qd.json`) and chapter path rules.
//!
//! A script lives in its own directory under the data directory:
//!
//! ```text
//! data/
//!   <title>/
//!     qd.json        manifest
//!     <chapter>.json JSON array of {"speaker": "text"} objects
//!     <cover image>
//! ```

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use qriadrama_core::script::ScriptMeta;
use qriadrama_core::style::RoleStyle;
use serde::Deserialize;

/// File name of the manifest inside a script directory.
pub const MANIFEST_FILE: &str = "qd.json";

/// Contents of `qd.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptManifest {
    /// Display title. The directory name is what requests use.
    #[serde(default)]
    pub title: Option<String>,
    /// Chapter file played when no chapter is named.
    pub index: String,
    /// Cover image, relative to the script directory.
    #[serde(default)]
    pub cover: Option<String>,
    /// Optional blurb shown in the catalog.
    #[serde(default)]
    pub description: Option<String>,
    /// Speaker name to display style.
    #[serde(default)]
    pub roles: HashMap<String, RoleStyle>,
}

impl ScriptManifest {
    /// Metadata handed to the playback core alongside the lines.
    #[must_use]
    pub fn meta(&self) -> ScriptMeta {
        ScriptMeta {
            roles: self.roles.clone(),
        }
    }
}

/// Resolves `chapter` inside `script_dir`.
///
/// Returns `None` if the name is empty, absolute, or would leave the script
/// directory.
#[must_use]
pub fn chapter_path(script_dir: &Path, chapter: &str) -> Option<PathBuf> {
    let relative = Path::new(chapter);
    let mut components = relative.components().peekable();
    components.peek()?;
    if components.all(|c| matches!(c, Component::Normal(_) | Component::CurDir)) {
        Some(script_dir.join(relative))
    } else {
        None
    }
}

/// Whether `title` names a single directory entry.
#[must_use]
pub fn is_plain_title(title: &str) -> bool {
    let mut components = Path::new(title).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
