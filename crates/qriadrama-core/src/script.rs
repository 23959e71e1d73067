//! Script model.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::style::RoleStyle;

/// One speaker turn.
///
/// On the wire a line is a single-entry object mapping the speaker to the
/// utterance, e.g. `{"Alice": "Hello."}`. The empty speaker is the narrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct DialogueLine {
    /// The character name.
    pub speaker: String,
    /// The full utterance.
    pub text: String,
}

impl DialogueLine {
    /// Creates a new line.
    #[must_use]
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
        }
    }

    /// Returns `true` if the line has no named speaker.
    #[must_use]
    pub fn is_narration(&self) -> bool {
        self.speaker.is_empty()
    }
}

impl TryFrom<BTreeMap<String, String>> for DialogueLine {
    type Error = String;

    fn try_from(map: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        if map.len() != 1 {
            return Err(format!(
                "a dialogue line must have exactly one speaker, found {}",
                map.len()
            ));
        }
        let mut entries = map.into_iter();
        match entries.next() {
            Some((speaker, text)) => Ok(Self { speaker, text }),
            None => Err("a dialogue line must have exactly one speaker, found 0".to_owned()),
        }
    }
}

impl From<DialogueLine> for BTreeMap<String, String> {
    fn from(line: DialogueLine) -> Self {
        BTreeMap::from([(line.speaker, line.text)])
    }
}

/// Script metadata that travels with the lines.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScriptMeta {
    /// Speaker name to display style.
    #[serde(default)]
    pub roles: HashMap<String, RoleStyle>,
}

/// Raw script data as returned by a provider.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScriptDocument {
    /// The lines in reading order.
    pub lines: Vec<DialogueLine>,
    /// Metadata (role styles).
    #[serde(default)]
    pub meta: ScriptMeta,
}

/// A playable script. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct Script {
    title: String,
    lines: Vec<DialogueLine>,
    role_styles: HashMap<String, RoleStyle>,
}

impl Script {
    /// Creates a script from its parts.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        lines: Vec<DialogueLine>,
        role_styles: HashMap<String, RoleStyle>,
    ) -> Self {
        Self {
            title: title.into(),
            lines,
            role_styles,
        }
    }

    /// Builds a script from provider data.
    #[must_use]
    pub fn from_document(title: impl Into<String>, document: ScriptDocument) -> Self {
        Self::new(title, document.lines, document.meta.roles)
    }

    /// The catalog title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// All lines in reading order.
    #[must_use]
    pub fn lines(&self) -> &[DialogueLine] {
        &self.lines
    }

    /// The line at `index`, if any.
    #[must_use]
    pub fn line(&self, index: usize) -> Option<&DialogueLine> {
        self.lines.get(index)
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns `true` if the script has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The style for `speaker`, or the fallback style if it has none.
    #[must_use]
    pub fn style_for(&self, speaker: &str) -> &RoleStyle {
        self.role_styles
            .get(speaker)
            .unwrap_or(RoleStyle::fallback())
    }
}

/// One entry of the script catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Title used to request the script.
    pub title: String,
    /// Optional blurb.
    pub description: Option<String>,
    /// Optional cover image location. Never loaded by the core.
    pub cover_image: Option<String>,
}
