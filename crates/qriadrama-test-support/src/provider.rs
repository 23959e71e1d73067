//! Test providers — mock `ScriptProvider` implementations for tests.

use std::collections::HashMap;

use async_trait::async_trait;
use qriadrama_core::error::ProviderError;
use qriadrama_core::provider::ScriptProvider;
use qriadrama_core::script::{CatalogEntry, DialogueLine, ScriptDocument, ScriptMeta};
use qriadrama_core::style::RoleStyle;

/// A provider serving scripts held in memory.
#[derive(Debug, Default, Clone)]
pub struct InMemoryScriptProvider {
    catalog: Vec<CatalogEntry>,
    scripts: HashMap<String, ScriptDocument>,
    chapters: HashMap<(String, String), ScriptDocument>,
}

impl InMemoryScriptProvider {
    /// Creates an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a script built from `(speaker, text)` pairs and lists it in the
    /// catalog.
    #[must_use]
    pub fn with_script(mut self, title: &str, lines: &[(&str, &str)]) -> Self {
        self.catalog.push(CatalogEntry {
            title: title.to_owned(),
            description: None,
            cover_image: None,
        });
        self.scripts.insert(title.to_owned(), document(lines));
        self
    }

    /// Adds a named chapter to a script.
    #[must_use]
    pub fn with_chapter(mut self, title: &str, chapter: &str, lines: &[(&str, &str)]) -> Self {
        self.chapters
            .insert((title.to_owned(), chapter.to_owned()), document(lines));
        self
    }

    /// Sets the style of `speaker` in every chapter of `title`.
    #[must_use]
    pub fn with_role(mut self, title: &str, speaker: &str, css: &str) -> Self {
        let style = RoleStyle::parse(css);
        if let Some(doc) = self.scripts.get_mut(title) {
            doc.meta.roles.insert(speaker.to_owned(), style.clone());
        }
        for ((script, _), doc) in &mut self.chapters {
            if script == title {
                doc.meta.roles.insert(speaker.to_owned(), style.clone());
            }
        }
        self
    }
}

fn document(lines: &[(&str, &str)]) -> ScriptDocument {
    ScriptDocument {
        lines: lines
            .iter()
            .map(|(speaker, text)| DialogueLine::new(*speaker, *text))
            .collect(),
        meta: ScriptMeta::default(),
    }
}

#[async_trait]
impl ScriptProvider for InMemoryScriptProvider {
    async fn fetch_catalog(&self) -> Result<Vec<CatalogEntry>, ProviderError> {
        Ok(self.catalog.clone())
    }

    async fn fetch_script(&self, title: &str) -> Result<ScriptDocument, ProviderError> {
        self.scripts
            .get(title)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(title.to_owned()))
    }

    async fn fetch_chapter(
        &self,
        title: &str,
        chapter: &str,
    ) -> Result<ScriptDocument, ProviderError> {
        self.chapters
            .get(&(title.to_owned(), chapter.to_owned()))
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(format!("{title}/{chapter}")))
    }
}

/// A provider whose every call fails as unavailable. Useful for testing
/// error-handling paths.
#[derive(Debug)]
pub struct FailingScriptProvider;

#[async_trait]
impl ScriptProvider for FailingScriptProvider {
    async fn fetch_catalog(&self) -> Result<Vec<CatalogEntry>, ProviderError> {
        Err(ProviderError::Unavailable("data source offline".into()))
    }

    async fn fetch_script(&self, _title: &str) -> Result<ScriptDocument, ProviderError> {
        Err(ProviderError::Unavailable("data source offline".into()))
    }

    async fn fetch_chapter(
        &self,
        _title: &str,
        _chapter: &str,
    ) -> Result<ScriptDocument, ProviderError> {
        Err(ProviderError::Unavailable("data source offline".into()))
    }
}
