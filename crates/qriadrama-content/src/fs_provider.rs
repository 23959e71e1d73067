//! Filesystem implementation of the `ScriptProvider` trait.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use qriadrama_core::error::ProviderError;
use qriadrama_core::provider::ScriptProvider;
use qriadrama_core::script::{CatalogEntry, DialogueLine, ScriptDocument};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use crate::domain::manifest::{MANIFEST_FILE, ScriptManifest, chapter_path, is_plain_title};

/// Serves scripts from a data directory laid out as `<dir>/<title>/qd.json`.
#[derive(Debug, Clone)]
pub struct FsScriptProvider {
    data_dir: PathBuf,
}

impl FsScriptProvider {
    /// Creates a provider rooted at `data_dir`.
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// The data directory.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn script_dir(&self, title: &str) -> Result<PathBuf, ProviderError> {
        if is_plain_title(title) {
            Ok(self.data_dir.join(title))
        } else {
            Err(ProviderError::NotFound(title.to_owned()))
        }
    }

    async fn load_manifest(
        &self,
        title: &str,
    ) -> Result<(PathBuf, ScriptManifest), ProviderError> {
        let dir = self.script_dir(title)?;
        let manifest = read_json(&dir.join(MANIFEST_FILE))
            .await
            .map_err(|error| match error {
                // A directory without a manifest is not a script.
                ProviderError::NotFound(_) => ProviderError::NotFound(title.to_owned()),
                other => other,
            })?;
        Ok((dir, manifest))
    }
}

async fn read_chapter(
    title: &str,
    dir: &Path,
    manifest: &ScriptManifest,
    chapter: &str,
) -> Result<ScriptDocument, ProviderError> {
    let path = chapter_path(dir, chapter)
        .ok_or_else(|| ProviderError::NotFound(format!("{title}/{chapter}")))?;
    let lines: Vec<DialogueLine> = read_json(&path).await?;
    info!(title, chapter, lines = lines.len(), "chapter loaded");
    Ok(ScriptDocument {
        lines,
        meta: manifest.meta(),
    })
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ProviderError> {
    let bytes = tokio::fs::read(path).await.map_err(|error| {
        let location = path.display().to_string();
        match error.kind() {
            io::ErrorKind::NotFound => ProviderError::NotFound(location),
            _ => ProviderError::Unavailable(format!("{location}: {error}")),
        }
    })?;
    serde_json::from_slice(&bytes)
        .map_err(|error| ProviderError::Malformed(format!("{}: {error}", path.display())))
}

#[async_trait]
impl ScriptProvider for FsScriptProvider {
    #[instrument(skip(self), fields(data_dir = %self.data_dir.display()))]
    async fn fetch_catalog(&self) -> Result<Vec<CatalogEntry>, ProviderError> {
        let mut entries = match tokio::fs::read_dir(&self.data_dir).await {
            Ok(entries) => entries,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                warn!("data directory does not exist");
                return Ok(Vec::new());
            }
            Err(error) => {
                return Err(ProviderError::Unavailable(format!(
                    "{}: {error}",
                    self.data_dir.display()
                )));
            }
        };

        let mut catalog = Vec::new();
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(error) => {
                    return Err(ProviderError::Unavailable(format!(
                        "{}: {error}",
                        self.data_dir.display()
                    )));
                }
            };
            if !entry.file_type().await.is_ok_and(|kind| kind.is_dir()) {
                continue;
            }
            let dir = entry.path();
            let Some(title) = entry.file_name().to_str().map(str::to_owned) else {
                warn!(path = %dir.display(), "skipping script with non UTF-8 name");
                continue;
            };
            let manifest: ScriptManifest = match read_json(&dir.join(MANIFEST_FILE)).await {
                Ok(manifest) => manifest,
                Err(ProviderError::NotFound(_)) => {
                    debug!(%title, "directory has no manifest");
                    continue;
                }
                Err(error) => {
                    warn!(%title, %error, "skipping unreadable script");
                    continue;
                }
            };
            if manifest.title.as_deref().is_some_and(|t| t != title) {
                debug!(
                    %title,
                    manifest_title = ?manifest.title,
                    "manifest title differs from directory"
                );
            }
            catalog.push(CatalogEntry {
                cover_image: manifest
                    .cover
                    .as_deref()
                    .map(|cover| dir.join(cover).display().to_string()),
                description: manifest.description,
                title,
            });
        }

        catalog.sort_by(|a, b| a.title.cmp(&b.title));
        info!(scripts = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    #[instrument(skip(self))]
    async fn fetch_script(&self, title: &str) -> Result<ScriptDocument, ProviderError> {
        let (dir, manifest) = self.load_manifest(title).await?;
        read_chapter(title, &dir, &manifest, &manifest.index).await
    }

    #[instrument(skip(self))]
    async fn fetch_chapter(
        &self,
        title: &str,
        chapter: &str,
    ) -> Result<ScriptDocument, ProviderError> {
        let (dir, manifest) = self.load_manifest(title).await?;
        read_chapter(title, &dir, &manifest, chapter).await
    }
}
