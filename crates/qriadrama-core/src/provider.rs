//! Script data provider abstraction.

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::script::{CatalogEntry, ScriptDocument};

/// Source of catalog and script data.
///
/// Transport and storage are up to the implementation. Retry policy, if any,
/// also lives here; the playback core never retries.
#[async_trait]
pub trait ScriptProvider: Send + Sync {
    /// Lists every script that can be played.
    async fn fetch_catalog(&self) -> Result<Vec<CatalogEntry>, ProviderError>;

    /// Loads the default chapter of the script called `title`.
    async fn fetch_script(&self, title: &str) -> Result<ScriptDocument, ProviderError>;

    /// Loads a named chapter of the script called `title`.
    async fn fetch_chapter(
        &self,
        title: &str,
        chapter: &str,
    ) -> Result<ScriptDocument, ProviderError>;
}
