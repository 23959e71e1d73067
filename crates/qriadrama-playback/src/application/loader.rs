//! Loading scripts from a provider.

use qriadrama_core::provider::ScriptProvider;
use qriadrama_core::script::Script;
use tracing::{info, instrument};

use crate::error::PlaybackError;

/// Fetches `title` (or one of its chapters) and builds a playable script.
///
/// # Errors
///
/// Returns `PlaybackError::Provider` if the provider cannot supply the data.
/// An empty script is not an error here; the session handles it.
#[instrument(skip(provider))]
pub async fn load_script(
    provider: &dyn ScriptProvider,
    title: &str,
    chapter: Option<&str>,
) -> Result<Script, PlaybackError> {
    let document = match chapter {
        Some(chapter) => provider.fetch_chapter(title, chapter).await?,
        None => provider.fetch_script(title).await?,
    };
    info!(
        lines = document.lines.len(),
        roles = document.meta.roles.len(),
        "script loaded"
    );
    Ok(Script::from_document(title, document))
}
