//! Playback error types.

use qriadrama_core::error::ProviderError;
use thiserror::Error;

/// Reasons a script does not play.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The script has no lines. The session still exists and is Finished.
    #[error("script {0:?} has no lines")]
    EmptyScript(String),

    /// The script could not be retrieved; no session was constructed.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}
