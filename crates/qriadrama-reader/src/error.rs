//! Qriadrama reader — error types.

use qriadrama_playback::error::PlaybackError;
use thiserror::Error;

/// Errors that end a reader command.
#[derive(Debug, Error)]
pub enum AppError {
    /// A command line option or environment variable is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Script data could not be loaded. Nothing was shown.
    #[error("could not load \"{target}\": {source}")]
    Provider {
        /// The title, or the data directory when listing.
        target: String,
        /// What went wrong.
        #[source]
        source: PlaybackError,
    },

    /// Terminal I/O failed.
    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),
}
