//! Data provider error types.

use thiserror::Error;

/// Failure to retrieve catalog or script data.
///
/// None of these are fatal to the program: the caller shows the message and
/// no session is constructed.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The requested script or chapter does not exist.
    #[error("script not found: {0}")]
    NotFound(String),

    /// The data exists but could not be read.
    #[error("script data unavailable: {0}")]
    Unavailable(String),

    /// The data was read but is not a valid script.
    #[error("malformed script data: {0}")]
    Malformed(String),
}
