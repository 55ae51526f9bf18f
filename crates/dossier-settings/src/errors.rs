//! Settings errors.

use thiserror::Error;

/// Result alias for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;

/// Errors while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Settings file could not be read.
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file is not valid JSON, or the merged value does not
    /// deserialize into [`crate::DossierSettings`].
    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}
