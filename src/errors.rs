/*!
 * Error types for the voxalign application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when talking to a speech synthesis backend
#[derive(Error, Debug)]
pub enum BackendError {
    /// Error when making an API request fails
    #[error("Synthesis request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse synthesis response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("Synthesis API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// The backend completed but produced no audio or no word boundaries
    #[error("Synthesis produced no usable output: {0}")]
    EmptySynthesis(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Errors that can occur while aligning fragments against script units
#[derive(Error, Debug)]
pub enum AlignError {
    /// Fewer subtitle entries were emitted than script units exist.
    /// Carries both counts for diagnostics; no partial result is returned.
    #[error("Alignment incomplete: emitted {emitted} entries for {expected} script units")]
    Incomplete {
        /// Number of subtitle entries successfully matched
        emitted: usize,
        /// Number of script units the segmenter produced
        expected: usize,
    },
}

/// Errors that can occur during subtitle rendering and verification
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// A freshly written subtitle file failed re-parsing and was removed
    #[error("Written subtitle file failed verification and was removed: {0}")]
    ArtifactCorrupt(String),

    /// Subtitle content could not be parsed
    #[error("Failed to parse subtitle content: {0}")]
    Parse(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a speech backend
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Error from fragment alignment
    #[error("Alignment error: {0}")]
    Align(#[from] AlignError),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
