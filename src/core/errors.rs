//! Shared error types for the screening engine

use thiserror::Error;

/// Main error type for visionscreen operations
#[derive(Debug, Error)]
pub enum Error {
    /// A value outside its closed domain (orientation, eye selection, ...)
    #[error("Invalid {field} '{value}': expected one of {expected}")]
    InvalidInput {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    /// An answer was submitted while no stimulus was outstanding
    #[error("No pending question to answer")]
    NoPendingQuestion,

    /// The controller was driven before `start()`
    #[error("Session has not been started")]
    NotStarted,

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Generic errors with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// TOML errors
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Create an invalid-input error for a closed-domain field
    pub fn invalid_input(
        field: &'static str,
        value: impl Into<String>,
        expected: &'static str,
    ) -> Self {
        Self::InvalidInput {
            field,
            value: value.into(),
            expected,
        }
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            message: self.to_string(),
        }
    }

    /// Boundary rejections leave engine state untouched and are safe to ignore.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput { .. } | Self::NoPendingQuestion | Self::NotStarted
        )
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}
