//! Error types for archive configuration and extraction operations.

use crate::engine::Status;
use thiserror::Error;

/// Result type alias using `BitError`.
pub type Result<T> = std::result::Result<T, BitError>;

/// Errors that can occur while configuring or driving the archive engine.
#[derive(Error, Debug)]
pub enum BitError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Archive format is unsupported or unrecognized.
    #[error("unsupported archive format")]
    UnsupportedFormat,

    /// A setter rejected a format, method or parameter combination.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration {
        /// Why the combination was rejected.
        reason: String,
    },

    /// The finalized property list could not be installed on the engine.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The engine refused to report a property.
    #[error("{0}")]
    Property(String),

    /// The engine refused to report how many items the archive holds.
    #[error("could not retrieve the number of items in the archive")]
    ItemCount,

    /// A password was required but none was supplied.
    #[error("password is not defined")]
    PasswordNotDefined,

    /// An engine call returned a failure status.
    #[error("engine failed to {operation}: {status}")]
    Engine {
        /// Operation that was being performed.
        operation: &'static str,
        /// Status code returned by the engine.
        status: Status,
    },

    /// One or more items failed during an extraction or test run.
    #[error("{errors} item(s) failed, last error: {message}")]
    Extraction {
        /// Number of failed items.
        errors: usize,
        /// Message recorded for the last failing item.
        message: String,
    },
}

impl BitError {
    /// Returns `true` if this error was raised before any engine work began.
    ///
    /// # Examples
    ///
    /// ```
    /// use bitarc_core::BitError;
    ///
    /// let err = BitError::InvalidConfiguration {
    ///     reason: "dictionary too large".to_string(),
    /// };
    /// assert!(err.is_configuration_error());
    ///
    /// let err = BitError::PasswordNotDefined;
    /// assert!(!err.is_configuration_error());
    /// ```
    #[must_use]
    pub const fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfiguration { .. } | Self::Configuration(_) | Self::UnsupportedFormat
        )
    }

    /// Returns a context string for this error, if available.
    ///
    /// # Examples
    ///
    /// ```
    /// use bitarc_core::BitError;
    ///
    /// let err = BitError::Extraction {
    ///     errors: 2,
    ///     message: "CRC Failed".to_string(),
    /// };
    /// assert_eq!(err.context(), Some("CRC Failed"));
    ///
    /// let err = BitError::ItemCount;
    /// assert_eq!(err.context(), None);
    /// ```
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::InvalidConfiguration { reason } => Some(reason),
            Self::Configuration(msg) | Self::Property(msg) => Some(msg),
            Self::Extraction { message, .. } => Some(message),
            _ => None,
        }
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}
