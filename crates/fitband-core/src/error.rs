//! Error types for fitband-core.
//!
//! Construction-time problems (missing arguments, unknown tokens,
//! malformed dates) are fatal and surface as [`Error`] through the
//! session constructor. Failures on the fetch path itself are never
//! raised as [`Error`]; they are published through the `Failed` UI
//! state instead.

use thiserror::Error;

/// Errors that can occur while setting up or running an export.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A required construction argument was empty.
    #[error("activity fetch requires {0}")]
    MissingArgument(&'static str),

    /// An activity type or calories kind token did not parse.
    #[error(transparent)]
    Parse(#[from] fitband_types::ParseError),

    /// A compact calendar date string did not parse.
    #[error("invalid compact date '{input}': {source}")]
    InvalidDate {
        /// The offending input.
        input: String,
        /// The underlying parse failure.
        source: time::error::Parse,
    },

    /// JSON encoding of a domain record failed.
    #[error("failed to encode recording: {0}")]
    Encode(#[from] serde_json::Error),

    /// Rendering a temporal field failed.
    #[error("failed to format timestamp: {0}")]
    Format(#[from] time::error::Format),

    /// The recording sink could not persist the bytes.
    #[error("failed to persist recording at {path}: {source}")]
    Persist {
        /// Logical path handed to the sink.
        path: String,
        /// The underlying I/O failure.
        source: std::io::Error,
    },
}

impl Error {
    /// Create an invalid-date error with input context.
    pub fn invalid_date(input: impl Into<String>, source: time::error::Parse) -> Self {
        Self::InvalidDate {
            input: input.into(),
            source,
        }
    }

    /// Create a persist error with path context.
    pub fn persist(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Persist {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias using fitband-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::MissingArgument("device id");
        assert_eq!(err.to_string(), "activity fetch requires device id");

        let err: Error = fitband_types::ParseError::UnknownActivityType("X".into()).into();
        assert!(err.to_string().contains("unrecognized activity type"));

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err = Error::persist("/SLEEP/2024-01-01-sleep.json", io);
        assert!(err.to_string().contains("/SLEEP/2024-01-01-sleep.json"));
        assert!(err.to_string().contains("read-only"));
    }
}
