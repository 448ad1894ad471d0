//! Error types for the explorer core.
//!
//! Store-level failures (`SourceUnavailable`) are fatal to a catalog load and
//! bubble up to the caller. Per-image failures (`ImageFetchFailed`) are local
//! to one record and never abort sibling fetches.

use std::fmt;
use thiserror::Error;

/// Why a single image could not be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchFailureKind {
    /// The blob does not exist at the resolved path.
    NotFound,
    /// The credential was rejected for this blob.
    AccessDenied,
    /// Connection, timeout or unexpected HTTP status.
    Network,
    /// The record carries no image URL.
    MissingUrl,
    /// Anything else the blob store reported.
    Other,
}

impl FetchFailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchFailureKind::NotFound => "not_found",
            FetchFailureKind::AccessDenied => "access_denied",
            FetchFailureKind::Network => "network",
            FetchFailureKind::MissingUrl => "missing_url",
            FetchFailureKind::Other => "other",
        }
    }
}

impl fmt::Display for FetchFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main error type for the explorer core.
#[derive(Debug, Error)]
pub enum ExplorerError {
    // Record store errors
    #[error("Record source unavailable: {message}")]
    SourceUnavailable { message: String },

    // Per-image errors
    #[error("Failed to load image {path} ({kind}): {reason}")]
    ImageFetchFailed {
        path: String,
        kind: FetchFailureKind,
        reason: String,
    },

    // Store client errors
    #[error("Blob not found: {path}")]
    BlobNotFound { path: String },

    #[error("Access denied: {resource}")]
    AccessDenied { resource: String },

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Request timed out")]
    Timeout,

    // Serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    // Validation errors
    #[error("Validation error for {field}: {message}")]
    Validation { field: String, message: String },
}

/// Result type alias for explorer operations.
pub type Result<T> = std::result::Result<T, ExplorerError>;

impl From<serde_json::Error> for ExplorerError {
    fn from(err: serde_json::Error) -> Self {
        ExplorerError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<reqwest::Error> for ExplorerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ExplorerError::Timeout
        } else {
            ExplorerError::Network {
                message: err.without_url().to_string(),
            }
        }
    }
}

impl ExplorerError {
    /// Wrap any record store failure as `SourceUnavailable`.
    ///
    /// An error that already is `SourceUnavailable` passes through unchanged.
    pub fn into_source_unavailable(self) -> Self {
        match self {
            err @ ExplorerError::SourceUnavailable { .. } => err,
            other => ExplorerError::SourceUnavailable {
                message: other.to_string(),
            },
        }
    }

    /// Convert a blob store failure for `path` into `ImageFetchFailed`.
    pub fn into_image_fetch_failed(self, path: &str) -> Self {
        let kind = match &self {
            ExplorerError::ImageFetchFailed { .. } => return self,
            ExplorerError::BlobNotFound { .. } => FetchFailureKind::NotFound,
            ExplorerError::AccessDenied { .. } => FetchFailureKind::AccessDenied,
            ExplorerError::Network { .. } | ExplorerError::Timeout => FetchFailureKind::Network,
            _ => FetchFailureKind::Other,
        };
        ExplorerError::ImageFetchFailed {
            path: path.to_string(),
            kind,
            reason: self.to_string(),
        }
    }

    /// True for failures scoped to a single record.
    pub fn is_per_item(&self) -> bool {
        matches!(self, ExplorerError::ImageFetchFailed { .. })
    }

    /// The failure kind, when this is an `ImageFetchFailed`.
    pub fn fetch_failure_kind(&self) -> Option<FetchFailureKind> {
        match self {
            ExplorerError::ImageFetchFailed { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ExplorerError::SourceUnavailable {
            message: "table service returned 503".into(),
        };
        assert_eq!(
            err.to_string(),
            "Record source unavailable: table service returned 503"
        );
    }

    #[test]
    fn test_into_source_unavailable() {
        let err = ExplorerError::Network {
            message: "connection refused".into(),
        }
        .into_source_unavailable();
        match err {
            ExplorerError::SourceUnavailable { message } => {
                assert!(message.contains("connection refused"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_source_unavailable_passes_through() {
        let err = ExplorerError::SourceUnavailable {
            message: "down".into(),
        }
        .into_source_unavailable();
        assert_eq!(err.to_string(), "Record source unavailable: down");
    }

    #[test]
    fn test_image_fetch_failed_kinds() {
        let cases = [
            (
                ExplorerError::BlobNotFound {
                    path: "a.jpg".into(),
                },
                FetchFailureKind::NotFound,
            ),
            (
                ExplorerError::AccessDenied {
                    resource: "a.jpg".into(),
                },
                FetchFailureKind::AccessDenied,
            ),
            (ExplorerError::Timeout, FetchFailureKind::Network),
            (
                ExplorerError::Config {
                    message: "bad".into(),
                },
                FetchFailureKind::Other,
            ),
        ];

        for (err, expected) in cases {
            let converted = err.into_image_fetch_failed("a.jpg");
            assert!(converted.is_per_item());
            assert_eq!(converted.fetch_failure_kind(), Some(expected));
        }
    }

    #[test]
    fn test_per_item_only_for_image_failures() {
        assert!(!ExplorerError::Timeout.is_per_item());
        assert!(!ExplorerError::SourceUnavailable {
            message: "x".into()
        }
        .is_per_item());
    }
}
