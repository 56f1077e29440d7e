//! Error types for the download module.
//!
//! Every failure of a verified download surfaces as a [`DownloadError`]
//! carrying the URL or path it concerns. Only [`DownloadError::NotFound`]
//! from the current-site digest lookup is ever recovered from (by falling
//! back to the archive site); everything else ends the call.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while resolving, downloading or verifying an artifact.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The resolved destination file already exists and will not be overwritten.
    #[error("destination {path} already exists")]
    AlreadyExists {
        /// The pre-existing destination path.
        path: PathBuf,
    },

    /// The server answered 404 Not Found.
    #[error("not found: {url}")]
    NotFound {
        /// The URL that was not found.
        url: String,
    },

    /// HTTP error response other than 404 (4xx client errors, 5xx server errors).
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout fetching {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// The SHA-512 of the downloaded bytes differs from the published digest.
    #[error("SHA-512 mismatch: expected {expected}, got {actual}")]
    DigestMismatch {
        /// Digest published by the authoritative host.
        expected: String,
        /// Digest computed over the streamed bytes.
        actual: String,
    },

    /// The destination file is missing after a verified download.
    #[error("downloaded file {path} does not exist after writing")]
    WriteVerification {
        /// The path that should have been written.
        path: PathBuf,
    },

    /// File system error while creating or writing the destination.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The destination where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A configured host URL is malformed or cannot carry a path.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// The artifact path is empty or does not name a file.
    #[error("invalid artifact path: {path:?}")]
    InvalidArtifactPath {
        /// The rejected path as supplied.
        path: String,
    },

    /// The configured chunk size is outside `1..=MAX_CHUNK_SIZE`.
    #[error("invalid chunk size {size}: expected 1..={max} bytes")]
    InvalidChunkSize {
        /// The rejected chunk size.
        size: usize,
        /// The largest accepted chunk size.
        max: usize,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    Client {
        /// The underlying builder error.
        #[source]
        source: reqwest::Error,
    },

    /// The download was interrupted between two chunks.
    #[error("download interrupted")]
    Interrupted,
}

impl DownloadError {
    /// Creates a network error from a reqwest error, promoting timeouts.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            return Self::Timeout { url: url.into() };
        }
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates the error for a non-success HTTP status.
    ///
    /// 404 becomes [`DownloadError::NotFound`], every other status
    /// [`DownloadError::HttpStatus`].
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        if status == 404 {
            Self::NotFound { url: url.into() }
        } else {
            Self::HttpStatus {
                url: url.into(),
                status,
            }
        }
    }

    /// Creates an already-exists error.
    pub fn already_exists(path: impl Into<PathBuf>) -> Self {
        Self::AlreadyExists { path: path.into() }
    }

    /// Creates a digest mismatch error.
    pub fn digest_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::DigestMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates an invalid artifact path error.
    pub fn invalid_artifact_path(path: impl Into<String>) -> Self {
        Self::InvalidArtifactPath { path: path.into() }
    }

    /// Returns true for a 404 response, the only error that triggers the
    /// archive fallback.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns the HTTP status code carried by this error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// No From<reqwest::Error> / From<std::io::Error>: every variant needs the URL
// or path the source error lacks, so callers go through the constructors.
