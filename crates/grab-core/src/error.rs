//! Error kinds surfaced by the download pipeline.
//!
//! Every variant is terminal: nothing in the pipeline retries or recovers.
//! The binaries print the error chain on one line and exit with status 1.

use std::path::PathBuf;

/// Underlying library error attached to a [`DownloadError`].
#[derive(Debug, thiserror::Error)]
pub enum Cause {
    #[error(transparent)]
    Curl(#[from] curl::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Url(#[from] url::ParseError),
}

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// Bad flag or config value (e.g. an interval below one second).
    #[error("{0}")]
    Config(String),

    /// The locator is not an absolute URL with both a scheme and a host.
    #[error("invalid or missing URL: {input}")]
    Validation {
        input: String,
        #[source]
        source: Option<Cause>,
    },

    /// The HEAD request failed, or `Content-Length` was missing or non-numeric.
    #[error("size probe failed: {message}")]
    Probe {
        message: String,
        #[source]
        source: Option<Cause>,
    },

    /// The destination file could not be created.
    #[error("cannot create destination {}", .path.display())]
    Destination {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The GET request failed or the stream copy stopped early.
    #[error("transfer failed: {message}")]
    Transfer {
        message: String,
        #[source]
        source: Option<Cause>,
    },
}

impl DownloadError {
    pub(crate) fn probe(message: impl Into<String>, source: impl Into<Cause>) -> Self {
        DownloadError::Probe {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub(crate) fn transfer(message: impl Into<String>, source: impl Into<Cause>) -> Self {
        DownloadError::Transfer {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}
