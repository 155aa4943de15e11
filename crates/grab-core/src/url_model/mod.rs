//! URL validation and filename derivation.
//!
//! A locator must be an absolute URL with both a scheme and a host. When no
//! destination is given, the local filename comes from the URL's last path
//! segment, sanitized for Linux filesystems.

mod path;
mod sanitize;

use url::Url;

use crate::error::DownloadError;

pub use path::filename_from_url_path;
pub use sanitize::sanitize_filename_for_linux;

/// Default filename when the URL path yields nothing usable.
const DEFAULT_FILENAME: &str = "download.bin";

/// Parses `input` as a complete, absolute URL.
///
/// Rejects relative references (`not-a-url`), and URLs without a host
/// (`mailto:`, `file:///`). No network activity happens here.
pub fn parse_locator(input: &str) -> Result<Url, DownloadError> {
    let url = Url::parse(input).map_err(|e| DownloadError::Validation {
        input: input.to_string(),
        source: Some(e.into()),
    })?;
    let has_host = url.host_str().map_or(false, |h| !h.is_empty());
    if url.scheme().is_empty() || !has_host {
        return Err(DownloadError::Validation {
            input: input.to_string(),
            source: None,
        });
    }
    Ok(url)
}

/// Derives a safe filename for saving a download from the URL's final path segment.
///
/// # Examples
///
/// - `https://host/dir/file.bin` → `"file.bin"`
/// - `https://example.com/` → `"download.bin"`
pub fn derive_filename(url: &Url) -> String {
    let raw = match filename_from_url_path(url) {
        Some(c) => c,
        None => return DEFAULT_FILENAME.to_string(),
    };

    let sanitized = sanitize_filename_for_linux(&raw);
    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        DEFAULT_FILENAME.to_string()
    } else {
        sanitized
    }
}
