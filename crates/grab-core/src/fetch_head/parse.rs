//! Parse HTTP response header lines into HeadResult.

use crate::error::DownloadError;

/// Headers of interest from a HEAD response.
#[derive(Debug, Clone, Default)]
pub struct HeadResult {
    /// Raw `Content-Length` value, if the header was present.
    pub content_length: Option<String>,
}

impl HeadResult {
    /// Declared body size. Missing or non-numeric lengths are probe failures;
    /// there is no "unknown total" fallback.
    pub fn total_size(&self) -> Result<u64, DownloadError> {
        let raw = self.content_length.as_deref().ok_or_else(|| DownloadError::Probe {
            message: "response has no Content-Length header".to_string(),
            source: None,
        })?;
        raw.parse::<u64>().map_err(|_| DownloadError::Probe {
            message: format!("Content-Length is not a byte count: {:?}", raw),
            source: None,
        })
    }
}

/// Parse collected header lines into HeadResult.
///
/// libcurl reports every header block of a redirect chain; a status line
/// starts a new block, so only the final response's headers are kept.
pub(crate) fn parse_headers(lines: &[String]) -> HeadResult {
    let mut result = HeadResult::default();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            result = HeadResult::default();
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                result.content_length = Some(value.trim().to_string());
            }
        }
    }

    result
}
