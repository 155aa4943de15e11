//! HTTP HEAD / size probing.
//!
//! Uses the curl crate (libcurl) to fetch response headers and learn the
//! declared `Content-Length` before any destination file is created.

mod parse;

use std::str;

use crate::error::DownloadError;
use crate::transfer::CurlOptions;

pub use parse::HeadResult;

/// Performs a HEAD request and returns the declared content length in bytes.
///
/// Follows redirects (bounded by `curl.max_redirections`). Fails with
/// [`DownloadError::Probe`] on network failure, a non-2xx status, or a missing
/// or non-numeric `Content-Length`. No retries.
/// Runs in the current thread; call from `spawn_blocking` if used from async code.
pub fn probe(url: &str, curl: &CurlOptions) -> Result<u64, DownloadError> {
    let mut headers: Vec<String> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)
        .map_err(|e| DownloadError::probe("invalid URL", e))?;
    easy.nobody(true)
        .map_err(|e| DownloadError::probe("configure HEAD", e))?;
    curl.apply(&mut easy)
        .map_err(|e| DownloadError::probe("configure HEAD", e))?;
    easy.timeout(curl.probe_timeout)
        .map_err(|e| DownloadError::probe("configure HEAD", e))?;

    {
        let mut transfer = easy.transfer();
        transfer
            .header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    headers.push(s.trim_end().to_string());
                }
                true
            })
            .map_err(|e| DownloadError::probe("configure HEAD", e))?;
        transfer
            .perform()
            .map_err(|e| DownloadError::probe("HEAD request failed", e))?;
    }

    let code = easy
        .response_code()
        .map_err(|e| DownloadError::probe("no response code", e))?;
    if !(200..300).contains(&code) {
        return Err(DownloadError::Probe {
            message: format!("HEAD {} returned HTTP {}", url, code),
            source: None,
        });
    }

    let head = parse::parse_headers(&headers);
    let size = head.total_size()?;
    tracing::debug!(url, size, "probed content length");
    Ok(size)
}
