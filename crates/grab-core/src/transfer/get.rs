//! Single-stream HTTP GET into a writer.
//!
//! Every chunk libcurl delivers is written to `out` in arrival order. The
//! request asks for identity encoding so the bytes on the wire match the
//! probed `Content-Length`.

use std::io::Write;
use std::str;

use crate::error::DownloadError;

use super::CurlOptions;

/// Streams the body of `url` into `out` and returns the number of bytes written.
///
/// Stops at end of stream, on the first network error, or on the first write
/// error from `out` (reported as a transfer error carrying the I/O error).
/// Bytes written before a failure stay written.
/// Runs in the current thread; call from `spawn_blocking` if used from async code.
pub(crate) fn stream_to<W: Write>(
    url: &str,
    curl: &CurlOptions,
    out: &mut W,
) -> Result<u64, DownloadError> {
    let mut written: u64 = 0;
    let mut write_error: Option<std::io::Error> = None;

    let mut easy = curl::easy::Easy::new();
    easy.url(url)
        .map_err(|e| DownloadError::transfer("invalid URL", e))?;
    curl.apply(&mut easy)
        .map_err(|e| DownloadError::transfer("configure GET", e))?;
    // Error statuses fail the request instead of landing in the file.
    easy.fail_on_error(true)
        .map_err(|e| DownloadError::transfer("configure GET", e))?;

    let mut list = curl::easy::List::new();
    list.append("Accept-Encoding: identity")
        .map_err(|e| DownloadError::transfer("configure GET", e))?;
    easy.http_headers(list)
        .map_err(|e| DownloadError::transfer("configure GET", e))?;

    let performed = {
        let mut transfer = easy.transfer();
        transfer
            .write_function(|data| match out.write_all(data) {
                Ok(()) => {
                    written += data.len() as u64;
                    Ok(data.len())
                }
                Err(e) => {
                    tracing::warn!("destination write failed: {}", e);
                    write_error = Some(e);
                    Ok(0) // abort transfer
                }
            })
            .map_err(|e| DownloadError::transfer("configure GET", e))?;
        transfer.perform()
    };

    if let Some(e) = write_error {
        return Err(DownloadError::transfer("write to destination failed", e));
    }
    performed.map_err(|e| DownloadError::transfer("GET request failed", e))?;

    let code = easy
        .response_code()
        .map_err(|e| DownloadError::transfer("no response code", e))?;
    if !(200..300).contains(&code) {
        return Err(DownloadError::Transfer {
            message: format!("GET {} returned HTTP {}", url, code),
            source: None,
        });
    }

    out.flush()
        .map_err(|e| DownloadError::transfer("flush destination", e))?;
    Ok(written)
}
