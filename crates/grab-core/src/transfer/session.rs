//! Immutable per-download parameters.

use std::path::{Path, PathBuf};
use std::time::Duration;

use url::Url;

use crate::config::GrabConfig;
use crate::error::DownloadError;
use crate::url_model;

/// libcurl settings shared by the HEAD probe and the GET.
#[derive(Debug, Clone)]
pub struct CurlOptions {
    pub connect_timeout: Duration,
    /// Whole-request timeout for the probe only. The GET has no overall timeout.
    pub probe_timeout: Duration,
    pub max_redirections: u32,
    pub user_agent: Option<String>,
}

impl Default for CurlOptions {
    fn default() -> Self {
        Self::from(&GrabConfig::default())
    }
}

impl From<&GrabConfig> for CurlOptions {
    fn from(cfg: &GrabConfig) -> Self {
        Self {
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            probe_timeout: Duration::from_secs(cfg.probe_timeout_secs),
            max_redirections: cfg.max_redirections,
            user_agent: cfg.user_agent.clone(),
        }
    }
}

impl CurlOptions {
    /// Applies redirect, connect-timeout and user-agent settings to a handle.
    pub(crate) fn apply(&self, easy: &mut curl::easy::Easy) -> Result<(), curl::Error> {
        easy.follow_location(true)?;
        easy.max_redirections(self.max_redirections)?;
        easy.connect_timeout(self.connect_timeout)?;
        if let Some(ua) = &self.user_agent {
            easy.useragent(ua)?;
        }
        Ok(())
    }
}

/// Longest accepted reporting interval: one day.
pub const MAX_INTERVAL_SECS: i64 = 86_400;

/// Converts a whole-seconds interval flag into a reporting interval (1s to one day).
pub fn interval_from_secs(secs: i64) -> Result<Duration, DownloadError> {
    if secs < 1 {
        return Err(DownloadError::Config(format!(
            "interval must be >= 1 (got {})",
            secs
        )));
    }
    if secs > MAX_INTERVAL_SECS {
        return Err(DownloadError::Config(format!(
            "interval must be <= {} (got {})",
            MAX_INTERVAL_SECS, secs
        )));
    }
    Ok(Duration::from_secs(secs as u64))
}

/// Everything one download needs, fixed before the first request.
#[derive(Debug, Clone)]
pub struct TransferSession {
    url: Url,
    destination: PathBuf,
    interval: Duration,
    curl: CurlOptions,
}

impl TransferSession {
    /// Builds a session from a validated URL.
    ///
    /// When `destination` is `None` the file is named after the URL's last
    /// path segment, relative to the current directory.
    pub fn new(url: Url, destination: Option<PathBuf>, interval: Duration) -> Result<Self, DownloadError> {
        if interval < Duration::from_secs(1)
            || interval > Duration::from_secs(MAX_INTERVAL_SECS as u64)
        {
            return Err(DownloadError::Config(format!(
                "interval must be between 1 second and one day (got {:?})",
                interval
            )));
        }
        let destination = destination.unwrap_or_else(|| PathBuf::from(url_model::derive_filename(&url)));
        Ok(Self {
            url,
            destination,
            interval,
            curl: CurlOptions::default(),
        })
    }

    /// Validates raw command-line input in flag order: interval first, then the URL.
    pub fn from_args(
        locator: &str,
        destination: Option<PathBuf>,
        interval_secs: Option<i64>,
        cfg: &GrabConfig,
    ) -> Result<Self, DownloadError> {
        let secs = interval_secs.unwrap_or(cfg.default_interval_secs as i64);
        let interval = interval_from_secs(secs)?;
        let url = url_model::parse_locator(locator)?;
        Ok(Self::new(url, destination, interval)?.with_curl_options(CurlOptions::from(cfg)))
    }

    pub fn with_curl_options(mut self, curl: CurlOptions) -> Self {
        self.curl = curl;
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn curl_options(&self) -> &CurlOptions {
        &self.curl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_below_one_is_config_error() {
        assert!(matches!(interval_from_secs(0), Err(DownloadError::Config(_))));
        assert!(matches!(interval_from_secs(-3), Err(DownloadError::Config(_))));
        assert_eq!(interval_from_secs(1).unwrap(), Duration::from_secs(1));
    }

    #[test]
    fn interval_above_one_day_is_config_error() {
        assert_eq!(
            interval_from_secs(MAX_INTERVAL_SECS).unwrap(),
            Duration::from_secs(86_400)
        );
        assert!(matches!(
            interval_from_secs(MAX_INTERVAL_SECS + 1),
            Err(DownloadError::Config(_))
        ));
        assert!(matches!(
            interval_from_secs(i64::MAX),
            Err(DownloadError::Config(_))
        ));
        let err = TransferSession::from_args(
            "http://example.com/a",
            None,
            Some(i64::MAX),
            &GrabConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, DownloadError::Config(_)));
    }

    #[test]
    fn destination_derived_from_url() {
        let s = TransferSession::from_args(
            "https://host/dir/file.bin",
            None,
            None,
            &GrabConfig::default(),
        )
        .unwrap();
        assert_eq!(s.destination(), Path::new("file.bin"));
        assert_eq!(s.interval(), Duration::from_secs(1));
    }

    #[test]
    fn explicit_destination_wins() {
        let s = TransferSession::from_args(
            "https://host/dir/file.bin",
            Some(PathBuf::from("/tmp/out.iso")),
            Some(5),
            &GrabConfig::default(),
        )
        .unwrap();
        assert_eq!(s.destination(), Path::new("/tmp/out.iso"));
        assert_eq!(s.interval(), Duration::from_secs(5));
    }

    #[test]
    fn interval_checked_before_url() {
        let err = TransferSession::from_args("not-a-url", None, Some(0), &GrabConfig::default())
            .unwrap_err();
        assert!(matches!(err, DownloadError::Config(_)));
        let err = TransferSession::from_args("not-a-url", None, Some(1), &GrabConfig::default())
            .unwrap_err();
        assert!(matches!(err, DownloadError::Validation { .. }));
    }

    #[test]
    fn config_supplies_defaults() {
        let cfg = GrabConfig {
            default_interval_secs: 3,
            connect_timeout_secs: 2,
            user_agent: Some("grab-test".to_string()),
            ..GrabConfig::default()
        };
        let s = TransferSession::from_args("http://example.com/a", None, None, &cfg).unwrap();
        assert_eq!(s.interval(), Duration::from_secs(3));
        assert_eq!(s.curl_options().connect_timeout, Duration::from_secs(2));
        assert_eq!(s.curl_options().user_agent.as_deref(), Some("grab-test"));
    }

    #[test]
    fn sub_second_interval_rejected() {
        let url = Url::parse("http://example.com/a").unwrap();
        assert!(TransferSession::new(url.clone(), None, Duration::from_millis(500)).is_err());
        assert!(TransferSession::new(url, None, Duration::MAX).is_err());
    }
}
