//! Source video client.
//!
//! Async HTTP client using `reqwest`, with separate timeouts for the header
//! probe and for range downloads.

use std::time::Duration;

use adupload_transfer::ByteRange;
use reqwest::StatusCode;
use reqwest::header::{CONTENT_LENGTH, CONTENT_RANGE, RANGE};
use tracing::debug;

use crate::SourceError;
use crate::range::parse_content_range;

/// Per-call timeouts for source requests.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Timeout for the `HEAD` size probe.
    pub probe_timeout: Duration,
    /// Timeout for each range download.
    pub fetch_timeout: Duration,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            probe_timeout: Duration::from_secs(30),
            fetch_timeout: Duration::from_secs(120),
        }
    }
}

/// Fetches metadata and byte ranges of remote source files.
#[derive(Debug, Clone)]
pub struct SourceClient {
    http: reqwest::Client,
    config: SourceConfig,
}

impl SourceClient {
    /// Creates a client with the given timeouts.
    pub fn new(config: SourceConfig) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self { http, config })
    }

    /// Returns the declared byte length of the resource at `url` without
    /// downloading its body.
    pub async fn probe_size(&self, url: &str) -> Result<u64, SourceError> {
        let resp = self
            .http
            .head(url)
            .timeout(self.config.probe_timeout)
            .send()
            .await?;
        let status = resp.status();

        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let size = resp
            .headers()
            .get(CONTENT_LENGTH)
            .ok_or_else(|| SourceError::SizeUnavailable("missing Content-Length".into()))?
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .ok_or_else(|| SourceError::SizeUnavailable("malformed Content-Length".into()))?;

        if size == 0 {
            return Err(SourceError::SizeUnavailable("Content-Length is zero".into()));
        }

        debug!(url, size, "probed source size");
        Ok(size)
    }

    /// Downloads exactly the inclusive byte range `range` of `url`.
    ///
    /// The server must answer `206 Partial Content` with a matching
    /// `Content-Range`; a full-body `200` or a different range is a
    /// [`SourceError::RangeMismatch`].
    pub async fn fetch_range(&self, url: &str, range: ByteRange) -> Result<Vec<u8>, SourceError> {
        let resp = self
            .http
            .get(url)
            .header(RANGE, range.header_value())
            .timeout(self.config.fetch_timeout)
            .send()
            .await?;
        let status = resp.status();

        if status == StatusCode::OK {
            return Err(mismatch(range, "server ignored Range header"));
        }
        if status != StatusCode::PARTIAL_CONTENT {
            return Err(SourceError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let header = resp
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| mismatch(range, "missing Content-Range"))?;
        let served = parse_content_range(&header)
            .ok_or_else(|| mismatch(range, &format!("malformed Content-Range {header:?}")))?;
        if served.start != range.start || served.end != range.end {
            return Err(mismatch(
                range,
                &format!("server sent bytes {}-{}", served.start, served.end),
            ));
        }

        let data = resp.bytes().await?.to_vec();
        if data.len() as u64 != range.len() {
            return Err(mismatch(
                range,
                &format!("expected {} bytes, got {}", range.len(), data.len()),
            ));
        }

        debug!(url, range = %range, total = ?served.total, "fetched source range");
        Ok(data)
    }
}

fn mismatch(requested: ByteRange, detail: &str) -> SourceError {
    SourceError::RangeMismatch {
        requested,
        detail: detail.to_string(),
    }
}
