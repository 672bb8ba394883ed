//! HTTP access to the source video.
//!
//! The source is never downloaded whole: [`SourceClient::probe_size`] reads
//! only headers, and [`SourceClient::fetch_range`] pulls one byte range at a
//! time with a `Range` request.

mod client;
mod range;

pub use client::{SourceClient, SourceConfig};
pub use range::{ContentRange, parse_content_range};

/// Errors from the source client.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("source returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("size unavailable: {0}")]
    SizeUnavailable(String),

    #[error("range mismatch for bytes {requested}: {detail}")]
    RangeMismatch {
        requested: adupload_transfer::ByteRange,
        detail: String,
    },
}
