//! Upload error taxonomy.

use adupload_protocol::GraphApiError;
use adupload_transfer::TransferError;

/// A failure reported by the video platform.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformFault {
    pub message: String,
    /// HTTP status, when the failure came with one.
    pub status: Option<u16>,
    /// Structured error body, when the platform sent one.
    pub error: Option<GraphApiError>,
}

impl PlatformFault {
    /// A fault with no structured body (transport failure, rejected call).
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            error: None,
        }
    }

    /// Only the platform's own `is_transient` flag makes a fault retryable.
    pub fn is_transient(&self) -> bool {
        self.error.as_ref().is_some_and(GraphApiError::is_transient)
    }
}

impl std::fmt::Display for PlatformFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.error {
            Some(e) => write!(f, "{e}"),
            None => f.write_str(&self.message),
        }
    }
}

/// Errors produced during an upload.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UploadError {
    #[error("invalid request: {0}")]
    Validation(String),

    #[error("unable to determine video file size: {0}")]
    SizeUnavailable(String),

    #[error("video too large: {size} bytes exceeds limit of {limit} bytes")]
    TooLarge { size: u64, limit: u64 },

    #[error("platform error: {0}")]
    Platform(PlatformFault),

    #[error("source fetch failed: {0}")]
    SourceFetch(String),

    #[error("source range mismatch: {0}")]
    SourceRangeMismatch(String),

    #[error("protocol violation: {0}")]
    Protocol(#[from] TransferError),

    #[error("unexpected platform response: {0}")]
    UnexpectedResponse(String),

    #[error("platform failed to process video {video_id}")]
    ProcessingFailed { video_id: String },
}

impl UploadError {
    /// Platform-flagged transient failure.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Platform(fault) if fault.is_transient())
    }

    /// Session state can no longer be trusted (stalled or overshooting acks,
    /// malformed responses).
    pub fn is_protocol_violation(&self) -> bool {
        matches!(self, Self::Protocol(_) | Self::UnexpectedResponse(_))
    }

    /// Whether a brand-new attempt may succeed where this one failed.
    pub fn is_retryable(&self) -> bool {
        self.is_transient() || self.is_protocol_violation()
    }

    /// Failures caused by the request itself (HTTP 400).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::SizeUnavailable(_) | Self::TooLarge { .. }
        )
    }

    /// HTTP status the platform answered with, if the failure carried one.
    pub fn platform_status(&self) -> Option<u16> {
        match self {
            Self::Platform(fault) => fault.status,
            _ => None,
        }
    }

    /// Details for API callers: the platform's structured error body when
    /// present, the error message otherwise.
    pub fn details(&self) -> serde_json::Value {
        if let Self::Platform(PlatformFault {
            error: Some(error), ..
        }) = self
            && let Ok(value) = serde_json::to_value(error)
        {
            return value;
        }
        serde_json::Value::String(self.to_string())
    }
}
