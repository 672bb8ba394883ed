//! Data types for the upload flow.

use std::time::Duration;

use adupload_protocol::constants::DEFAULT_MAX_VIDEO_SIZE;
use adupload_transfer::DEFAULT_CHUNK_SIZE;

use crate::error::UploadError;

/// A validated upload request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    /// HTTP(S) URL the video is pulled from.
    pub source_url: String,
    /// Target ad account, with or without the `act_` prefix.
    pub account_id: String,
}

impl UploadRequest {
    /// Validates the raw fields before any network call is made.
    pub fn new(
        source_url: impl Into<String>,
        account_id: impl Into<String>,
    ) -> Result<Self, UploadError> {
        let source_url = source_url.into().trim().to_string();
        let account_id = account_id.into().trim().to_string();

        if source_url.is_empty() || account_id.is_empty() {
            return Err(UploadError::Validation(
                "video_url and ad_account_id are required".into(),
            ));
        }

        let parsed = url::Url::parse(&source_url)
            .map_err(|e| UploadError::Validation(format!("invalid video_url: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(UploadError::Validation(format!(
                "unsupported video_url scheme: {}",
                parsed.scheme()
            )));
        }

        Ok(Self {
            source_url,
            account_id,
        })
    }
}

/// Upload policy: size ceiling, chunking, pacing and budgets.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadConfig {
    /// Largest accepted source, in bytes.
    pub max_video_size: u64,
    /// Bytes requested from the source per chunk.
    pub chunk_size: u64,
    /// Pause between chunk transfers.
    pub inter_chunk_delay: Duration,
    /// Pause before each status poll.
    pub poll_interval: Duration,
    /// Status polls before reporting "still processing".
    pub poll_attempts: u32,
    /// Upload attempts, each with a fresh session.
    pub max_attempts: u32,
    /// Pause before a retried attempt.
    pub retry_backoff: Duration,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_video_size: DEFAULT_MAX_VIDEO_SIZE,
            chunk_size: DEFAULT_CHUNK_SIZE,
            inter_chunk_delay: Duration::from_millis(300),
            poll_interval: Duration::from_secs(5),
            poll_attempts: 10,
            max_attempts: 2,
            retry_backoff: Duration::from_secs(5),
        }
    }
}

impl UploadConfig {
    /// Rejects settings the flow cannot run with.
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("chunk_size must be greater than zero".into());
        }
        if self.max_attempts == 0 {
            return Err("max_attempts must be at least 1".into());
        }
        if self.max_video_size == 0 {
            return Err("max_video_size must be greater than zero".into());
        }
        Ok(())
    }
}

/// Successful end of an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Uploaded and processed.
    Ready { video_id: String },
    /// Uploaded; processing had not finished when polling stopped.
    StillProcessing { video_id: String },
}

impl UploadOutcome {
    pub fn video_id(&self) -> &str {
        match self {
            Self::Ready { video_id } | Self::StillProcessing { video_id } => video_id,
        }
    }
}

/// Result of one attempt (negotiate → transfer → finish → poll).
#[derive(Debug, Clone)]
pub enum AttemptOutcome {
    Success(UploadOutcome),
    /// A fresh attempt may succeed.
    Retryable(UploadError),
    /// Stop now.
    Fatal(UploadError),
}

impl From<Result<UploadOutcome, UploadError>> for AttemptOutcome {
    fn from(result: Result<UploadOutcome, UploadError>) -> Self {
        match result {
            Ok(outcome) => Self::Success(outcome),
            Err(e) if e.is_retryable() => Self::Retryable(e),
            Err(e) => Self::Fatal(e),
        }
    }
}
