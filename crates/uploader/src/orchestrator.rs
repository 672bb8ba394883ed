//! Attempt-level retry around the session pipeline.

use std::sync::Arc;

use tracing::{info, warn};

use crate::engine::ChunkTransferEngine;
use crate::error::UploadError;
use crate::platform::{VideoPlatform, VideoSource};
use crate::poller::StatusPoller;
use crate::session::{finalize_session, negotiate_session, probe_source_size};
use crate::types::{AttemptOutcome, UploadConfig, UploadOutcome, UploadRequest};

/// Runs uploads end to end.
///
/// Cheap to clone; each [`upload`](Self::upload) call owns its own session
/// and shares nothing mutable with concurrent calls.
#[derive(Clone)]
pub struct UploadOrchestrator {
    source: Arc<dyn VideoSource>,
    platform: Arc<dyn VideoPlatform>,
    config: UploadConfig,
}

impl UploadOrchestrator {
    pub fn new(
        source: Arc<dyn VideoSource>,
        platform: Arc<dyn VideoPlatform>,
        config: UploadConfig,
    ) -> Self {
        Self {
            source,
            platform,
            config,
        }
    }

    /// Uploads the video at `request.source_url` into `request.account_id`.
    ///
    /// The source is probed once. Each attempt then negotiates a new session
    /// and runs transfer, finish and polling. A retryable failure waits
    /// `retry_backoff` and starts over with a fresh session while attempts
    /// remain.
    pub async fn upload(&self, request: &UploadRequest) -> Result<UploadOutcome, UploadError> {
        let total_size = probe_source_size(
            self.source.as_ref(),
            &request.source_url,
            self.config.max_video_size,
        )
        .await?;

        let mut attempt = 1;
        loop {
            let result = self.attempt(request, total_size, attempt).await;
            match AttemptOutcome::from(result) {
                AttemptOutcome::Success(outcome) => {
                    info!(
                        video_id = %outcome.video_id(),
                        attempt,
                        ready = matches!(outcome, UploadOutcome::Ready { .. }),
                        "upload complete"
                    );
                    return Ok(outcome);
                }
                AttemptOutcome::Retryable(e) if attempt < self.config.max_attempts => {
                    warn!(
                        attempt,
                        max_attempts = self.config.max_attempts,
                        error = %e,
                        "upload attempt failed, retrying with a new session"
                    );
                    tokio::time::sleep(self.config.retry_backoff).await;
                    attempt += 1;
                }
                AttemptOutcome::Retryable(e) | AttemptOutcome::Fatal(e) => {
                    warn!(attempt, error = %e, "upload failed");
                    return Err(e);
                }
            }
        }
    }

    /// Negotiate, transfer, finish, poll.
    async fn attempt(
        &self,
        request: &UploadRequest,
        total_size: u64,
        attempt: u32,
    ) -> Result<UploadOutcome, UploadError> {
        let platform = self.platform.as_ref();
        info!(
            attempt,
            account_id = %request.account_id,
            total_size,
            "starting upload attempt"
        );

        let mut session = negotiate_session(platform, &request.account_id, total_size).await?;

        ChunkTransferEngine::new(
            self.source.as_ref(),
            platform,
            self.config.chunk_size,
            self.config.inter_chunk_delay,
        )
        .run(&request.source_url, &request.account_id, &mut session)
        .await?;

        finalize_session(platform, &request.account_id, &session).await?;

        StatusPoller::new(platform, self.config.poll_interval, self.config.poll_attempts)
            .wait(session.video_id())
            .await
    }
}
