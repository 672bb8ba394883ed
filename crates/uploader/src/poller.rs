//! Post-upload processing status polling.

use std::time::Duration;

use adupload_protocol::ProcessingStatus;
use tracing::{debug, warn};

use crate::error::UploadError;
use crate::platform::VideoPlatform;
use crate::types::UploadOutcome;

/// Waits for the platform to finish processing an uploaded video.
pub struct StatusPoller<'a> {
    platform: &'a dyn VideoPlatform,
    interval: Duration,
    max_polls: u32,
}

impl<'a> StatusPoller<'a> {
    pub fn new(platform: &'a dyn VideoPlatform, interval: Duration, max_polls: u32) -> Self {
        Self {
            platform,
            interval,
            max_polls,
        }
    }

    /// Polls up to `max_polls` times, sleeping `interval` before each poll.
    ///
    /// `ready` ends with [`UploadOutcome::Ready`] and `error` with
    /// [`UploadError::ProcessingFailed`]. Pending and unrecognised states keep
    /// polling; running out of polls yields [`UploadOutcome::StillProcessing`].
    pub async fn wait(&self, video_id: &str) -> Result<UploadOutcome, UploadError> {
        for poll in 1..=self.max_polls {
            tokio::time::sleep(self.interval).await;

            match self.platform.video_status(video_id).await? {
                ProcessingStatus::Ready => {
                    debug!(video_id = %video_id, poll, "video ready");
                    return Ok(UploadOutcome::Ready {
                        video_id: video_id.to_string(),
                    });
                }
                ProcessingStatus::Error => {
                    return Err(UploadError::ProcessingFailed {
                        video_id: video_id.to_string(),
                    });
                }
                status @ (ProcessingStatus::Pending | ProcessingStatus::Unknown) => {
                    debug!(video_id = %video_id, poll, ?status, "video still processing");
                }
            }
        }

        warn!(
            video_id = %video_id,
            polls = self.max_polls,
            "processing not finished within poll budget"
        );
        Ok(UploadOutcome::StillProcessing {
            video_id: video_id.to_string(),
        })
    }
}
