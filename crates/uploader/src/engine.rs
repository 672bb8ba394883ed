//! Sequential chunk transfer for one upload session.

use std::time::Duration;

use adupload_transfer::{RangePlan, UploadSession};
use tracing::debug;

use crate::error::UploadError;
use crate::platform::{VideoPlatform, VideoSource};

/// Moves bytes from the source to the platform, one chunk at a time, at the
/// offsets the platform asks for.
///
/// Each iteration fetches the range starting at the session cursor, sends it
/// and advances the cursor to the acknowledged offset. A short or stalled
/// acknowledgment is followed exactly: the next range starts where the
/// platform says, not where the previous chunk ended.
pub struct ChunkTransferEngine<'a> {
    source: &'a dyn VideoSource,
    platform: &'a dyn VideoPlatform,
    chunk_size: u64,
    inter_chunk_delay: Duration,
}

impl<'a> ChunkTransferEngine<'a> {
    pub fn new(
        source: &'a dyn VideoSource,
        platform: &'a dyn VideoPlatform,
        chunk_size: u64,
        inter_chunk_delay: Duration,
    ) -> Self {
        Self {
            source,
            platform,
            chunk_size,
            inter_chunk_delay,
        }
    }

    /// Transfers until every byte of `session` is acknowledged.
    pub async fn run(
        &self,
        source_url: &str,
        account_id: &str,
        session: &mut UploadSession,
    ) -> Result<(), UploadError> {
        let plan = RangePlan::new(session.total_size(), self.chunk_size)?;
        debug!(
            session_id = %session.session_id(),
            start_offset = session.cursor(),
            chunk_size = plan.chunk_size(),
            chunks = plan.chunk_count(),
            "starting chunk transfer"
        );

        while let Some(range) = plan.range_at(session.cursor()) {
            let chunk = self.source.fetch_range(source_url, range).await?;
            if chunk.len() as u64 != range.len() {
                return Err(UploadError::SourceRangeMismatch(format!(
                    "requested {} bytes for {range}, got {}",
                    range.len(),
                    chunk.len()
                )));
            }

            let ack = self
                .platform
                .transfer(account_id, session.session_id(), range.start, chunk)
                .await?;
            let next = session.advance(ack)?;

            debug!(
                session_id = %session.session_id(),
                range = %range,
                next_offset = next,
                remaining = session.remaining(),
                percent = session.percentage(),
                "chunk acknowledged"
            );

            if !session.is_complete() && !self.inter_chunk_delay.is_zero() {
                tokio::time::sleep(self.inter_chunk_delay).await;
            }
        }
        Ok(())
    }
}
