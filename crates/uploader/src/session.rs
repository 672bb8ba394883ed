//! Session boundaries: source probe, session start, session finish.

use adupload_transfer::UploadSession;
use tracing::{debug, info};

use crate::error::UploadError;
use crate::platform::{VideoPlatform, VideoSource};

/// Reads the source size and enforces the ceiling.
///
/// Runs before any platform call, so an oversized or unsizable source never
/// opens a session.
pub async fn probe_source_size(
    source: &dyn VideoSource,
    url: &str,
    max_video_size: u64,
) -> Result<u64, UploadError> {
    let size = source.probe_size(url).await?;
    if size == 0 {
        return Err(UploadError::SizeUnavailable(
            "source reported an empty file".into(),
        ));
    }
    if size > max_video_size {
        return Err(UploadError::TooLarge {
            size,
            limit: max_video_size,
        });
    }

    debug!(url = %url, size, "source size probed");
    Ok(size)
}

/// Opens a new platform session for `total_size` bytes.
pub async fn negotiate_session(
    platform: &dyn VideoPlatform,
    account_id: &str,
    total_size: u64,
) -> Result<UploadSession, UploadError> {
    let start = platform.start(account_id, total_size).await?;

    if start.session_id.is_empty() {
        return Err(UploadError::UnexpectedResponse(
            "start returned an empty upload session id".into(),
        ));
    }
    if start.video_id.is_empty() {
        return Err(UploadError::UnexpectedResponse(
            "start returned an empty video id".into(),
        ));
    }

    let session = UploadSession::new(
        start.session_id,
        start.video_id,
        start.start_offset,
        total_size,
    )?;

    info!(
        session_id = %session.session_id(),
        video_id = %session.video_id(),
        start_offset = session.cursor(),
        total_size,
        "upload session started"
    );
    Ok(session)
}

/// Closes a session whose bytes have all been acknowledged.
pub async fn finalize_session(
    platform: &dyn VideoPlatform,
    account_id: &str,
    session: &UploadSession,
) -> Result<(), UploadError> {
    if !session.is_complete() {
        return Err(UploadError::UnexpectedResponse(format!(
            "finish requested at offset {} of {}",
            session.cursor(),
            session.total_size()
        )));
    }

    platform.finish(account_id, session.session_id()).await?;
    info!(session_id = %session.session_id(), "upload session finished");
    Ok(())
}
