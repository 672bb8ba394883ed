//! Adapters bridging the HTTP clients to the traits required by
//! `adupload-uploader`.
//!
//! Each client keeps its own error type; these wrappers translate them into
//! [`UploadError`] so the upload flow can classify them.

use adupload_graph::GraphClient;
use adupload_protocol::ProcessingStatus;
use adupload_source::{SourceClient, SourceError};
use adupload_transfer::{ByteRange, ChunkAck};
use adupload_uploader::{
    PlatformFault, SessionStart, UploadError, UploadFuture, VideoPlatform, VideoSource,
};

// ---------------------------------------------------------------------------
// Source adapter
// ---------------------------------------------------------------------------

/// Implements [`VideoSource`] over HTTP range requests.
pub struct HttpSource {
    client: SourceClient,
}

impl HttpSource {
    pub fn new(client: SourceClient) -> Self {
        Self { client }
    }
}

impl VideoSource for HttpSource {
    fn probe_size<'a>(&'a self, url: &'a str) -> UploadFuture<'a, u64> {
        Box::pin(async move {
            self.client.probe_size(url).await.map_err(|e| match e {
                SourceError::SizeUnavailable(reason) => UploadError::SizeUnavailable(reason),
                other => UploadError::SourceFetch(other.to_string()),
            })
        })
    }

    fn fetch_range<'a>(&'a self, url: &'a str, range: ByteRange) -> UploadFuture<'a, Vec<u8>> {
        Box::pin(async move {
            self.client
                .fetch_range(url, range)
                .await
                .map_err(source_fetch_error)
        })
    }
}

fn source_fetch_error(e: SourceError) -> UploadError {
    match e {
        SourceError::RangeMismatch { .. } => UploadError::SourceRangeMismatch(e.to_string()),
        other => UploadError::SourceFetch(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Graph adapter
// ---------------------------------------------------------------------------

/// Implements [`VideoPlatform`] over the Graph advideos edge.
pub struct GraphPlatform {
    client: GraphClient,
}

impl GraphPlatform {
    pub fn new(client: GraphClient) -> Self {
        Self { client }
    }
}

impl VideoPlatform for GraphPlatform {
    fn start<'a>(&'a self, account_id: &'a str, file_size: u64) -> UploadFuture<'a, SessionStart> {
        Box::pin(async move {
            let resp = self
                .client
                .start(account_id, file_size)
                .await
                .map_err(platform_error)?;
            Ok(SessionStart {
                session_id: resp.upload_session_id,
                video_id: resp.video_id,
                start_offset: resp.start_offset,
            })
        })
    }

    fn transfer<'a>(
        &'a self,
        account_id: &'a str,
        session_id: &'a str,
        offset: u64,
        chunk: Vec<u8>,
    ) -> UploadFuture<'a, ChunkAck> {
        Box::pin(async move {
            let resp = self
                .client
                .transfer(account_id, session_id, offset, chunk)
                .await
                .map_err(platform_error)?;
            Ok(ChunkAck::from(&resp))
        })
    }

    fn finish<'a>(&'a self, account_id: &'a str, session_id: &'a str) -> UploadFuture<'a, ()> {
        Box::pin(async move {
            let resp = self
                .client
                .finish(account_id, session_id)
                .await
                .map_err(platform_error)?;
            if !resp.success {
                return Err(UploadError::Platform(PlatformFault::message(format!(
                    "finish not acknowledged for session {session_id}"
                ))));
            }
            Ok(())
        })
    }

    fn video_status<'a>(&'a self, video_id: &'a str) -> UploadFuture<'a, ProcessingStatus> {
        Box::pin(async move {
            let resp = self
                .client
                .video_status(video_id)
                .await
                .map_err(platform_error)?;
            Ok(resp.processing_status())
        })
    }
}

fn platform_error(e: adupload_graph::Error) -> UploadError {
    match e {
        adupload_graph::Error::Json(_) => UploadError::UnexpectedResponse(e.to_string()),
        e => UploadError::Platform(PlatformFault {
            message: e.to_string(),
            status: e.status(),
            error: e.api_error().cloned(),
        }),
    }
}
