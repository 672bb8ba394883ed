//! Seams between the upload flow and the outside world.
//!
//! The server implements these traits on top of the HTTP clients; the unit
//! tests implement them in memory.

use std::future::Future;
use std::pin::Pin;

use adupload_protocol::ProcessingStatus;
use adupload_transfer::{ByteRange, ChunkAck};

use crate::error::UploadError;

/// A boxed future returned by source and platform calls.
pub type UploadFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, UploadError>> + Send + 'a>>;

/// Where video bytes come from.
pub trait VideoSource: Send + Sync {
    /// Declared byte length of the video, without downloading it.
    fn probe_size<'a>(&'a self, url: &'a str) -> UploadFuture<'a, u64>;

    /// Exactly the bytes of the inclusive `range`.
    fn fetch_range<'a>(&'a self, url: &'a str, range: ByteRange) -> UploadFuture<'a, Vec<u8>>;
}

/// Platform answer to a session `start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStart {
    pub session_id: String,
    pub video_id: String,
    /// Offset the platform wants the first chunk at. Not necessarily zero.
    pub start_offset: u64,
}

/// The chunked ingestion protocol of the video platform.
pub trait VideoPlatform: Send + Sync {
    /// Opens a session for a file of `file_size` bytes.
    fn start<'a>(&'a self, account_id: &'a str, file_size: u64) -> UploadFuture<'a, SessionStart>;

    /// Sends `chunk` as the bytes starting at `offset`.
    fn transfer<'a>(
        &'a self,
        account_id: &'a str,
        session_id: &'a str,
        offset: u64,
        chunk: Vec<u8>,
    ) -> UploadFuture<'a, ChunkAck>;

    /// Closes the session.
    fn finish<'a>(&'a self, account_id: &'a str, session_id: &'a str) -> UploadFuture<'a, ()>;

    /// Current processing state of an uploaded video.
    fn video_status<'a>(&'a self, video_id: &'a str) -> UploadFuture<'a, ProcessingStatus>;
}
