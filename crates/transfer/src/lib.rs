//! Upload session state for offset-addressed chunked transfers.
//!
//! The platform, not the client, decides how far a session has progressed:
//! [`UploadSession::advance`] only ever moves the cursor to an offset taken
//! from a [`ChunkAck`], and refuses acknowledgments that do not move forward.

mod chunked;
mod types;

pub use chunked::{ByteRange, RangePlan};
pub use types::{ChunkAck, UploadSession};

/// Default chunk size: 4 MiB.
///
/// Bounds memory per request independent of file size; each chunk is pulled
/// from the source and pushed to the platform before the next is fetched.
pub const DEFAULT_CHUNK_SIZE: u64 = 4 * 1024 * 1024;

/// Errors produced by the transfer crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransferError {
    #[error("transfer stalled: acknowledged offset {next_offset} does not advance past {offset}")]
    Stalled { offset: u64, next_offset: u64 },

    #[error("acknowledged offset {next_offset} is beyond file size {total_size}")]
    Overshoot { next_offset: u64, total_size: u64 },

    #[error("start offset {start_offset} is beyond file size {total_size}")]
    InvalidStartOffset { start_offset: u64, total_size: u64 },

    #[error("chunk size must be greater than zero")]
    ZeroChunkSize,
}
