//! Wire types shared by the upload service.
//!
//! Two surfaces live here:
//! - the Graph `advideos` ingestion endpoint (`start` / `transfer` / `finish`
//!   phases plus the video status resource), in [`messages`] and [`types`];
//! - the inbound JSON API accepted and returned by the server, in [`api`].

pub mod api;
pub mod constants;
pub mod messages;
pub mod types;

pub mod serde_helpers;

// Re-export primary types for convenience.
pub use api::{ErrorResponse, UploadVideoRequest, UploadVideoResponse};
pub use constants::UploadPhase;
pub use messages::{
    FinishRequest, FinishResponse, StartRequest, StartResponse, TransferRequest, TransferResponse,
    VideoStatus, VideoStatusResponse,
};
pub use serde_helpers::parse_offset;
pub use types::{GraphApiError, GraphErrorBody, ProcessingStatus};

/// Errors produced while interpreting protocol values.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("invalid offset: {0}")]
    InvalidOffset(String),
}
