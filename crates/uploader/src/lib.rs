//! Video upload flow: probe, negotiate, transfer, finish, poll.
//!
//! This crate implements the **session state machine** for pushing a remote
//! video into a chunked ingestion protocol. It has no HTTP dependencies: the
//! server provides [`VideoSource`] and [`VideoPlatform`] implementations that
//! bridge to the real clients.
//!
//! # Pipeline
//!
//! 1. **Probe**: read the source size, reject files over the ceiling
//! 2. **Negotiate**: open a fresh upload session on the platform
//! 3. **Transfer**: pull each byte range from the source and push it at the
//!    offset the platform asked for
//! 4. **Finish**: close the session once every byte is acknowledged
//! 5. **Poll**: wait for transcoding to reach a terminal state
//!
//! Steps 2 to 5 form one attempt. A transient platform failure or a protocol
//! violation restarts from step 2 with a new session, up to the attempt
//! budget; nothing resumes mid-session.

pub mod engine;
pub mod error;
pub mod orchestrator;
pub mod platform;
pub mod poller;
pub mod session;
pub mod types;

#[cfg(test)]
pub(crate) mod mock;

// Re-export primary types for convenience.
pub use engine::ChunkTransferEngine;
pub use error::{PlatformFault, UploadError};
pub use orchestrator::UploadOrchestrator;
pub use platform::{SessionStart, UploadFuture, VideoPlatform, VideoSource};
pub use poller::StatusPoller;
pub use session::{finalize_session, negotiate_session, probe_source_size};
pub use types::{AttemptOutcome, UploadConfig, UploadOutcome, UploadRequest};
