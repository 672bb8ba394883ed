//! Graph API client for the `advideos` chunked upload protocol.
//!
//! One ingestion endpoint serves three phases selected by `upload_phase`:
//! `start` opens a session, `transfer` pushes one chunk at the offset Graph
//! asked for, `finish` closes the session. Transcoding progress is read from
//! the video node's `status` field.

pub mod client;

pub use client::{Error, GraphClient, GraphConfig};
