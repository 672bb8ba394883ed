//! Request and response bodies for the `advideos` ingestion phases and the
//! video status resource.

use serde::{Deserialize, Serialize};

use crate::constants::UploadPhase;
use crate::serde_helpers::offset;
use crate::types::ProcessingStatus;

// ---------------------------------------------------------------------------
// start
// ---------------------------------------------------------------------------

/// Opens an upload session for a file of `file_size` bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartRequest {
    pub upload_phase: UploadPhase,
    pub file_size: u64,
}

impl StartRequest {
    pub fn new(file_size: u64) -> Self {
        Self {
            upload_phase: UploadPhase::Start,
            file_size,
        }
    }
}

/// Session handle and the first offset Graph wants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartResponse {
    pub upload_session_id: String,
    pub video_id: String,
    #[serde(with = "offset")]
    pub start_offset: u64,
    #[serde(with = "offset", default)]
    pub end_offset: u64,
}

// ---------------------------------------------------------------------------
// transfer
// ---------------------------------------------------------------------------

/// Text fields of a `transfer` call. The chunk itself travels as a binary
/// multipart part named [`crate::constants::CHUNK_FIELD`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub upload_phase: UploadPhase,
    pub upload_session_id: String,
    #[serde(with = "offset")]
    pub start_offset: u64,
}

impl TransferRequest {
    pub fn new(upload_session_id: impl Into<String>, start_offset: u64) -> Self {
        Self {
            upload_phase: UploadPhase::Transfer,
            upload_session_id: upload_session_id.into(),
            start_offset,
        }
    }

    /// Field name/value pairs in the order they are written to the form.
    pub fn form_fields(&self) -> [(&'static str, String); 3] {
        [
            ("upload_phase", self.upload_phase.as_str().to_string()),
            ("upload_session_id", self.upload_session_id.clone()),
            ("start_offset", self.start_offset.to_string()),
        ]
    }
}

/// Acknowledgment of a chunk.
///
/// `start_offset` is where Graph wants the next chunk to begin. It is the
/// only value the client may advance its cursor to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferResponse {
    #[serde(with = "offset")]
    pub start_offset: u64,
    #[serde(with = "offset")]
    pub end_offset: u64,
}

impl TransferResponse {
    /// Next offset Graph expects data from.
    pub fn next_offset(&self) -> u64 {
        self.start_offset
    }
}

// ---------------------------------------------------------------------------
// finish
// ---------------------------------------------------------------------------

/// Closes an upload session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinishRequest {
    pub upload_phase: UploadPhase,
    pub upload_session_id: String,
}

impl FinishRequest {
    pub fn new(upload_session_id: impl Into<String>) -> Self {
        Self {
            upload_phase: UploadPhase::Finish,
            upload_session_id: upload_session_id.into(),
        }
    }
}

/// Result of a `finish` call. An empty body counts as success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinishResponse {
    #[serde(default = "default_true")]
    pub success: bool,
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// status
// ---------------------------------------------------------------------------

/// `status` field of a video node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoStatus {
    #[serde(default)]
    pub video_status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_progress: Option<u32>,
}

/// Response of `GET /{video_id}?fields=status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoStatusResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<VideoStatus>,
}

impl VideoStatusResponse {
    /// Interprets the reported status; a missing status object is `Unknown`.
    pub fn processing_status(&self) -> ProcessingStatus {
        self.status
            .as_ref()
            .map(|s| ProcessingStatus::from_wire(&s.video_status))
            .unwrap_or(ProcessingStatus::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_response_string_offsets() {
        let json = r#"{"video_id":"v1","start_offset":"0","end_offset":"1048576","upload_session_id":"s1"}"#;
        let resp: StartResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.upload_session_id, "s1");
        assert_eq!(resp.video_id, "v1");
        assert_eq!(resp.start_offset, 0);
        assert_eq!(resp.end_offset, 1_048_576);
    }

    #[test]
    fn start_response_nonzero_start() {
        let json = r#"{"video_id":"v1","start_offset":"512","upload_session_id":"s1"}"#;
        let resp: StartResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.start_offset, 512);
        assert_eq!(resp.end_offset, 0);
    }

    #[test]
    fn start_request_wire_shape() {
        let v = serde_json::to_value(StartRequest::new(42)).unwrap();
        assert_eq!(v["upload_phase"], "start");
        assert_eq!(v["file_size"], 42);
    }

    #[test]
    fn transfer_form_fields() {
        let req = TransferRequest::new("sess", 4096);
        let fields = req.form_fields();
        assert_eq!(fields[0], ("upload_phase", "transfer".to_string()));
        assert_eq!(fields[1], ("upload_session_id", "sess".to_string()));
        assert_eq!(fields[2], ("start_offset", "4096".to_string()));
    }

    #[test]
    fn transfer_response_next_offset() {
        let json = r#"{"start_offset":"8192","end_offset":"12288"}"#;
        let resp: TransferResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.next_offset(), 8192);
    }

    #[test]
    fn finish_response_defaults_to_success() {
        let resp: FinishResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.success);
        let resp: FinishResponse = serde_json::from_str(r#"{"success":false}"#).unwrap();
        assert!(!resp.success);
    }

    #[test]
    fn video_status_processing_status() {
        let json = r#"{"id":"v1","status":{"video_status":"ready","processing_progress":100}}"#;
        let resp: VideoStatusResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.processing_status(), ProcessingStatus::Ready);

        let resp: VideoStatusResponse = serde_json::from_str(r#"{"id":"v1"}"#).unwrap();
        assert_eq!(resp.processing_status(), ProcessingStatus::Unknown);
    }
}
