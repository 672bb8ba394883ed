use serde::{Deserialize, Serialize};

/// Processing state of an uploaded video, as observed by polling.
///
/// Graph reports free-form strings; only `ready` and `error` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStatus {
    /// Graph is still transcoding (`processing`, `in_progress`, `upload_complete`).
    Pending,
    /// Video is playable.
    Ready,
    /// Graph gave up on the video.
    Error,
    /// Any status string not recognised above. Treated like `Pending`.
    Unknown,
}

impl ProcessingStatus {
    /// Maps a Graph `video_status` string.
    pub fn from_wire(status: &str) -> Self {
        match status {
            "ready" => Self::Ready,
            "error" => Self::Error,
            "processing" | "in_progress" | "upload_complete" => Self::Pending,
            _ => Self::Unknown,
        }
    }
}

/// Structured error object returned by Graph on failure.
///
/// Unrecognised fields are kept in `extra` so the full body can be handed
/// back to API callers unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphApiError {
    #[serde(default)]
    pub message: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_subcode: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_transient: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_user_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_user_msg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fbtrace_id: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl GraphApiError {
    /// Whether Graph flagged the failure as safe to retry.
    pub fn is_transient(&self) -> bool {
        self.is_transient.unwrap_or(false)
    }
}

impl std::fmt::Display for GraphApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} (code {code})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Envelope Graph wraps errors in: `{"error": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphErrorBody {
    pub error: GraphApiError,
}
