//! JSON bodies of the inbound `POST /facebook/upload-video` operation.

use serde::{Deserialize, Serialize};

use crate::serde_helpers::string_or_number;

/// Error label for a request missing one of its fields.
pub const MISSING_FIELDS_ERROR: &str = "Missing video_url or ad_account_id";
/// Error label for a request whose body is not valid JSON.
pub const INVALID_BODY_ERROR: &str = "Invalid request body";
/// Error label for a `video_url` that is not an HTTP(S) URL.
pub const INVALID_URL_ERROR: &str = "Invalid video_url";
/// Error label for a source above the size ceiling.
pub const TOO_LARGE_ERROR: &str = "Video too large";
/// Error label for a source whose size cannot be determined.
pub const SIZE_UNAVAILABLE_ERROR: &str = "Unable to determine video file size";
/// Error label for every terminal upload failure.
pub const UPLOAD_FAILED_ERROR: &str = "Video upload failed";
/// Warning attached when the upload finished but transcoding did not.
pub const STILL_PROCESSING_WARNING: &str = "Video still processing";

/// Upload request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadVideoRequest {
    #[serde(default)]
    pub video_url: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub ad_account_id: String,
}

/// Successful upload. `warning` is present when processing has not yet
/// been confirmed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadVideoResponse {
    pub video_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl UploadVideoResponse {
    pub fn ready(video_id: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
            warning: None,
        }
    }

    pub fn still_processing(video_id: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
            warning: Some(STILL_PROCESSING_WARNING.to_string()),
        }
    }
}

/// Failed upload (400 or 500).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, details: Option<serde_json::Value>) -> Self {
        Self {
            error: error.into(),
            details,
        }
    }
}
