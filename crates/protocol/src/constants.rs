use serde::{Deserialize, Serialize};

/// Graph API version the ingestion endpoint is addressed with.
pub const DEFAULT_API_VERSION: &str = "v19.0";

/// Default Graph API host.
pub const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.facebook.com";

/// Edge on an ad account that accepts chunked video uploads.
pub const ADVIDEOS_EDGE: &str = "advideos";

/// Prefix Graph uses for ad account node ids.
pub const AD_ACCOUNT_PREFIX: &str = "act_";

/// Multipart field carrying the raw chunk bytes in the `transfer` phase.
pub const CHUNK_FIELD: &str = "video_file_chunk";

/// Largest source video accepted by default: 250 MiB.
pub const DEFAULT_MAX_VIDEO_SIZE: u64 = 250 * 1024 * 1024;

/// Phase selector sent as `upload_phase` on every ingestion call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadPhase {
    Start,
    Transfer,
    Finish,
}

impl UploadPhase {
    /// Wire representation of the phase.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Transfer => "transfer",
            Self::Finish => "finish",
        }
    }
}

impl std::fmt::Display for UploadPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the Graph node id for an ad account.
///
/// Callers may pass either the bare numeric id or one that already carries
/// the `act_` prefix.
pub fn ad_account_node(account_id: &str) -> String {
    let id = account_id.trim();
    if id.starts_with(AD_ACCOUNT_PREFIX) {
        id.to_string()
    } else {
        format!("{AD_ACCOUNT_PREFIX}{id}")
    }
}
