//! Graph API client.
//!
//! Async HTTP client using `reqwest` with Bearer token authentication and
//! per-call timeouts: chunk transfers get a longer budget than the control
//! calls (`start`, `finish`, status).

use std::time::Duration;

use adupload_protocol::constants::{
    ADVIDEOS_EDGE, CHUNK_FIELD, DEFAULT_API_VERSION, DEFAULT_GRAPH_BASE_URL, ad_account_node,
};
use adupload_protocol::{
    FinishRequest, FinishResponse, GraphApiError, GraphErrorBody, StartRequest, StartResponse,
    TransferRequest, TransferResponse, VideoStatusResponse,
};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Characters left unescaped in node ids (`act_123`, numeric video ids).
const NODE_ID: &AsciiSet = &NON_ALPHANUMERIC.remove(b'_').remove(b'-').remove(b'.');

/// Errors from the Graph client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {}", api_message(.error, .body))]
    Api {
        status: u16,
        /// Structured error object, when the body carried one.
        error: Option<GraphApiError>,
        body: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid access token")]
    InvalidToken,
}

impl Error {
    /// Structured Graph error, if any.
    pub fn api_error(&self) -> Option<&GraphApiError> {
        match self {
            Self::Api { error, .. } => error.as_ref(),
            _ => None,
        }
    }

    /// Whether Graph flagged this failure as transient.
    ///
    /// Transport failures carry no such flag and are reported as permanent.
    pub fn is_transient(&self) -> bool {
        self.api_error().is_some_and(GraphApiError::is_transient)
    }

    /// HTTP status of an API error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Connection settings for [`GraphClient`].
#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub base_url: String,
    pub api_version: String,
    pub access_token: String,
    /// Timeout for `start`, `finish` and status calls.
    pub request_timeout: Duration,
    /// Timeout for each chunk `transfer` call.
    pub transfer_timeout: Duration,
}

impl GraphConfig {
    /// Settings for the public Graph host with default timeouts.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_GRAPH_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            access_token: access_token.into(),
            request_timeout: Duration::from_secs(60),
            transfer_timeout: Duration::from_secs(120),
        }
    }
}

/// Graph API client.
#[derive(Debug, Clone)]
pub struct GraphClient {
    http: reqwest::Client,
    config: GraphConfig,
}

impl GraphClient {
    /// Creates a new client; the access token is sent on every request.
    pub fn new(config: GraphConfig) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.access_token))
            .map_err(|_| Error::InvalidToken)?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self { http, config })
    }

    fn node_url(&self, node: &str) -> String {
        format!(
            "{}/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.api_version,
            utf8_percent_encode(node, NODE_ID)
        )
    }

    fn advideos_url(&self, account_id: &str) -> String {
        format!(
            "{}/{ADVIDEOS_EDGE}",
            self.node_url(&ad_account_node(account_id))
        )
    }

    /// Sends a request and decodes a successful body as `T`.
    ///
    /// Non-2xx responses, and 2xx bodies that carry an `error` object instead
    /// of `T`, become [`Error::Api`].
    async fn send<T: DeserializeOwned>(&self, req: reqwest::RequestBuilder) -> Result<T, Error> {
        let resp = req.send().await?;
        let status = resp.status();
        let body = resp.bytes().await?;

        if !status.is_success() {
            return Err(api_error(status.as_u16(), &body));
        }

        // An `error` envelope wins over any partial decode of `T`.
        let value: serde_json::Value = serde_json::from_slice(&body)?;
        if value.get("error").is_some() {
            return Err(api_error(status.as_u16(), &body));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// `start` phase: opens a session for a file of `file_size` bytes.
    pub async fn start(&self, account_id: &str, file_size: u64) -> Result<StartResponse, Error> {
        let req = self
            .http
            .post(self.advideos_url(account_id))
            .timeout(self.config.request_timeout)
            .form(&StartRequest::new(file_size));
        let resp: StartResponse = self.send(req).await?;
        debug!(
            session = %resp.upload_session_id,
            video_id = %resp.video_id,
            start_offset = resp.start_offset,
            "upload session started"
        );
        Ok(resp)
    }

    /// `transfer` phase: sends `chunk` as the bytes starting at `start_offset`.
    pub async fn transfer(
        &self,
        account_id: &str,
        session_id: &str,
        start_offset: u64,
        chunk: Vec<u8>,
    ) -> Result<TransferResponse, Error> {
        let len = chunk.len();
        let mut form = Form::new();
        for (name, value) in TransferRequest::new(session_id, start_offset).form_fields() {
            form = form.text(name, value);
        }
        let part = Part::bytes(chunk)
            .file_name("chunk")
            .mime_str("application/octet-stream")?;
        form = form.part(CHUNK_FIELD, part);

        let req = self
            .http
            .post(self.advideos_url(account_id))
            .timeout(self.config.transfer_timeout)
            .multipart(form);
        let resp: TransferResponse = self.send(req).await?;
        debug!(
            session = %session_id,
            start_offset,
            bytes = len,
            next_offset = resp.start_offset,
            "chunk acknowledged"
        );
        Ok(resp)
    }

    /// `finish` phase: closes the session.
    pub async fn finish(
        &self,
        account_id: &str,
        session_id: &str,
    ) -> Result<FinishResponse, Error> {
        let req = self
            .http
            .post(self.advideos_url(account_id))
            .timeout(self.config.request_timeout)
            .form(&FinishRequest::new(session_id));
        self.send(req).await
    }

    /// Reads the processing status of `video_id`.
    pub async fn video_status(&self, video_id: &str) -> Result<VideoStatusResponse, Error> {
        let req = self
            .http
            .get(self.node_url(video_id))
            .query(&[("fields", "status")])
            .timeout(self.config.request_timeout);
        self.send(req).await
    }
}

fn api_message(error: &Option<GraphApiError>, body: &str) -> String {
    match error {
        Some(e) => e.to_string(),
        None => body.to_string(),
    }
}

/// Builds an [`Error::Api`] from a failed response body.
fn api_error(status: u16, body: &[u8]) -> Error {
    let error = serde_json::from_slice::<GraphErrorBody>(body)
        .ok()
        .map(|b| b.error);
    Error::Api {
        status,
        error,
        body: String::from_utf8_lossy(body).into_owned(),
    }
}
