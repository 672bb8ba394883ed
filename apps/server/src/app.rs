//! HTTP application: router, upload handler, server lifecycle.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use adupload_graph::GraphClient;
use adupload_protocol::api::{
    INVALID_BODY_ERROR, INVALID_URL_ERROR, MISSING_FIELDS_ERROR, SIZE_UNAVAILABLE_ERROR,
    TOO_LARGE_ERROR, UPLOAD_FAILED_ERROR,
};
use adupload_protocol::{ErrorResponse, UploadVideoRequest, UploadVideoResponse};
use adupload_source::SourceClient;
use adupload_uploader::{UploadError, UploadOrchestrator, UploadOutcome, UploadRequest};
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{Instrument, error, info, info_span, warn};

use crate::adapter::{GraphPlatform, HttpSource};
use crate::config::Config;

/// Path of the upload operation.
pub const UPLOAD_ROUTE: &str = "/facebook/upload-video";

const MIB: u64 = 1024 * 1024;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    orchestrator: UploadOrchestrator,
}

impl AppState {
    pub fn new(orchestrator: UploadOrchestrator) -> Self {
        Self { orchestrator }
    }
}

/// Builds the router. `request_timeout` bounds each inbound request.
pub fn router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route(UPLOAD_ROUTE, post(upload_video))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Runs the server until Ctrl-C.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let source = SourceClient::new(config.source_config())?;
    let graph = GraphClient::new(config.graph_config())?;
    let orchestrator = UploadOrchestrator::new(
        Arc::new(HttpSource::new(source)),
        Arc::new(GraphPlatform::new(graph)),
        config.upload_config(),
    );
    let app = router(AppState::new(orchestrator), config.request_timeout());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "upload service listening");

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
        }
        signal_cancel.cancel();
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Upload handler
// ---------------------------------------------------------------------------

async fn upload_video(
    State(state): State<AppState>,
    payload: Result<Json<UploadVideoRequest>, JsonRejection>,
) -> Response {
    let request_id = uuid::Uuid::new_v4();
    handle_upload(&state, payload)
        .instrument(info_span!("upload", %request_id))
        .await
}

async fn handle_upload(
    state: &AppState,
    payload: Result<Json<UploadVideoRequest>, JsonRejection>,
) -> Response {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "rejected request body");
            return error_reply(
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(INVALID_BODY_ERROR, Some(Value::String(rejection.body_text()))),
            );
        }
    };

    if body.video_url.trim().is_empty() || body.ad_account_id.trim().is_empty() {
        return error_reply(
            StatusCode::BAD_REQUEST,
            ErrorResponse::new(MISSING_FIELDS_ERROR, None),
        );
    }

    let request = match UploadRequest::new(body.video_url, body.ad_account_id) {
        Ok(request) => request,
        Err(e) => {
            let (status, body) = failure_response(&e);
            return error_reply(status, body);
        }
    };

    info!(
        video_url = %request.source_url,
        account_id = %request.account_id,
        "upload requested"
    );

    match state.orchestrator.upload(&request).await {
        Ok(UploadOutcome::Ready { video_id }) => {
            (StatusCode::OK, Json(UploadVideoResponse::ready(video_id))).into_response()
        }
        Ok(UploadOutcome::StillProcessing { video_id }) => (
            StatusCode::OK,
            Json(UploadVideoResponse::still_processing(video_id)),
        )
            .into_response(),
        Err(e) => {
            if e.is_client_error() {
                warn!(error = %e, "video upload rejected");
            } else {
                error!(
                    error = %e,
                    platform_status = ?e.platform_status(),
                    details = %e.details(),
                    "video upload failed"
                );
            }
            let (status, body) = failure_response(&e);
            error_reply(status, body)
        }
    }
}

/// Status code and body reported for a failed upload.
pub fn failure_response(e: &UploadError) -> (StatusCode, ErrorResponse) {
    match e {
        UploadError::TooLarge { size, limit } => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new(
                TOO_LARGE_ERROR,
                Some(Value::String(format!(
                    "Max allowed size is {}MB. Got {:.1}MB",
                    limit / MIB,
                    *size as f64 / MIB as f64
                ))),
            ),
        ),
        UploadError::SizeUnavailable(_) => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new(SIZE_UNAVAILABLE_ERROR, Some(e.details())),
        ),
        UploadError::Validation(_) => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new(INVALID_URL_ERROR, Some(e.details())),
        ),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new(UPLOAD_FAILED_ERROR, Some(e.details())),
        ),
    }
}

fn error_reply(status: StatusCode, body: ErrorResponse) -> Response {
    (status, Json(body)).into_response()
}
