// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the contact guard service.
//!
//! The portfolio page posts its contact form here; the service runs the
//! guard pipeline and answers with a status object and the list of field
//! errors to render.

use crate::config::Config;
use crate::metrics::Metrics;
use crate::pipeline::{ContactPipeline, Outcome, SubmissionOutcome};
use crate::status::{PipelineState, Status};
use crate::validator::Submission;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Shared application state.
pub struct AppState {
    pub pipeline: ContactPipeline,
    pub metrics: Metrics,
    pub config: Config,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Current pipeline state response.
#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub state: PipelineState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/contact", post(submit))
        .route("/contact/status", get(current_state));

    if state.config.metrics.enabled {
        router = router.route(&state.config.metrics.path, get(metrics));
    }

    router.with_state(state)
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "contact-guard",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Run a contact form submission through the guard pipeline.
pub async fn submit(
    State(state): State<Arc<AppState>>,
    Json(submission): Json<Submission>,
) -> Response {
    debug!(
        name_len = submission.name.len(),
        message_len = submission.message.len(),
        "Processing contact submission"
    );

    let result = state.pipeline.submit(submission).await;
    state.metrics.record(result.stage);
    info!(outcome = result.stage.label(), "Contact submission finished");

    into_response(result)
}

fn into_response(result: SubmissionOutcome) -> Response {
    match result.stage {
        Outcome::BotDetected | Outcome::Delivered | Outcome::DeliveryNotConfigured => {
            (StatusCode::OK, Json(result)).into_response()
        }
        Outcome::RateLimited { remaining_seconds } => (
            StatusCode::TOO_MANY_REQUESTS,
            [(header::RETRY_AFTER, remaining_seconds.to_string())],
            Json(result),
        )
            .into_response(),
        Outcome::Invalid => (StatusCode::UNPROCESSABLE_ENTITY, Json(result)).into_response(),
        Outcome::DeliveryFailed => (StatusCode::BAD_GATEWAY, Json(result)).into_response(),
    }
}

/// Report the pipeline state and the status currently on display.
pub async fn current_state(State(state): State<Arc<AppState>>) -> Json<StateResponse> {
    let (pipeline_state, status) = state.pipeline.board().snapshot();
    Json(StateResponse {
        state: pipeline_state,
        status,
    })
}

/// Prometheus metrics endpoint.
pub async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
