// ABOUTME: POST /orchestrate handler fanning one prompt out to every selected model
// ABOUTME: Maps validation failures to 400, unreadable bodies to 500, and results to 200
//
// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 dravr.ai

use std::time::Instant;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;
use tracing::{error, info};

use crate::state::SharedState;
use crate::studio_types::{MessageResponse, StudioRequest, StudioResponse};

/// Handle POST /orchestrate
///
/// The body is decoded by hand so that a malformed body yields the same
/// `{message}` envelope as every other failure rather than axum's
/// extractor rejection.
pub async fn handle(State(state): State<SharedState>, body: Bytes) -> Response {
    let request = match decode(&body) {
        Ok(request) => request,
        Err(message) => {
            error!(error = %message, "Rejecting unreadable orchestrate body");
            let body = Json(MessageResponse::new(message));
            return (StatusCode::INTERNAL_SERVER_ERROR, body).into_response();
        }
    };

    let request = request.into_orchestration();
    let started = Instant::now();
    match state.orchestrator().orchestrate(&request).await {
        Ok(result) => {
            info!(
                summary = %result.summary(),
                duration_ms = started.elapsed().as_millis() as u64,
                "Orchestrate request completed"
            );
            (StatusCode::OK, Json(StudioResponse::from(result))).into_response()
        }
        Err(e) => {
            info!(reason = %e, "Orchestrate request rejected");
            (StatusCode::BAD_REQUEST, Json(MessageResponse::new(e.to_string()))).into_response()
        }
    }
}

/// Decode the body into a request, or a message for the 500 response
fn decode(body: &[u8]) -> Result<StudioRequest, String> {
    let value: Value = serde_json::from_slice(body).map_err(|e| e.to_string())?;
    value
        .as_object()
        .map(StudioRequest::from_object)
        .ok_or_else(|| "Request body must be a JSON object".to_owned())
}
