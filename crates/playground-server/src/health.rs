// ABOUTME: GET /health handler reporting liveness and the number of configured providers
// ABOUTME: Public route; never calls a provider
//
// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 dravr.ai

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::state::SharedState;

/// Health probe body
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process serves requests
    pub status: &'static str,
    /// Providers with a client factory
    pub providers: usize,
}

/// Handle GET /health
pub async fn handle(State(state): State<SharedState>) -> impl IntoResponse {
    let providers = state
        .orchestrator()
        .dispatcher()
        .supported_providers()
        .len();
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            providers,
        }),
    )
}
