// ABOUTME: Axum router wiring the orchestration, catalog, and health endpoints
// ABOUTME: Guards everything except /health with the session middleware
//
// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 dravr.ai

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;

use crate::auth;
use crate::health;
use crate::models;
use crate::orchestrate;
use crate::providers;
use crate::state::SharedState;

/// Build the application router with all endpoints
///
/// Routes:
/// - `POST /orchestrate`: Fan one prompt out to every selection
/// - `POST /api/studio`: Same handler under the dashboard's path
/// - `GET /v1/providers`: Provider and model catalog
/// - `GET /v1/models`: Flattened `provider:model` options
/// - `GET /health`: Liveness probe, no session required
pub fn build(state: SharedState) -> Router {
    let guarded = Router::new()
        .route("/orchestrate", post(orchestrate::handle))
        .route("/api/studio", post(orchestrate::handle))
        .route("/v1/providers", get(providers::handle))
        .route("/v1/models", get(models::handle))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_session,
        ));

    guarded
        .route("/health", get(health::handle))
        .with_state(state)
}
