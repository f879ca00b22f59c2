// ABOUTME: GET /v1/models handler listing every catalog model as a selectable option
// ABOUTME: Each option's value is the "provider:model" string accepted by /orchestrate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use playground::registry::{model_options, ModelOption};
use serde::Serialize;

/// Model option list body
#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelOption>,
}

/// Handle GET /v1/models
pub async fn handle() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ModelsResponse {
            models: model_options(),
        }),
    )
}
