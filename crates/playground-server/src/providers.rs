// ABOUTME: GET /v1/providers handler exposing the static provider and model catalog
// ABOUTME: Lets a client render credential prompts and model pickers per provider
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use playground::registry::{list_providers, ProviderDescriptor};
use serde::Serialize;

/// Catalog body
#[derive(Debug, Serialize)]
pub struct ProvidersResponse {
    /// Providers in catalog order
    pub providers: &'static [ProviderDescriptor],
}

/// Handle GET /v1/providers
pub async fn handle() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ProvidersResponse {
            providers: list_providers(),
        }),
    )
}
