// ABOUTME: Orchestration entry point validating a batch before fanning it out
// ABOUTME: Rejects empty, unsupported, or uncredentialed batches with no provider call made
//
// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 dravr.ai

use serde_json::Value;
use tracing::info;

use crate::aggregate::{aggregate, OrchestrationResult};
use crate::credentials::{missing_credentials, CredentialSet};
use crate::dispatch::Dispatcher;
use crate::selection::{parse_selections, ParsedSelections};
use crate::types::ValidationError;

/// One orchestration call's inputs
#[derive(Debug, Clone, Default)]
pub struct OrchestrationRequest {
    /// System prompt shared by every selection
    pub system_prompt: String,
    /// User prompt shared by every selection
    pub user_prompt: String,
    /// Parsed selections plus any unknown providers they named
    pub selections: ParsedSelections,
    /// Per-request provider credentials
    pub credentials: CredentialSet,
}

impl OrchestrationRequest {
    /// Build a request from raw selection values and a raw credential object
    pub fn from_raw(
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
        raw_selections: &[Value],
        raw_credentials: &Value,
    ) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
            selections: parse_selections(raw_selections),
            credentials: CredentialSet::from_json(raw_credentials),
        }
    }
}

/// Validates and executes orchestration requests
#[derive(Debug, Clone)]
pub struct Orchestrator {
    dispatcher: Dispatcher,
}

impl Orchestrator {
    /// Create an orchestrator around a dispatcher
    pub const fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Underlying dispatcher
    pub const fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Batch-level checks, in order: unknown providers, empty batch, missing keys
    ///
    /// A batch made only of unknown providers reports them by name rather
    /// than as an empty batch.
    pub fn validate(request: &OrchestrationRequest) -> Result<(), ValidationError> {
        let parsed = &request.selections;
        if !parsed.unsupported.is_empty() {
            return Err(ValidationError::UnsupportedProviders(
                parsed.unsupported.clone(),
            ));
        }
        if parsed.selections.is_empty() {
            return Err(ValidationError::NoSelections);
        }
        let missing = missing_credentials(&parsed.selections, &request.credentials);
        if !missing.is_empty() {
            return Err(ValidationError::MissingCredentials(missing));
        }
        Ok(())
    }

    /// Validate, then dispatch every selection and aggregate the results
    pub async fn orchestrate(
        &self,
        request: &OrchestrationRequest,
    ) -> Result<OrchestrationResult, ValidationError> {
        Self::validate(request)?;

        let selections = &request.selections.selections;
        info!(selections = selections.len(), "Starting orchestration");

        let items = self
            .dispatcher
            .dispatch(
                &request.system_prompt,
                &request.user_prompt,
                selections,
                &request.credentials,
            )
            .await;
        let result = aggregate(items);

        info!(summary = %result.summary(), "Orchestration finished");
        Ok(result)
    }
}
