// ABOUTME: Request and response envelopes for the orchestrate endpoint
// ABOUTME: Extracts prompts, selections, and provider keys leniently from a raw JSON body
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use playground::types::TokenUsage;
use playground::{OrchestrationRequest, OrchestrationResult, ProviderId};
use serde::Serialize;
use serde_json::{Map, Value};

// ============================================================================
// Request Types
// ============================================================================

/// Body of `POST /orchestrate`
///
/// Every field is optional on the wire. Prompts default to an empty string,
/// a non-array `selections` counts as no selections, and a non-object
/// `providerKeys` counts as no keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudioRequest {
    /// System prompt shared by every selection
    pub system_prompt: String,
    /// User prompt shared by every selection
    pub user_prompt: String,
    /// Raw selection values, string or object form
    pub selections: Vec<Value>,
    /// Raw `providerKeys` object
    pub provider_keys: Value,
}

impl StudioRequest {
    /// Read the request fields out of a decoded JSON object
    pub fn from_object(body: &Map<String, Value>) -> Self {
        Self {
            system_prompt: prompt_text(body.get("systemPrompt")),
            user_prompt: prompt_text(body.get("userPrompt")),
            selections: body
                .get("selections")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
            provider_keys: body.get("providerKeys").cloned().unwrap_or(Value::Null),
        }
    }

    /// Convert into the orchestrator's request type
    pub fn into_orchestration(self) -> OrchestrationRequest {
        OrchestrationRequest::from_raw(
            self.system_prompt,
            self.user_prompt,
            &self.selections,
            &self.provider_keys,
        )
    }
}

/// Scalars are stringified, anything else is treated as absent
fn prompt_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

// ============================================================================
// Response Types
// ============================================================================

/// Successful orchestration response
#[derive(Debug, Serialize)]
pub struct StudioResponse {
    /// One entry per selection, in request order
    pub results: Vec<StudioResultItem>,
}

/// One selection's result
///
/// `output` holds the generated text or a `Request failed: ...` message.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudioResultItem {
    pub provider_id: ProviderId,
    pub model_id: String,
    pub output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

impl From<OrchestrationResult> for StudioResponse {
    fn from(result: OrchestrationResult) -> Self {
        let results = result
            .into_items()
            .into_iter()
            .map(|item| StudioResultItem {
                output: item.outcome.legacy_output(),
                usage: item.outcome.usage(),
                provider_id: item.selection.provider_id,
                model_id: item.selection.model_id,
            })
            .collect();
        Self { results }
    }
}

/// `{ "message": ... }` body used for every error status
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable reason
    pub message: String,
}

impl MessageResponse {
    /// Build a message body
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use playground::dispatch::{Outcome, ResultItem};
    use playground::types::ErrorKind;
    use playground::Selection;
    use serde_json::json;

    use super::*;

    fn object(value: &Value) -> &Map<String, Value> {
        value.as_object().expect("object")
    }

    #[test]
    fn missing_fields_default() {
        let req = StudioRequest::from_object(object(&json!({})));
        assert_eq!(req, StudioRequest::default());
    }

    #[test]
    fn prompts_are_stringified_or_defaulted() {
        let body = json!({ "systemPrompt": null, "userPrompt": 42 });
        let req = StudioRequest::from_object(object(&body));
        assert_eq!(req.system_prompt, "");
        assert_eq!(req.user_prompt, "42");

        let body = json!({ "systemPrompt": ["x"], "userPrompt": "hi" });
        let req = StudioRequest::from_object(object(&body));
        assert_eq!(req.system_prompt, "");
        assert_eq!(req.user_prompt, "hi");
    }

    #[test]
    fn non_array_selections_are_empty() {
        let body = json!({ "selections": "openai:gpt-4.1" });
        assert!(StudioRequest::from_object(object(&body)).selections.is_empty());
    }

    #[test]
    fn response_uses_legacy_output_and_camel_case() {
        let result = playground::aggregate::aggregate(vec![
            ResultItem {
                selection: Selection::new(ProviderId::OpenAi, "gpt-4.1-mini"),
                outcome: Outcome::Generated {
                    text: "pong".to_owned(),
                    usage: Some(TokenUsage::from_counts(Some(3), Some(1))),
                },
                duration_ms: 10,
            },
            ResultItem {
                selection: Selection::new(ProviderId::Xai, "grok-3"),
                outcome: Outcome::Failed {
                    kind: ErrorKind::ExternalService,
                    reason: "rate limited".to_owned(),
                },
                duration_ms: 12,
            },
        ]);

        let json = serde_json::to_value(StudioResponse::from(result)).expect("serialize");
        assert_eq!(
            json,
            json!({
                "results": [
                    {
                        "providerId": "openai",
                        "modelId": "gpt-4.1-mini",
                        "output": "pong",
                        "usage": { "inputTokens": 3, "outputTokens": 1, "totalTokens": 4 }
                    },
                    {
                        "providerId": "xai",
                        "modelId": "grok-3",
                        "output": "Request failed: rate limited"
                    }
                ]
            })
        );
    }
}
