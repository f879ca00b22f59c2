// ABOUTME: Google Gemini generateContent client
// ABOUTME: Sends systemInstruction plus one user turn with x-goog-api-key auth
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::http::HttpClientBase;
use crate::types::{Generation, PlaygroundError, TokenUsage};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UsageMetadata {
    #[serde(rename = "promptTokenCount")]
    prompt: Option<u32>,
    #[serde(rename = "candidatesTokenCount")]
    candidates: Option<u32>,
    #[serde(rename = "totalTokenCount")]
    total: Option<u32>,
}

fn build_request<'a>(system: &'a str, prompt: &'a str) -> GenerateContentRequest<'a> {
    GenerateContentRequest {
        contents: [Content {
            role: Some("user"),
            parts: [Part { text: prompt }],
        }],
        system_instruction: (!system.is_empty()).then_some(Content {
            role: None,
            parts: [Part { text: system }],
        }),
    }
}

/// Path for a model's generateContent call; accepts ids with or without `models/`
fn model_path(model: &str) -> String {
    let model = model.strip_prefix("models/").unwrap_or(model);
    format!("models/{model}:generateContent")
}

/// Run one generateContent call
pub async fn generate(
    base: &HttpClientBase,
    model: &str,
    system: &str,
    prompt: &str,
) -> Result<Generation, PlaygroundError> {
    let url = base.build_url(&model_path(model));
    let payload = build_request(system, prompt);

    debug!(provider = %base.provider, model, "Sending generateContent request");
    let response: GenerateContentResponse = base
        .post_json(&url, &[("x-goog-api-key", base.api_key.as_str())], &payload)
        .await?;

    let text: String = response
        .candidates
        .unwrap_or_default()
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if text.is_empty() {
        return Err(PlaygroundError::external_service(
            base.provider.as_str(),
            "response had no text candidates",
        ));
    }

    let usage = response.usage_metadata.map(|u| TokenUsage {
        input_tokens: u.prompt,
        output_tokens: u.candidates,
        total_tokens: u.total,
    });

    Ok(Generation { text, usage })
}
