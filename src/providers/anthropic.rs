// ABOUTME: Anthropic Messages API client
// ABOUTME: Sends a top-level system prompt with x-api-key auth and joins returned text blocks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::http::HttpClientBase;
use crate::types::{Generation, PlaygroundError, TokenUsage};

const MESSAGES_PATH: &str = "messages";

/// API version header value
const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: [UserMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct UserMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: Option<u32>,
    output_tokens: Option<u32>,
}

fn build_request<'a>(
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    prompt: &'a str,
) -> MessagesRequest<'a> {
    MessagesRequest {
        model,
        max_tokens,
        system: (!system.is_empty()).then_some(system),
        messages: [UserMessage {
            role: "user",
            content: prompt,
        }],
    }
}

/// Run one Messages API call
pub async fn generate(
    base: &HttpClientBase,
    model: &str,
    max_tokens: u32,
    system: &str,
    prompt: &str,
) -> Result<Generation, PlaygroundError> {
    let url = base.build_url(MESSAGES_PATH);
    let payload = build_request(model, max_tokens, system, prompt);

    debug!(provider = %base.provider, model, "Sending messages request");
    let response: MessagesResponse = base
        .post_json(
            &url,
            &[
                ("x-api-key", base.api_key.as_str()),
                ("anthropic-version", ANTHROPIC_VERSION),
            ],
            &payload,
        )
        .await?;

    let texts: Vec<String> = response
        .content
        .into_iter()
        .filter(|block| block.kind == "text")
        .filter_map(|block| block.text)
        .collect();
    if texts.is_empty() {
        return Err(PlaygroundError::external_service(
            base.provider.as_str(),
            "response had no text content",
        ));
    }

    let usage = response
        .usage
        .map(|u| TokenUsage::from_counts(u.input_tokens, u.output_tokens));

    Ok(Generation {
        text: texts.concat(),
        usage,
    })
}
