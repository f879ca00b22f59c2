// ABOUTME: OpenAI-compatible chat completions client used for OpenAI and xAI
// ABOUTME: Sends system + user messages with bearer auth and reads text and token usage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::http::HttpClientBase;
use crate::types::{Generation, PlaygroundError, TokenUsage};

const CHAT_COMPLETIONS_PATH: &str = "chat/completions";

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(rename = "prompt_tokens")]
    prompt: Option<u32>,
    #[serde(rename = "completion_tokens")]
    completion: Option<u32>,
    #[serde(rename = "total_tokens")]
    total: Option<u32>,
}

fn build_request<'a>(
    model: &'a str,
    system: &'a str,
    prompt: &'a str,
) -> ChatCompletionRequest<'a> {
    let mut messages = Vec::with_capacity(2);
    if !system.is_empty() {
        messages.push(ChatMessage {
            role: "system",
            content: system,
        });
    }
    messages.push(ChatMessage {
        role: "user",
        content: prompt,
    });
    ChatCompletionRequest { model, messages }
}

/// Run one chat completion
pub async fn generate(
    base: &HttpClientBase,
    model: &str,
    system: &str,
    prompt: &str,
) -> Result<Generation, PlaygroundError> {
    let url = base.build_url(CHAT_COMPLETIONS_PATH);
    let authorization = format!("Bearer {}", base.api_key);
    let payload = build_request(model, system, prompt);

    debug!(provider = %base.provider, model, "Sending chat completion");
    let response: ChatCompletionResponse = base
        .post_json(&url, &[("authorization", authorization.as_str())], &payload)
        .await?;

    let text = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .ok_or_else(|| {
            PlaygroundError::external_service(
                base.provider.as_str(),
                "response had no message content",
            )
        })?;

    let usage = response.usage.map(|u| TokenUsage {
        input_tokens: u.prompt,
        output_tokens: u.completion,
        total_tokens: u.total,
    });

    Ok(Generation { text, usage })
}
