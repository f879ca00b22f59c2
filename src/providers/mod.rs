// ABOUTME: reqwest-backed ProviderFactory implementations for OpenAI, Anthropic, xAI, and Gemini
// ABOUTME: Builds the default factory table used by the server from a ClientConfig
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

mod anthropic;
mod gemini;
mod http;
mod openai;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;

use self::http::HttpClientBase;
use crate::config::ClientConfig;
use crate::dispatch::ProviderFactories;
use crate::types::{
    Generation, LanguageModel, PlaygroundError, ProviderClient, ProviderFactory, ProviderId,
    ALL_PROVIDERS,
};

/// Factory producing HTTP clients for one provider's public API
#[derive(Clone)]
pub struct HttpProviderFactory {
    provider: ProviderId,
    base_url: String,
    anthropic_max_tokens: u32,
    http: Client,
}

impl HttpProviderFactory {
    /// Create a factory sharing the given reqwest client
    pub fn new(provider: ProviderId, config: &ClientConfig, http: Client) -> Self {
        Self {
            provider,
            base_url: config.base_url(provider).to_owned(),
            anthropic_max_tokens: config.anthropic_max_tokens,
            http,
        }
    }
}

impl ProviderFactory for HttpProviderFactory {
    fn create_client(&self, api_key: &str) -> Result<Box<dyn ProviderClient>, PlaygroundError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(PlaygroundError::auth_failure(format!(
                "Missing API key for {}",
                self.provider
            )));
        }
        Ok(Box::new(HttpProviderClient {
            base: HttpClientBase::new(self.provider, &self.base_url, api_key, self.http.clone()),
            anthropic_max_tokens: self.anthropic_max_tokens,
        }))
    }
}

/// Client bound to one provider credential
struct HttpProviderClient {
    base: HttpClientBase,
    anthropic_max_tokens: u32,
}

impl ProviderClient for HttpProviderClient {
    fn language_model(&self, model_id: &str) -> Result<Box<dyn LanguageModel>, PlaygroundError> {
        if model_id.trim().is_empty() {
            return Err(PlaygroundError::config(format!(
                "Model id must not be empty for {}",
                self.base.provider
            )));
        }
        Ok(Box::new(HttpLanguageModel {
            base: self.base.clone(),
            model_id: model_id.to_owned(),
            anthropic_max_tokens: self.anthropic_max_tokens,
        }))
    }
}

struct HttpLanguageModel {
    base: HttpClientBase,
    model_id: String,
    anthropic_max_tokens: u32,
}

#[async_trait]
impl LanguageModel for HttpLanguageModel {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn generate(&self, system: &str, prompt: &str) -> Result<Generation, PlaygroundError> {
        match self.base.provider {
            ProviderId::OpenAi | ProviderId::Xai => {
                openai::generate(&self.base, &self.model_id, system, prompt).await
            }
            ProviderId::Anthropic => {
                anthropic::generate(
                    &self.base,
                    &self.model_id,
                    self.anthropic_max_tokens,
                    system,
                    prompt,
                )
                .await
            }
            ProviderId::Gemini => {
                gemini::generate(&self.base, &self.model_id, system, prompt).await
            }
        }
    }
}

/// Build a reqwest client honoring the configured timeout
pub fn build_http_client(config: &ClientConfig) -> Result<Client, PlaygroundError> {
    Client::builder()
        .timeout(config.timeout)
        .build()
        .map_err(|e| PlaygroundError::internal(format!("Failed to build HTTP client: {e}")))
}

/// Factory table with an HTTP factory for every provider
pub fn default_factories(config: &ClientConfig) -> Result<ProviderFactories, PlaygroundError> {
    let http = build_http_client(config)?;
    let mut factories = ProviderFactories::new();
    for &provider in ALL_PROVIDERS {
        factories.insert(
            provider,
            Arc::new(HttpProviderFactory::new(provider, config, http.clone())),
        );
    }
    Ok(factories)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::{ErrorKind, TokenUsage};

    async fn model_for(
        provider: ProviderId,
        server: &mockito::ServerGuard,
        api_key: &str,
        model_id: &str,
    ) -> Box<dyn LanguageModel> {
        let config = ClientConfig::default().with_base_url(provider, server.url());
        let factory = HttpProviderFactory::new(provider, &config, Client::new());
        factory
            .create_client(api_key)
            .expect("client")
            .language_model(model_id)
            .expect("model")
    }

    #[tokio::test]
    async fn openai_chat_completion() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(mockito::Matcher::PartialJson(json!({
                "model": "gpt-4.1-mini",
                "messages": [
                    { "role": "system", "content": "sys" },
                    { "role": "user", "content": "hi" }
                ]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "choices": [{ "message": { "role": "assistant", "content": "hello" } }],
                    "usage": { "prompt_tokens": 5, "completion_tokens": 1, "total_tokens": 6 }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let model = model_for(ProviderId::OpenAi, &server, "sk-test", "gpt-4.1-mini").await;
        let generation = model.generate("sys", "hi").await.expect("generate");

        assert_eq!(generation.text, "hello");
        assert_eq!(
            generation.usage,
            Some(TokenUsage {
                input_tokens: Some(5),
                output_tokens: Some(1),
                total_tokens: Some(6),
            })
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn xai_uses_openai_wire_format() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer xai-key")
            .with_status(200)
            .with_body(json!({ "choices": [{ "message": { "content": "grok" } }] }).to_string())
            .create_async()
            .await;

        let model = model_for(ProviderId::Xai, &server, "xai-key", "grok-3").await;
        let generation = model.generate("", "hi").await.expect("generate");

        assert_eq!(generation.text, "grok");
        assert_eq!(generation.usage, None);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn anthropic_messages() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/messages")
            .match_header("x-api-key", "sk-ant")
            .match_header("anthropic-version", "2023-06-01")
            .match_body(mockito::Matcher::PartialJson(json!({
                "model": "claude-3-5-sonnet-latest",
                "system": "sys",
                "max_tokens": 1024
            })))
            .with_status(200)
            .with_body(
                json!({
                    "content": [
                        { "type": "text", "text": "hel" },
                        { "type": "text", "text": "lo" }
                    ],
                    "usage": { "input_tokens": 4, "output_tokens": 2 }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let model = model_for(
            ProviderId::Anthropic,
            &server,
            "sk-ant",
            "claude-3-5-sonnet-latest",
        )
        .await;
        let generation = model.generate("sys", "hi").await.expect("generate");

        assert_eq!(generation.text, "hello");
        assert_eq!(generation.usage.and_then(|u| u.total_tokens), Some(6));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn gemini_generate_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.0-flash:generateContent")
            .match_header("x-goog-api-key", "g-key")
            .with_status(200)
            .with_body(
                json!({
                    "candidates": [
                        { "content": { "parts": [{ "text": "gem" }, { "text": "ini" }] } }
                    ],
                    "usageMetadata": {
                        "promptTokenCount": 3,
                        "candidatesTokenCount": 2,
                        "totalTokenCount": 5
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let model = model_for(ProviderId::Gemini, &server, "g-key", "gemini-2.0-flash").await;
        let generation = model.generate("sys", "hi").await.expect("generate");

        assert_eq!(generation.text, "gemini");
        assert_eq!(generation.usage.and_then(|u| u.total_tokens), Some(5));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn rejected_key_surfaces_as_auth_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_body(r#"{"error":{"message":"Incorrect API key provided"}}"#)
            .create_async()
            .await;

        let model = model_for(ProviderId::OpenAi, &server, "sk-bad", "gpt-4.1").await;
        let err = model.generate("", "hi").await.expect_err("should fail");

        assert_eq!(err.kind, ErrorKind::AuthFailure);
        assert!(err.message.contains("Incorrect API key"));
    }

    #[tokio::test]
    async fn missing_content_is_external_service_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(json!({ "choices": [] }).to_string())
            .create_async()
            .await;

        let model = model_for(ProviderId::OpenAi, &server, "sk", "gpt-4.1").await;
        let err = model.generate("", "hi").await.expect_err("should fail");

        assert_eq!(err.kind, ErrorKind::ExternalService);
    }

    #[test]
    fn blank_key_and_empty_model_are_rejected() {
        let factory =
            HttpProviderFactory::new(ProviderId::OpenAi, &ClientConfig::default(), Client::new());
        let err = factory.create_client("  ").err().expect("blank key");
        assert_eq!(err.kind, ErrorKind::AuthFailure);

        let client = factory.create_client("sk").expect("client");
        let err = client.language_model("").err().expect("empty model");
        assert_eq!(err.kind, ErrorKind::Config);
    }

    #[test]
    fn default_factories_cover_every_provider() {
        let factories = default_factories(&ClientConfig::default()).expect("factories");
        assert_eq!(factories.providers(), ALL_PROVIDERS);
    }
}
