// ABOUTME: Core types for the provider fan-out: provider ids, selections, errors, model traits
// ABOUTME: Provides the ProviderFactory → ProviderClient → LanguageModel capability chain
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

//! # Core Types
//!
//! Self-contained type definitions shared by every stage of an orchestration:
//! the closed [`ProviderId`] set, [`Selection`] pairs, token usage, the error
//! types, and the injectable provider capability traits.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ============================================================================
// Error Type
// ============================================================================

/// Error type for provider calls and configuration
#[derive(Debug, Clone)]
pub struct PlaygroundError {
    /// Error category
    pub kind: ErrorKind,
    /// Human-readable error message
    pub message: String,
}

/// Categories of errors produced while talking to providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Internal error (bug, unexpected state, task failure)
    Internal,
    /// External service error (provider API failure, bad response)
    ExternalService,
    /// Credential rejected or unusable
    AuthFailure,
    /// Configuration error
    Config,
    /// No client factory is configured for the provider
    UnsupportedProvider,
}

impl PlaygroundError {
    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Internal,
            message: message.into(),
        }
    }

    /// Create an external service error
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::ExternalService,
            message: format!("{}: {}", service.into(), message.into()),
        }
    }

    /// Create an auth failure error
    pub fn auth_failure(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::AuthFailure,
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Config,
            message: message.into(),
        }
    }

    /// Create an unsupported-provider error
    pub fn unsupported_provider(provider: ProviderId) -> Self {
        Self {
            kind: ErrorKind::UnsupportedProvider,
            message: format!("No client configured for provider: {provider}"),
        }
    }
}

impl fmt::Display for PlaygroundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for PlaygroundError {}

/// Batch-level rejection raised before any provider call is made
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Nothing usable remained after parsing the selections
    #[error("No model selections provided.")]
    NoSelections,
    /// Selections named providers outside the registry
    #[error("Unsupported providers: {}", .0.join(", "))]
    UnsupportedProviders(Vec<String>),
    /// Referenced providers have no usable credential
    #[error("Missing API keys for: {}", join_ids(.0))]
    MissingCredentials(Vec<ProviderId>),
}

fn join_ids(ids: &[ProviderId]) -> String {
    ids.iter()
        .map(ProviderId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// Provider Identity
// ============================================================================

/// Closed set of supported model providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    /// `OpenAI` (`openai`)
    OpenAi,
    /// Anthropic (`anthropic`)
    Anthropic,
    /// xAI (`xai`)
    Xai,
    /// Google Gemini (`gemini`)
    Gemini,
}

/// Every provider, in catalog order
pub const ALL_PROVIDERS: &[ProviderId] = &[
    ProviderId::OpenAi,
    ProviderId::Anthropic,
    ProviderId::Xai,
    ProviderId::Gemini,
];

impl ProviderId {
    /// Wire identifier used in selections and credential maps
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Xai => "xai",
            Self::Gemini => "gemini",
        }
    }

    /// Parse a wire identifier (exact, case-sensitive match)
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        ALL_PROVIDERS.iter().copied().find(|p| p.as_str() == value)
    }

    /// Public API base URL used when no override is configured
    #[must_use]
    pub const fn default_base_url(&self) -> &'static str {
        match self {
            Self::OpenAi => "https://api.openai.com/v1",
            Self::Anthropic => "https://api.anthropic.com/v1",
            Self::Xai => "https://api.x.ai/v1",
            Self::Gemini => "https://generativelanguage.googleapis.com/v1beta",
        }
    }

    /// Environment variable that can override the API base URL
    #[must_use]
    pub const fn base_url_env_key(&self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_BASE_URL",
            Self::Anthropic => "ANTHROPIC_BASE_URL",
            Self::Xai => "XAI_BASE_URL",
            Self::Gemini => "GEMINI_BASE_URL",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comma-separated list of valid provider identifiers
pub fn valid_provider_names() -> String {
    join_ids(ALL_PROVIDERS)
}

// ============================================================================
// Selection & Generation Types
// ============================================================================

/// One requested (provider, model) pair
///
/// Duplicates are legal: each occurrence is dispatched on its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    /// Provider to call
    pub provider_id: ProviderId,
    /// Provider-specific model identifier, passed through verbatim
    pub model_id: String,
}

impl Selection {
    /// Create a new selection
    #[must_use]
    pub fn new(provider_id: ProviderId, model_id: impl Into<String>) -> Self {
        Self {
            provider_id,
            model_id: model_id.into(),
        }
    }
}

/// Token usage reported by a provider; every field is optional
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    /// Tokens in the prompt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_tokens: Option<u32>,
    /// Tokens in the completion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_tokens: Option<u32>,
    /// Total tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<u32>,
}

impl TokenUsage {
    /// Build usage from input/output counts, deriving the total when both are known
    #[must_use]
    pub fn from_counts(input_tokens: Option<u32>, output_tokens: Option<u32>) -> Self {
        let total_tokens = match (input_tokens, output_tokens) {
            (Some(i), Some(o)) => Some(i.saturating_add(o)),
            _ => None,
        };
        Self {
            input_tokens,
            output_tokens,
            total_tokens,
        }
    }
}

/// Result of one successful text generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    /// Generated text
    pub text: String,
    /// Token usage, when the provider reports it
    pub usage: Option<TokenUsage>,
}

// ============================================================================
// Provider Capability Traits
// ============================================================================

/// A resolved model handle able to generate text
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Model identifier this handle targets
    fn model_id(&self) -> &str;

    /// Generate a completion for a system/user prompt pair
    async fn generate(&self, system: &str, prompt: &str) -> Result<Generation, PlaygroundError>;
}

/// A provider client bound to one credential
pub trait ProviderClient: Send + Sync {
    /// Resolve a model handle by id
    fn language_model(&self, model_id: &str) -> Result<Box<dyn LanguageModel>, PlaygroundError>;
}

/// Builds provider clients from a caller-supplied credential
///
/// Implement this to plug a provider (or a test fake) into the dispatcher.
pub trait ProviderFactory: Send + Sync {
    /// Create a client for the given trimmed API key
    fn create_client(&self, api_key: &str) -> Result<Box<dyn ProviderClient>, PlaygroundError>;
}
