// ABOUTME: Static catalog of supported providers, their display metadata, and their models
// ABOUTME: Single source of truth for provider identity, model lookup, and picker labels
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use serde::Serialize;

use crate::selection::make_model_value;
use crate::types::{ProviderId, Selection};

/// A model offered by a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDescriptor {
    /// Provider-specific model identifier
    pub id: &'static str,
    /// Human-readable label
    pub label: &'static str,
    /// Context window size in tokens, when published
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_window_tokens: Option<u32>,
}

/// Display metadata and model list for one provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDescriptor {
    /// Provider identifier
    pub id: ProviderId,
    /// Human-readable provider name
    pub display_name: &'static str,
    /// Label shown next to the credential input
    pub credential_label: &'static str,
    /// Where users obtain a credential
    pub credential_docs_url: &'static str,
    /// Models in display order
    pub models: &'static [ModelDescriptor],
}

const fn model(
    id: &'static str,
    label: &'static str,
    context_window_tokens: u32,
) -> ModelDescriptor {
    ModelDescriptor {
        id,
        label,
        context_window_tokens: Some(context_window_tokens),
    }
}

const OPENAI: ProviderDescriptor = ProviderDescriptor {
    id: ProviderId::OpenAi,
    display_name: "OpenAI",
    credential_label: "OpenAI API Key",
    credential_docs_url: "https://platform.openai.com/api-keys",
    models: &[
        model("gpt-4.1-mini", "GPT-4.1 Mini", 128_000),
        model("gpt-4.1", "GPT-4.1", 128_000),
        model("o4-mini", "o4 Mini", 200_000),
    ],
};

const ANTHROPIC: ProviderDescriptor = ProviderDescriptor {
    id: ProviderId::Anthropic,
    display_name: "Anthropic",
    credential_label: "Anthropic API Key",
    credential_docs_url: "https://console.anthropic.com/settings/keys",
    models: &[
        model("claude-3-5-sonnet-latest", "Claude 3.5 Sonnet", 200_000),
        model("claude-3-opus-latest", "Claude 3 Opus", 200_000),
        model("claude-3-haiku-20240307", "Claude 3 Haiku", 200_000),
    ],
};

const XAI: ProviderDescriptor = ProviderDescriptor {
    id: ProviderId::Xai,
    display_name: "xAI",
    credential_label: "xAI API Key",
    credential_docs_url: "https://console.x.ai/api-keys",
    models: &[
        model("grok-3", "Grok 3", 131_072),
        model("grok-3-mini", "Grok 3 Mini", 131_072),
    ],
};

const GEMINI: ProviderDescriptor = ProviderDescriptor {
    id: ProviderId::Gemini,
    display_name: "Google Gemini",
    credential_label: "Google AI Studio Key",
    credential_docs_url: "https://aistudio.google.com/app/apikey",
    models: &[
        model("gemini-2.0-flash", "Gemini 2.0 Flash", 1_048_576),
        model("gemini-2.0-pro", "Gemini 2.0 Pro", 2_097_152),
        model("gemini-1.5-flash", "Gemini 1.5 Flash", 1_048_576),
    ],
};

static PROVIDERS: [ProviderDescriptor; 4] = [OPENAI, ANTHROPIC, XAI, GEMINI];

/// All providers in catalog order
pub fn list_providers() -> &'static [ProviderDescriptor] {
    &PROVIDERS
}

/// Whether `id` names a provider in the catalog
pub fn is_known_provider(id: &str) -> bool {
    ProviderId::parse(id).is_some()
}

/// Descriptor for a provider
///
/// Exhaustive over [`ProviderId`], so every id has catalog metadata.
pub fn find_provider(provider: ProviderId) -> &'static ProviderDescriptor {
    match provider {
        ProviderId::OpenAi => &PROVIDERS[0],
        ProviderId::Anthropic => &PROVIDERS[1],
        ProviderId::Xai => &PROVIDERS[2],
        ProviderId::Gemini => &PROVIDERS[3],
    }
}

/// Look up a model in a provider's catalog
pub fn find_model(provider: ProviderId, model_id: &str) -> Option<&'static ModelDescriptor> {
    find_provider(provider)
        .models
        .iter()
        .find(|m| m.id == model_id)
}

/// Display names for a selection, falling back to the model id for uncatalogued models
pub fn describe_selection(selection: &Selection) -> (&'static str, String) {
    let provider = find_provider(selection.provider_id);
    let model_label = find_model(selection.provider_id, &selection.model_id)
        .map_or_else(|| selection.model_id.clone(), |m| m.label.to_owned());
    (provider.display_name, model_label)
}

/// One entry of the flattened model picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelOption {
    /// Canonical `provider:model` value
    pub value: String,
    /// `"<Provider> · <Model>"` label
    pub label: String,
}

/// Every catalogued model as a picker option
pub fn model_options() -> Vec<ModelOption> {
    list_providers()
        .iter()
        .flat_map(|provider| {
            provider.models.iter().map(move |m| ModelOption {
                value: make_model_value(provider.id, m.id),
                label: format!("{} · {}", provider.display_name, m.label),
            })
        })
        .collect()
}
