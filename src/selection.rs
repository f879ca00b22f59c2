// ABOUTME: Parses loosely-typed client selections into validated (provider, model) pairs
// ABOUTME: Accepts "provider:model" strings or {providerId, modelId} objects, drops the rest
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use serde_json::Value;

use crate::types::{ProviderId, Selection};

/// Separator between the provider and model segments of a model value
pub const MODEL_VALUE_SEPARATOR: char = ':';

/// Encode a selection as its canonical `provider:model` string
pub fn make_model_value(provider: ProviderId, model_id: &str) -> String {
    format!("{provider}{MODEL_VALUE_SEPARATOR}{model_id}")
}

impl Selection {
    /// Canonical `provider:model` string for this selection
    pub fn to_model_value(&self) -> String {
        make_model_value(self.provider_id, &self.model_id)
    }
}

/// What a single raw selection turned out to be
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    /// Well-formed and names a catalogued provider
    Known(Selection),
    /// Well-formed but names a provider outside the catalog
    UnknownProvider(String),
    /// Any other shape
    Invalid,
}

/// Classify one raw selection
///
/// Formats supported:
/// - `"openai:gpt-4.1-mini"` → (`OpenAi`, `"gpt-4.1-mini"`)
/// - `"gemini:models/x:latest"` → (`Gemini`, `"models/x:latest"`); everything
///   after the first separator is the model id, verbatim
/// - `{"providerId": "xai", "modelId": "grok-3"}` → (`Xai`, `"grok-3"`)
pub fn classify(raw: &Value) -> Candidate {
    match raw {
        Value::String(value) => classify_model_value(value),
        Value::Object(map) => {
            let (Some(Value::String(provider)), Some(Value::String(model))) =
                (map.get("providerId"), map.get("modelId"))
            else {
                return Candidate::Invalid;
            };
            resolve(provider, model)
        }
        _ => Candidate::Invalid,
    }
}

fn classify_model_value(value: &str) -> Candidate {
    match value.split_once(MODEL_VALUE_SEPARATOR) {
        Some((provider, model)) if !provider.is_empty() => resolve(provider, model),
        _ => Candidate::Invalid,
    }
}

fn resolve(provider: &str, model: &str) -> Candidate {
    ProviderId::parse(provider).map_or_else(
        || Candidate::UnknownProvider(provider.to_owned()),
        |provider_id| Candidate::Known(Selection::new(provider_id, model)),
    )
}

/// Parse one raw selection, returning `None` for anything not usable
pub fn parse_selection(raw: &Value) -> Option<Selection> {
    match classify(raw) {
        Candidate::Known(selection) => Some(selection),
        Candidate::UnknownProvider(_) | Candidate::Invalid => None,
    }
}

/// Parse a `provider:model` string
pub fn parse_model_value(value: &str) -> Option<Selection> {
    match classify_model_value(value) {
        Candidate::Known(selection) => Some(selection),
        Candidate::UnknownProvider(_) | Candidate::Invalid => None,
    }
}

/// Outcome of parsing a raw selection list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSelections {
    /// Usable selections, in input order, duplicates kept
    pub selections: Vec<Selection>,
    /// Distinct unknown provider ids, in order of first appearance
    pub unsupported: Vec<String>,
}

impl ParsedSelections {
    /// Wrap already-validated selections
    pub fn from_selections(selections: Vec<Selection>) -> Self {
        Self {
            selections,
            unsupported: Vec::new(),
        }
    }
}

/// Parse a raw list, silently dropping malformed entries
///
/// Unknown providers are collected rather than dropped so the caller can
/// reject the batch by name.
pub fn parse_selections(raw: &[Value]) -> ParsedSelections {
    let mut parsed = ParsedSelections::default();
    for candidate in raw.iter().map(classify) {
        match candidate {
            Candidate::Known(selection) => parsed.selections.push(selection),
            Candidate::UnknownProvider(provider) => {
                if !parsed.unsupported.contains(&provider) {
                    parsed.unsupported.push(provider);
                }
            }
            Candidate::Invalid => {}
        }
    }
    parsed
}
