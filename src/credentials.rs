// ABOUTME: Per-request provider credentials and the gate reporting which providers lack one
// ABOUTME: A credential is usable iff it is non-empty after trimming whitespace
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;
use tracing::debug;

use crate::types::{ProviderId, Selection};

/// Provider credentials supplied with a single request, never persisted
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CredentialSet {
    keys: HashMap<ProviderId, String>,
}

impl CredentialSet {
    /// Create an empty credential set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the credential for a provider
    pub fn insert(&mut self, provider: ProviderId, key: impl Into<String>) {
        self.keys.insert(provider, key.into());
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with(mut self, provider: ProviderId, key: impl Into<String>) -> Self {
        self.insert(provider, key);
        self
    }

    /// Build from a loosely-typed `{providerId: key}` JSON object
    ///
    /// Entries keyed by an unknown provider, or whose value is not a string,
    /// are ignored. Anything other than an object yields an empty set.
    pub fn from_json(raw: &Value) -> Self {
        let Value::Object(map) = raw else {
            return Self::new();
        };

        let mut credentials = Self::new();
        for (provider, value) in map {
            if let (Some(provider), Some(key)) = (ProviderId::parse(provider), value.as_str()) {
                credentials.insert(provider, key);
            } else {
                debug!(provider = %provider, "Ignoring unusable credential entry");
            }
        }
        credentials
    }

    /// Raw credential as supplied
    pub fn get(&self, provider: ProviderId) -> Option<&str> {
        self.keys.get(&provider).map(String::as_str)
    }

    /// Trimmed credential, or `None` when absent or blank
    pub fn usable(&self, provider: ProviderId) -> Option<&str> {
        self.get(provider).map(str::trim).filter(|k| !k.is_empty())
    }

    /// Number of stored entries, usable or not
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no entries are stored
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl FromIterator<(ProviderId, String)> for CredentialSet {
    fn from_iter<I: IntoIterator<Item = (ProviderId, String)>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

impl fmt::Debug for CredentialSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut providers: Vec<_> = self.keys.keys().collect();
        providers.sort();
        f.debug_struct("CredentialSet")
            .field("providers", &providers)
            .finish_non_exhaustive()
    }
}

/// Distinct providers referenced by `selections` that lack a usable credential
///
/// Providers appear once each, in order of first reference. Credentials for
/// providers not referenced by any selection are irrelevant.
pub fn missing_credentials(
    selections: &[Selection],
    credentials: &CredentialSet,
) -> Vec<ProviderId> {
    let mut missing = Vec::new();
    for selection in selections {
        let provider = selection.provider_id;
        if credentials.usable(provider).is_none() && !missing.contains(&provider) {
            missing.push(provider);
        }
    }
    missing
}
