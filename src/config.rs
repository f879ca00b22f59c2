// ABOUTME: Configuration for provider HTTP clients and the fan-out dispatcher
// ABOUTME: Defines base URL overrides, client timeout, and the explicit concurrency limit
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use std::collections::HashMap;
use std::env;
use std::num::{NonZeroUsize, ParseIntError};
use std::time::Duration;

use tracing::debug;

use crate::types::{ProviderId, ALL_PROVIDERS};

/// Default timeout for a single provider HTTP call (120 seconds)
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default `max_tokens` sent to Anthropic, which requires the field
const DEFAULT_ANTHROPIC_MAX_TOKENS: u32 = 1024;

/// Configuration shared by the HTTP provider clients
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL overrides keyed by provider
    base_urls: HashMap<ProviderId, String>,
    /// Per-call HTTP timeout enforced by the client, not the orchestrator
    pub timeout: Duration,
    /// `max_tokens` for Anthropic requests
    pub anthropic_max_tokens: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_urls: HashMap::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            anthropic_max_tokens: DEFAULT_ANTHROPIC_MAX_TOKENS,
        }
    }
}

impl ClientConfig {
    /// Defaults plus any `*_BASE_URL` environment overrides
    pub fn from_env() -> Self {
        let mut config = Self::default();
        for &provider in ALL_PROVIDERS {
            let key = provider.base_url_env_key();
            if let Ok(url) = env::var(key) {
                if !url.trim().is_empty() {
                    debug!(provider = %provider, env_key = key, "Using base URL override");
                    config.base_urls.insert(provider, url.trim().to_owned());
                }
            }
        }
        config
    }

    /// API base URL for a provider, without a trailing slash
    pub fn base_url(&self, provider: ProviderId) -> &str {
        self.base_urls
            .get(&provider)
            .map_or_else(|| provider.default_base_url(), String::as_str)
            .trim_end_matches('/')
    }

    /// Override the base URL for a provider
    pub fn with_base_url(mut self, provider: ProviderId, url: impl Into<String>) -> Self {
        self.base_urls.insert(provider, url.into());
        self
    }

    /// Set the per-call HTTP timeout
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the Anthropic `max_tokens`
    pub const fn with_anthropic_max_tokens(mut self, max_tokens: u32) -> Self {
        self.anthropic_max_tokens = max_tokens;
        self
    }
}

/// Fan-out behavior of the dispatcher
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Maximum in-flight provider calls per orchestration; `None` is unbounded
    pub max_concurrency: Option<NonZeroUsize>,
}

impl DispatchConfig {
    /// Every selection is issued at once
    pub const fn unbounded() -> Self {
        Self {
            max_concurrency: None,
        }
    }

    /// Cap the number of in-flight provider calls
    pub const fn with_max_concurrency(mut self, limit: NonZeroUsize) -> Self {
        self.max_concurrency = Some(limit);
        self
    }
}

/// Parse a concurrency limit; `0` or `unbounded` disable the cap
///
/// # Errors
///
/// Returns an error if the string is neither `unbounded` nor a `usize`.
pub fn parse_max_concurrency(input: &str) -> Result<Option<NonZeroUsize>, ParseIntError> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("unbounded") {
        return Ok(None);
    }
    input.parse::<usize>().map(NonZeroUsize::new)
}

/// Parse a timeout value from a string (in seconds)
///
/// # Errors
///
/// Returns an error if the string cannot be parsed as a `u64`.
pub fn parse_timeout(input: &str) -> Result<Duration, ParseIntError> {
    input.trim().parse::<u64>().map(Duration::from_secs)
}
