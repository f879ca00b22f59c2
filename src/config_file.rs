// ABOUTME: Optional TOML configuration file for the playground server and provider clients
// ABOUTME: Loads playground.toml from the user config dir or an explicit path and overlays defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use std::collections::BTreeMap;
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::{ClientConfig, DispatchConfig};
use crate::types::{PlaygroundError, ProviderId};

/// File name looked up inside the user config directory
pub const CONFIG_FILE_NAME: &str = "playground.toml";

/// Parsed `playground.toml`
///
/// ```toml
/// [server]
/// host = "0.0.0.0"
/// port = 8080
///
/// [dispatch]
/// max_concurrency = 4
///
/// [client]
/// timeout_secs = 60
///
/// [providers.openai]
/// base_url = "http://localhost:8081/v1"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Listener settings
    pub server: ServerSection,
    /// Fan-out settings
    pub dispatch: DispatchSection,
    /// Provider HTTP client settings
    pub client: ClientSection,
    /// Per-provider overrides keyed by provider id
    pub providers: BTreeMap<String, ProviderSection>,
}

/// `[server]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Accepted bearer tokens; empty leaves the server open
    pub session_tokens: Vec<String>,
}

/// `[dispatch]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchSection {
    /// `0` disables the cap
    pub max_concurrency: Option<usize>,
}

/// `[client]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientSection {
    pub timeout_secs: Option<u64>,
    pub anthropic_max_tokens: Option<u32>,
}

/// `[providers.<id>]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderSection {
    pub base_url: Option<String>,
}

impl FileConfig {
    /// Parse a config file at an explicit path
    pub fn load(path: &Path) -> Result<Self, PlaygroundError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            PlaygroundError::config(format!("Failed to read {}: {e}", path.display()))
        })?;
        let config = Self::parse(&raw).map_err(|e| {
            PlaygroundError::config(format!("{}: {}", path.display(), e.message))
        })?;
        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Parse config text
    pub fn parse(raw: &str) -> Result<Self, PlaygroundError> {
        toml::from_str(raw).map_err(|e| PlaygroundError::config(format!("Invalid TOML: {e}")))
    }

    /// Load the default file if it exists
    ///
    /// A missing file or config dir is not an error.
    pub fn load_default() -> Result<Option<Self>, PlaygroundError> {
        match default_path() {
            Some(path) if path.is_file() => Self::load(&path).map(Some),
            _ => Ok(None),
        }
    }

    /// Overlay file values on a client configuration
    pub fn apply_client(&self, mut config: ClientConfig) -> ClientConfig {
        if let Some(secs) = self.client.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(max_tokens) = self.client.anthropic_max_tokens {
            config = config.with_anthropic_max_tokens(max_tokens);
        }
        for (name, section) in &self.providers {
            let Some(provider) = ProviderId::parse(name) else {
                warn!(provider = %name, "Ignoring config for unknown provider");
                continue;
            };
            if let Some(url) = section.base_url.as_deref().map(str::trim) {
                if !url.is_empty() {
                    config = config.with_base_url(provider, url);
                }
            }
        }
        config
    }

    /// Overlay file values on a dispatch configuration
    pub fn apply_dispatch(&self, config: DispatchConfig) -> DispatchConfig {
        let limit = self.dispatch.max_concurrency;
        limit.map_or(config, |n| DispatchConfig {
            max_concurrency: NonZeroUsize::new(n),
        })
    }
}

/// `<config dir>/playground/playground.toml`
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("playground").join(CONFIG_FILE_NAME))
}
