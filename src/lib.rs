// ABOUTME: Multi-provider prompt fan-out library for the AI Playground Studio
// ABOUTME: Re-exports the registry, selection parser, credential gate, dispatcher, and orchestrator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

//! # Playground: One Prompt, Many Models
//!
//! Sends one system/user prompt pair to several provider/model selections
//! at once and returns one result per selection, in input order. A provider
//! error stays confined to its own result; batch-level problems (no usable
//! selections, unknown providers, missing API keys) are rejected before any
//! provider is called.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use playground::{default_factories, ClientConfig, DispatchConfig, Dispatcher, Orchestrator};
//! use playground::OrchestrationRequest;
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let factories = default_factories(&ClientConfig::from_env())?;
//! let orchestrator = Orchestrator::new(Dispatcher::new(factories, DispatchConfig::unbounded()));
//!
//! let request = OrchestrationRequest::from_raw(
//!     "Be terse.",
//!     "What is Rust?",
//!     &[json!("openai:gpt-4.1-mini"), json!("anthropic:claude-3-5-sonnet-latest")],
//!     &json!({ "openai": "sk-...", "anthropic": "sk-ant-..." }),
//! );
//! for item in orchestrator.orchestrate(&request).await?.items() {
//!     println!("{}: {}", item.selection.to_model_value(), item.outcome.legacy_output());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`types`]: Provider ids, selections, errors, and the provider capability traits
//! - [`registry`]: Static provider and model catalog
//! - [`selection`]: Parsing raw selection values
//! - [`credentials`]: Per-request API keys and the missing-key check
//! - [`dispatch`]: Concurrent fan-out with per-item failure isolation
//! - [`aggregate`]: Ordered results and summaries
//! - [`orchestrator`]: Validation followed by dispatch
//! - [`config`]: HTTP client and dispatcher configuration
//! - `providers`: reqwest clients for the public provider APIs (`http-providers`)
//! - `config_file`: `playground.toml` loading (`config-file`)

/// Core types: provider ids, selections, errors, and capability traits
pub mod types;

/// Batch aggregation and summaries
pub mod aggregate;
/// Client and dispatcher configuration
pub mod config;
/// Per-request credentials
pub mod credentials;
/// Concurrent fan-out dispatcher
pub mod dispatch;
/// Metric recording, no-op without the `otel` feature
mod metrics;
/// Orchestration facade
pub mod orchestrator;
/// Provider and model catalog
pub mod registry;
/// Selection parsing
pub mod selection;

/// TOML configuration file loading
#[cfg(feature = "config-file")]
pub mod config_file;

/// HTTP clients for the `OpenAI`, Anthropic, xAI, and Gemini APIs
#[cfg(feature = "http-providers")]
pub mod providers;

pub use aggregate::OrchestrationResult;
pub use config::{ClientConfig, DispatchConfig};
pub use credentials::CredentialSet;
pub use dispatch::{Dispatcher, Outcome, ProviderFactories, ResultItem};
pub use orchestrator::{OrchestrationRequest, Orchestrator};
pub use selection::ParsedSelections;
pub use types::{PlaygroundError, ProviderId, Selection, ValidationError};

#[cfg(feature = "config-file")]
pub use config_file::FileConfig;

#[cfg(feature = "http-providers")]
pub use providers::default_factories;
