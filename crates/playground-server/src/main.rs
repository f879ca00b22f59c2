// ABOUTME: CLI entry point for the playground REST API server binary
// ABOUTME: Layers defaults, environment, config file, and flags, then starts the axum server
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use playground::config::parse_max_concurrency;
use playground::types::PlaygroundError;
use playground::{
    default_factories, ClientConfig, DispatchConfig, Dispatcher, FileConfig, Orchestrator,
};

use playground_server::auth::{BearerSessions, OpenSessions, SessionProvider};
use playground_server::router;
use playground_server::state::ServerState;

/// playground-server: fan one prompt out to many LLM providers
#[derive(Parser)]
#[command(name = "playground-server", version, about)]
struct Cli {
    /// HTTP listen port [default: 3000]
    #[arg(long)]
    port: Option<u16>,

    /// HTTP listen host [default: 127.0.0.1]
    #[arg(long)]
    host: Option<String>,

    /// Path to playground.toml (defaults to the user config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum in-flight provider calls per request (`unbounded` or 0 for no cap)
    #[arg(long)]
    max_concurrency: Option<String>,

    /// Per-call provider HTTP timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let file = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::load_default()?.unwrap_or_default(),
    };

    let mut client_config = file.apply_client(ClientConfig::from_env());
    if let Some(secs) = cli.timeout_secs {
        client_config = client_config.with_timeout(Duration::from_secs(secs));
    }

    let mut dispatch_config = file.apply_dispatch(DispatchConfig::unbounded());
    if let Some(raw) = &cli.max_concurrency {
        dispatch_config.max_concurrency = parse_max_concurrency(raw).map_err(|e| {
            PlaygroundError::config(format!("Invalid --max-concurrency {raw}: {e}"))
        })?;
    }

    let sessions: Arc<dyn SessionProvider> = match BearerSessions::from_env() {
        Some(sessions) => Arc::new(sessions),
        None if !file.server.session_tokens.is_empty() => {
            Arc::new(BearerSessions::new(file.server.session_tokens.iter().cloned()))
        }
        None => {
            tracing::warn!("No session tokens configured; accepting every request");
            Arc::new(OpenSessions)
        }
    };

    let dispatcher = Dispatcher::new(default_factories(&client_config)?, dispatch_config);
    let state = Arc::new(ServerState::new(Orchestrator::new(dispatcher), sessions));
    let app = router::build(state);

    let host = cli
        .host
        .or(file.server.host)
        .unwrap_or_else(|| "127.0.0.1".to_owned());
    let port = cli.port.or(file.server.port).unwrap_or(3000);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| PlaygroundError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!(
        address = %addr,
        max_concurrency = ?dispatch_config.max_concurrency,
        timeout_secs = client_config.timeout.as_secs(),
        "Starting playground REST API server"
    );

    axum::serve(listener, app)
        .await
        .map_err(|e| PlaygroundError::internal(format!("Server error: {e}")))?;

    Ok(())
}
