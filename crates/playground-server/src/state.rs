// ABOUTME: Shared server state holding the orchestrator and the session collaborator
// ABOUTME: Built once at startup and handed to every handler through axum state
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use std::sync::Arc;

use playground::Orchestrator;

use crate::auth::SessionProvider;

/// Shared server state handle
pub type SharedState = Arc<ServerState>;

/// Immutable per-process state; requests carry their own credentials
pub struct ServerState {
    orchestrator: Orchestrator,
    sessions: Arc<dyn SessionProvider>,
}

impl ServerState {
    /// Create server state
    pub fn new(orchestrator: Orchestrator, sessions: Arc<dyn SessionProvider>) -> Self {
        Self {
            orchestrator,
            sessions,
        }
    }

    /// Orchestrator validating and fanning out requests
    pub const fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    /// Session collaborator used by the auth middleware
    pub fn sessions(&self) -> &dyn SessionProvider {
        self.sessions.as_ref()
    }
}
