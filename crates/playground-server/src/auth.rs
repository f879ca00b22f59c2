// ABOUTME: Session collaborator and middleware guarding the orchestration endpoints
// ABOUTME: Validates bearer tokens in constant time, or opens every request in development mode
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use std::env;

use async_trait::async_trait;
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::state::SharedState;
use crate::studio_types::MessageResponse;

/// Environment variable holding comma-separated session tokens
pub const SESSION_TOKENS_ENV: &str = "PLAYGROUND_SESSION_TOKENS";

/// Authenticated caller, attached to request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Stable label for the caller; never the token itself
    pub subject: String,
}

/// Resolves the caller's session from request headers
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// `None` means the request is unauthenticated
    async fn get_session(&self, headers: &HeaderMap) -> Option<Session>;
}

/// Accepts `Authorization: Bearer <token>` for a fixed set of tokens
pub struct BearerSessions {
    tokens: Vec<String>,
}

impl BearerSessions {
    /// Blank tokens are discarded
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens = tokens
            .into_iter()
            .map(Into::into)
            .map(|t: String| t.trim().to_owned())
            .filter(|t| !t.is_empty())
            .collect();
        Self { tokens }
    }

    /// Tokens from [`SESSION_TOKENS_ENV`], or `None` when unset or blank
    pub fn from_env() -> Option<Self> {
        let raw = env::var(SESSION_TOKENS_ENV).ok()?;
        let sessions = Self::new(raw.split(','));
        (!sessions.is_empty()).then_some(sessions)
    }

    /// Number of accepted tokens
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether no token is accepted
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Index of the matching token; every token is compared
    fn matching_index(&self, candidate: &str) -> Option<usize> {
        let mut found = None;
        for (i, token) in self.tokens.iter().enumerate() {
            if bool::from(token.as_bytes().ct_eq(candidate.as_bytes())) {
                found = Some(i);
            }
        }
        found
    }
}

#[async_trait]
impl SessionProvider for BearerSessions {
    async fn get_session(&self, headers: &HeaderMap) -> Option<Session> {
        let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
        let token = value.strip_prefix("Bearer ")?.trim();
        let index = self.matching_index(token)?;
        Some(Session {
            subject: format!("token-{index}"),
        })
    }
}

/// Development mode: every request gets an anonymous session
pub struct OpenSessions;

#[async_trait]
impl SessionProvider for OpenSessions {
    async fn get_session(&self, _headers: &HeaderMap) -> Option<Session> {
        Some(Session {
            subject: "anonymous".to_owned(),
        })
    }
}

/// Middleware rejecting requests without a session
///
/// Runs before any handler, so an unauthenticated request never reaches
/// the orchestrator.
pub async fn require_session(
    State(state): State<SharedState>,
    mut request: Request,
    next: Next,
) -> Response {
    let session = state.sessions().get_session(request.headers()).await;
    match session {
        Some(session) => {
            debug!(subject = %session.subject, "Session accepted");
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        None => (
            StatusCode::UNAUTHORIZED,
            Json(MessageResponse::new("Unauthorized")),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).expect("header"),
        );
        headers
    }

    #[tokio::test]
    async fn bearer_accepts_configured_token() {
        let sessions = BearerSessions::new(["alpha", "beta"]);
        let session = sessions.get_session(&bearer("beta")).await;
        assert_eq!(session.map(|s| s.subject), Some("token-1".to_owned()));
    }

    #[tokio::test]
    async fn bearer_rejects_unknown_missing_or_wrong_scheme() {
        let sessions = BearerSessions::new(["alpha"]);
        assert!(sessions.get_session(&bearer("alph")).await.is_none());
        assert!(sessions.get_session(&HeaderMap::new()).await.is_none());

        let mut basic = HeaderMap::new();
        basic.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic alpha"));
        assert!(sessions.get_session(&basic).await.is_none());
    }

    #[test]
    fn blank_tokens_are_dropped() {
        let sessions = BearerSessions::new([" ", "", "  gamma "]);
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions.matching_index("gamma"), Some(0));
    }

    #[tokio::test]
    async fn open_sessions_accept_everything() {
        assert!(OpenSessions.get_session(&HeaderMap::new()).await.is_some());
    }
}
