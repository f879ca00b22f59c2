// ABOUTME: Shared reqwest plumbing for the provider API clients
// ABOUTME: Builds URLs, posts JSON with auth headers, and maps HTTP failures to PlaygroundError
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::types::{PlaygroundError, ProviderId};

/// Maximum number of error-body characters carried into an error message
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Provider identity, endpoint, and credential for one client
#[derive(Clone)]
pub struct HttpClientBase {
    pub provider: ProviderId,
    pub base_url: String,
    pub api_key: String,
    pub http: Client,
}

impl HttpClientBase {
    pub fn new(provider: ProviderId, base_url: &str, api_key: &str, http: Client) -> Self {
        Self {
            provider,
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key: api_key.to_owned(),
            http,
        }
    }

    /// Build URL from base URL and path
    pub fn build_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Post JSON with the given headers and decode a JSON response
    pub async fn post_json<Req, Res>(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &Req,
    ) -> Result<Res, PlaygroundError>
    where
        Req: Serialize + Sync,
        Res: DeserializeOwned,
    {
        let mut request = self.http.post(url).json(body);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PlaygroundError::external_service(self.provider.as_str(), e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(self.status_error(status, &body));
        }

        response.json::<Res>().await.map_err(|e| {
            PlaygroundError::external_service(
                self.provider.as_str(),
                format!("invalid response body: {e}"),
            )
        })
    }

    fn status_error(&self, status: StatusCode, body: &str) -> PlaygroundError {
        let body: String = body.trim().chars().take(MAX_ERROR_BODY_CHARS).collect();
        let detail = format!("HTTP {status}: {body}");
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                PlaygroundError::auth_failure(format!("{}: {detail}", self.provider))
            }
            _ => PlaygroundError::external_service(self.provider.as_str(), detail),
        }
    }
}
