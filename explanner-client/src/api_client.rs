//! HTTP client for the explanner backend.

use explanner_model::ErrorBody;
use log::debug;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors produced by backend calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (network unreachable,
    /// timeout, TLS failure).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-200 status.
    #[error("rejected with status {status}")]
    Rejected {
        status: StatusCode,
        /// The backend's `detail` field, when the body carried one.
        detail: Option<String>,
    },

    /// A 200 response whose body did not match the expected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// The message shown to the user: the backend's rejection detail when
    /// present, otherwise the transport-level description.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Rejected {
                detail: Some(detail),
                ..
            } => detail.clone(),
            other => other.to_string(),
        }
    }
}

/// API client with bearer-token authentication.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    api_root: String,
    access_token: Arc<RwLock<Option<String>>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("api_root", &self.api_root)
            .field(
                "has_token",
                &self
                    .access_token
                    .try_read()
                    .map(|t| t.is_some())
                    .unwrap_or(false),
            )
            .finish()
    }
}

impl ApiClient {
    pub fn new(api_root: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to create HTTP client");

        Self {
            client,
            api_root: api_root.into().trim_end_matches('/').to_string(),
            access_token: Arc::new(RwLock::new(None)),
        }
    }

    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    /// Replaces the access token attached to authenticated requests.
    /// `None` reverts to anonymous requests.
    pub async fn set_access_token(&self, token: Option<String>) {
        *self.access_token.write().await = token;
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}/{}", self.api_root, path.trim_start_matches('/'))
    }

    async fn build_request(&self, builder: RequestBuilder) -> RequestBuilder {
        if let Some(token) = self.access_token.read().await.as_ref() {
            builder.header("Authorization", format!("Bearer {}", token))
        } else {
            builder
        }
    }

    async fn execute_request<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request.send().await?;

        match response.status() {
            StatusCode::OK | StatusCode::CREATED => response
                .json()
                .await
                .map_err(|e| ApiError::InvalidResponse(e.to_string())),
            status => {
                // Pull the rejection reason out of the body when there is one.
                let detail = response
                    .json::<ErrorBody>()
                    .await
                    .ok()
                    .and_then(|body| body.detail);
                Err(ApiError::Rejected { status, detail })
            }
        }
    }

    /// GET with authentication.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.build_url(path);
        debug!("GET {}", url);
        let request = self.build_request(self.client.get(&url)).await;
        self.execute_request(request).await
    }

    /// POST with authentication.
    pub async fn post<T: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<R, ApiError> {
        let url = self.build_url(path);
        debug!("POST {}", url);
        let request = self.build_request(self.client.post(&url).json(body)).await;
        self.execute_request(request).await
    }

    /// POST without authentication, for the token endpoints: they are called
    /// while no valid access token exists and must never carry a stale one.
    pub async fn post_public<T: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<R, ApiError> {
        let url = self.build_url(path);
        debug!("POST (public) {}", url);
        self.execute_request(self.client.post(&url).json(body)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_url_normalizes_slashes() {
        let client = ApiClient::new("http://localhost:8000/api/", Duration::from_secs(10));
        assert_eq!(
            client.build_url("/token/refresh/"),
            "http://localhost:8000/api/token/refresh/"
        );
        assert_eq!(
            client.build_url("courses/"),
            "http://localhost:8000/api/courses/"
        );
    }

    #[test]
    fn user_message_prefers_backend_detail() {
        let rejected = ApiError::Rejected {
            status: StatusCode::UNAUTHORIZED,
            detail: Some("No active account found".into()),
        };
        assert_eq!(rejected.user_message(), "No active account found");

        let anonymous = ApiError::Rejected {
            status: StatusCode::BAD_GATEWAY,
            detail: None,
        };
        assert_eq!(anonymous.user_message(), "rejected with status 502 Bad Gateway");
    }
}
