//! Shared HTTP client for the Contrack contract store.
//!
//! Provides a minimal client with bearer-token auth from an explicit
//! [`Session`], typed GET/POST/PUT/DELETE/multipart helpers, and domain
//! methods (contracts CRUD, upload, report). Every call carries the same
//! timeout policy; the report call gets its own longer deadline.

pub mod api;
pub mod session;

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use contrack_core::{ClientConfig, ServiceError};

pub use session::Session;

/// API version prefix (e.g. "/api/v1"). Set CONTRACK_API_VERSION to match the
/// server.
pub fn api_prefix() -> String {
    let version = std::env::var("CONTRACK_API_VERSION").unwrap_or_else(|_| "v1".to_string());
    format!("/api/{}", version)
}

/// HTTP client for the contract store.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Session,
    report_timeout: Duration,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, session: Session) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            session,
            report_timeout: Duration::from_secs(config.report_timeout_secs),
        })
    }

    /// Client from environment configuration and session variables.
    pub fn from_env() -> Result<Self> {
        let config = ClientConfig::from_env()?;
        let session = Session::from_env()?;
        Self::new(&config, session)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.header(
            "Authorization",
            format!("Bearer {}", self.session.token()),
        )
    }

    /// GET with query parameters. Deserializes the JSON response.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ServiceError> {
        let mut request = self.apply_auth(self.client.get(self.build_url(path)));
        if !query.is_empty() {
            request = request.query(query);
        }
        self.execute(request).await
    }

    /// GET with a per-request deadline overriding the client default.
    pub(crate) async fn get_with_timeout<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        timeout: Duration,
    ) -> Result<T, ServiceError> {
        let mut request = self
            .apply_auth(self.client.get(self.build_url(path)))
            .timeout(timeout);
        if !query.is_empty() {
            request = request.query(query);
        }
        self.execute(request).await
    }

    /// POST a JSON body and deserialize the response.
    pub(crate) async fn post_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ServiceError> {
        let request = self.apply_auth(self.client.post(self.build_url(path)).json(body));
        self.execute(request).await
    }

    /// PUT a JSON body with query parameters.
    pub(crate) async fn put_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &B,
    ) -> Result<T, ServiceError> {
        let mut request = self.apply_auth(self.client.put(self.build_url(path)).json(body));
        if !query.is_empty() {
            request = request.query(query);
        }
        self.execute(request).await
    }

    /// DELETE with query parameters.
    pub(crate) async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ServiceError> {
        let mut request = self.apply_auth(self.client.delete(self.build_url(path)));
        if !query.is_empty() {
            request = request.query(query);
        }
        self.execute(request).await
    }

    /// POST a multipart form and deserialize the response.
    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, ServiceError> {
        let request = self.apply_auth(self.client.post(self.build_url(path)).multipart(form));
        self.execute(request).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ServiceError> {
        let response = request.send().await.map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(failure_from(status, &body));
        }

        response
            .json()
            .await
            .map_err(|e| ServiceError::Decode(e.to_string()))
    }
}

fn transport_error(err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        ServiceError::Timeout
    } else {
        ServiceError::Transport(err.to_string())
    }
}

/// Map a non-2xx response to a typed error. 401 is its own variant so callers
/// can clear the session and force a re-login.
fn failure_from(status: StatusCode, body: &str) -> ServiceError {
    let detail = extract_detail(body);
    if status == StatusCode::UNAUTHORIZED {
        return ServiceError::Unauthorized(
            detail.unwrap_or_else(|| "authentication required".to_string()),
        );
    }
    ServiceError::Remote {
        status: status.as_u16(),
        detail,
    }
}

/// The store reports failures as `{"detail": "..."}`.
fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")
        .and_then(|detail| detail.as_str())
        .map(|detail| detail.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> ApiClient {
        let config = ClientConfig {
            api_base_url: "http://localhost:8000/".to_string(),
            ..Default::default()
        };
        ApiClient::new(&config, Session::demo("buyer@example.com")).unwrap()
    }

    #[test]
    fn build_url_strips_trailing_slash() {
        let client = test_client();
        assert_eq!(
            client.build_url("/api/v1/contracts"),
            "http://localhost:8000/api/v1/contracts"
        );
    }

    #[test]
    fn extract_detail_from_error_body() {
        assert_eq!(
            extract_detail(r#"{"detail": "Contract not found"}"#),
            Some("Contract not found".to_string())
        );
        assert_eq!(extract_detail(r#"{"error": "nope"}"#), None);
        assert_eq!(extract_detail("<html>gateway timeout</html>"), None);
    }

    #[test]
    fn failure_from_maps_unauthorized() {
        let err = failure_from(StatusCode::UNAUTHORIZED, r#"{"detail": "Token expired"}"#);
        assert!(matches!(err, ServiceError::Unauthorized(ref msg) if msg == "Token expired"));
    }

    #[test]
    fn failure_from_keeps_status_and_detail() {
        match failure_from(StatusCode::UNPROCESSABLE_ENTITY, r#"{"detail": "Bad file"}"#) {
            ServiceError::Remote { status, detail } => {
                assert_eq!(status, 422);
                assert_eq!(detail.as_deref(), Some("Bad file"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn failure_from_tolerates_non_json_body() {
        match failure_from(StatusCode::BAD_GATEWAY, "upstream down") {
            ServiceError::Remote { status, detail } => {
                assert_eq!(status, 502);
                assert!(detail.is_none());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
