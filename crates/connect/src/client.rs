//! HTTP client for the remote auth/access REST API.

use std::time::Duration;

use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::json;

use crate::error::{ConnectError, Result};
use crate::types::*;

/// Requests that exceed this are rejected; the caller decides about retrying.
const DEFAULT_TIMEOUT_SECS: u64 = 8;
const MAX_LOG_BODY_CHARS: usize = 512;

/// Client for the remote auth/access API.
///
/// Stateless: the bearer token is supplied per call by the session layer.
#[derive(Debug, Clone)]
pub struct ConnectClient {
    client: reqwest::Client,
    base_url: String,
}

impl ConnectClient {
    /// Create a new API client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the API (e.g., "https://api.example.app")
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    fn bearer_headers(&self, token: &str) -> Result<HeaderMap> {
        let mut headers = self.headers();
        let auth_value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| ConnectError::auth("Invalid access token format"))?;
        headers.insert(AUTHORIZATION, auth_value);
        Ok(headers)
    }

    fn log_response(status: reqwest::StatusCode, body: &str) {
        if status.is_success() {
            debug!("API response status: {}", status);
            return;
        }

        let mut preview = body.chars().take(MAX_LOG_BODY_CHARS).collect::<String>();
        if body.chars().count() > MAX_LOG_BODY_CHARS {
            preview.push_str("...");
        }
        debug!("API response error ({}): {}", status, preview);
    }

    /// Parse a JSON response body, extracting the API's human-readable
    /// `error` message on failure statuses.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;
        Self::log_response(status, &body);

        if !status.is_success() {
            if let Ok(error) = serde_json::from_str::<ApiErrorBody>(&body) {
                return Err(ConnectError::api(status.as_u16(), error.error));
            }
            return Err(ConnectError::api(
                status.as_u16(),
                format!("Request failed: {}", body),
            ));
        }

        serde_json::from_str(&body).map_err(|e| {
            log::error!(
                "Failed to deserialize response. Body: {}, Error: {}",
                body,
                e
            );
            ConnectError::api(status.as_u16(), format!("Failed to parse response: {}", e))
        })
    }

    /// Register a new account.
    ///
    /// POST /auth/register
    pub async fn register(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let url = format!("{}/auth/register", self.base_url);

        let response = self
            .client
            .post(&url)
            .headers(self.headers())
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Log in with email and password.
    ///
    /// POST /auth/login
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let url = format!("{}/auth/login", self.base_url);

        let response = self
            .client
            .post(&url)
            .headers(self.headers())
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Fetch the authenticated user.
    ///
    /// GET /auth/me
    pub async fn me(&self, token: &str) -> Result<AuthUser> {
        let url = format!("{}/auth/me", self.base_url);

        let response = self
            .client
            .get(&url)
            .headers(self.bearer_headers(token)?)
            .send()
            .await?;

        let body: MeResponse = Self::parse_response(response).await?;
        Ok(body.user)
    }

    /// Fetch the subscription/trial access window.
    ///
    /// GET /user/access
    pub async fn access(&self, token: &str) -> Result<AccessBody> {
        let url = format!("{}/user/access", self.base_url);

        let response = self
            .client
            .get(&url)
            .headers(self.bearer_headers(token)?)
            .send()
            .await?;

        let body: AccessResponse = Self::parse_response(response).await?;
        Ok(body.access)
    }

    /// Confirm an email address with its verification token.
    ///
    /// POST /auth/verify-email
    pub async fn verify_email(&self, verification_token: &str) -> Result<AuthResponse> {
        let url = format!("{}/auth/verify-email", self.base_url);

        let response = self
            .client
            .post(&url)
            .headers(self.headers())
            .json(&json!({ "token": verification_token }))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Request a password-recovery email.
    ///
    /// POST /auth/forgot-password
    pub async fn forgot_password(&self, email: &str) -> Result<MessageResponse> {
        let url = format!("{}/auth/forgot-password", self.base_url);

        let response = self
            .client
            .post(&url)
            .headers(self.headers())
            .json(&json!({ "email": email }))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Set a new password with a recovery token.
    ///
    /// POST /auth/reset-password
    pub async fn reset_password(&self, reset_token: &str, new_password: &str) -> Result<MessageResponse> {
        let url = format!("{}/auth/reset-password", self.base_url);

        let response = self
            .client
            .post(&url)
            .headers(self.headers())
            .json(&json!({ "token": reset_token, "newPassword": new_password }))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Ask for the verification email to be sent again.
    ///
    /// POST /auth/resend-verification
    pub async fn resend_verification(&self, email: &str) -> Result<MessageResponse> {
        let url = format!("{}/auth/resend-verification", self.base_url);

        let response = self
            .client
            .post(&url)
            .headers(self.headers())
            .json(&json!({ "email": email }))
            .send()
            .await?;

        Self::parse_response(response).await
    }
}
