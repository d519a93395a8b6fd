//! HTTP client for the site's authentication API.
//!
//! This is a thin adapter: credential verification, session issuance, and
//! role lookup all happen on the service side. The client shapes requests,
//! checks responses, and surfaces backend rejections with their message
//! text intact so the app can classify them.

use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::auth::SessionData;
use crate::models::Identity;

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Default base URL for the authentication API. Override with
/// `PRESSGATE_API_URL` or the `api_base_url` config key.
pub const DEFAULT_API_BASE_URL: &str = "https://pressroom.example.com/api";

/// HTTP request timeout in seconds.
/// 30s allows for slow responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct SignUpRequest<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(rename = "fullName", skip_serializing_if = "Option::is_none")]
    full_name: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct SignInResponse {
    token: String,
    user: UserPayload,
}

#[derive(Debug, Deserialize)]
struct UserPayload {
    #[serde(rename = "userId")]
    user_id: i64,
    email: String,
    #[serde(rename = "fullName")]
    full_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RoleResponse {
    #[serde(rename = "isAdmin")]
    is_admin: bool,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Extract the backend's human-readable message from an error body.
/// Falls back to the (truncated) raw text when the body is not the
/// expected JSON shape, so unrecognized errors still surface verbatim.
fn error_message_from_body(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.message,
        Err(_) => ApiError::truncate_body(body.trim()),
    }
}

// ============================================================================
// Client
// ============================================================================

/// API client for the authentication service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client against the given base URL
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            token: None,
        })
    }

    /// Set the bearer token for authenticated requests
    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    /// Drop the bearer token, e.g. after sign-out
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn auth_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        if let Some(ref token) = self.token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        Ok(headers)
    }

    // =========================================================================
    // Auth operations
    // =========================================================================

    /// Verify credentials with the service and return the issued session.
    /// A refusal surfaces as `ApiError::CredentialsRejected` with the
    /// backend's message intact.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SessionData> {
        let url = self.url("/auth/sign-in");

        let response = self
            .client
            .post(&url)
            .json(&SignInRequest { email, password })
            .send()
            .await
            .context("Failed to send sign-in request")?;

        let response = Self::check_auth_response(response).await?;

        let body: SignInResponse = response
            .json()
            .await
            .context("Failed to parse sign-in response")?;

        debug!(user_id = body.user.user_id, "Sign-in accepted");

        Ok(SessionData {
            token: body.token,
            user_id: body.user.user_id,
            email: body.user.email,
            full_name: body.user.full_name,
            created_at: Utc::now(),
        })
    }

    /// Register a new account. The account is not signed in until the
    /// confirmation email is acted on, so no session is returned.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<()> {
        let url = self.url("/auth/sign-up");

        let response = self
            .client
            .post(&url)
            .json(&SignUpRequest {
                email,
                password,
                full_name,
            })
            .send()
            .await
            .context("Failed to send sign-up request")?;

        Self::check_auth_response(response).await?;

        debug!("Sign-up accepted");
        Ok(())
    }

    /// Invalidate the current session on the service side
    pub async fn sign_out(&self) -> Result<()> {
        let url = self.url("/auth/sign-out");

        let response = self
            .client
            .post(&url)
            .headers(self.auth_headers()?)
            .send()
            .await
            .context("Failed to send sign-out request")?;

        Self::check_response(response).await?;
        Ok(())
    }

    /// Fetch the identity the current token was issued for.
    /// Returns `ApiError::Unauthorized` when the token is no longer valid.
    pub async fn fetch_identity(&self) -> Result<Identity> {
        let url = self.url("/auth/me");

        let response = self
            .client
            .get(&url)
            .headers(self.auth_headers()?)
            .send()
            .await
            .context("Failed to send identity request")?;

        let response = Self::check_response(response).await?;

        let user: UserPayload = response
            .json()
            .await
            .context("Failed to parse identity response")?;

        Ok(Identity {
            user_id: user.user_id,
            email: user.email,
            full_name: user.full_name,
        })
    }

    /// Ask whether the current identity holds elevated privileges
    pub async fn fetch_role(&self) -> Result<bool> {
        let url = self.url("/auth/role");

        let response = self
            .client
            .get(&url)
            .headers(self.auth_headers()?)
            .send()
            .await
            .context("Failed to send role request")?;

        let response = Self::check_response(response).await?;

        let role: RoleResponse = response
            .json()
            .await
            .context("Failed to parse role response")?;

        Ok(role.is_admin)
    }

    // =========================================================================
    // Response checking
    // =========================================================================

    /// Check a response from a sign-in/sign-up endpoint. Client-class
    /// refusals carry the backend's message for classification; everything
    /// else maps by status.
    async fn check_auth_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if matches!(status.as_u16(), 400 | 401 | 409 | 422) {
            Err(ApiError::CredentialsRejected(error_message_from_body(&body)).into())
        } else {
            Err(ApiError::from_status(status, &body).into())
        }
    }

    /// Check if a response is successful, returning an error with body if not
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
