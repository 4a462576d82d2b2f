// API client module: a small blocking HTTP client for the backend's user
// and mobile endpoints. Every call blocks until the server answers or the
// transport fails; nothing is retried.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::ApiError;

/// Blocking API client holding the base URL and, once authenticated, the
/// bearer token sent with every probe.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

/// Login request payload.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AuthRequest {
    pub email: String,
    pub password: String,
}

/// Registration payload: the login fields plus a display name.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

/// Both auth endpoints wrap their payload as `{"data": {"token": ...}}`.
/// Fields are optional so a missing token is reported as such rather than
/// as a decode error.
#[derive(Deserialize, Debug)]
struct AuthEnvelope {
    data: Option<TokenData>,
}

#[derive(Deserialize, Debug)]
struct TokenData {
    token: Option<String>,
}

impl AuthEnvelope {
    fn into_token(self) -> Result<String, ApiError> {
        self.data
            .and_then(|d| d.token)
            .filter(|t| !t.is_empty())
            .ok_or(ApiError::MissingToken)
    }
}

impl ApiClient {
    /// Build a client for `base_url`. A trailing slash is dropped so paths
    /// can always be appended with a leading `/`.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder.build()?;
        Ok(ApiClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::new(
            &config.base_url,
            config.timeout_secs.map(Duration::from_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Store a bearer token for subsequent authenticated requests.
    pub fn set_token(&mut self, token: &str) {
        self.token = Some(token.to_string());
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Absolute URL for an endpoint path.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Authorization header map; empty when no token is set.
    fn auth_headers(&self) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        if let Some(t) = &self.token {
            let mut val = HeaderValue::from_str(&format!("Bearer {}", t))
                .map_err(|_| ApiError::InvalidToken)?;
            val.set_sensitive(true);
            headers.insert(AUTHORIZATION, val);
        }
        Ok(headers)
    }

    /// POST credentials to `/users/login` and return the token.
    pub fn login(&self, req: &AuthRequest) -> Result<String, ApiError> {
        let url = self.url("/users/login");
        debug!(%url, "sending login request");
        self.send_auth(self.client.post(&url).json(req))
    }

    /// POST credentials and display name to `/users/register` and return
    /// the token issued for the new account.
    pub fn register(&self, req: &RegisterRequest) -> Result<String, ApiError> {
        let url = self.url("/users/register");
        debug!(%url, "sending register request");
        self.send_auth(self.client.post(&url).json(req))
    }

    fn send_auth(&self, req: RequestBuilder) -> Result<String, ApiError> {
        let res = req.send()?;
        let status = res.status();
        let txt = res.text()?;
        if !status.is_success() {
            warn!(%status, "auth request rejected");
            return Err(ApiError::Status { status, body: txt });
        }
        let envelope: AuthEnvelope = serde_json::from_str(&txt)?;
        let token = envelope.into_token()?;
        debug!(token_len = token.len(), "token received");
        Ok(token)
    }

    /// Authenticated GET. Any status is returned with the raw body; only
    /// transport failures are errors here. Decoding is left to the caller
    /// so the status survives a non-JSON body.
    pub fn get(&self, path: &str) -> Result<ApiResponse, ApiError> {
        let url = self.url(path);
        debug!(%url, authenticated = self.has_token(), "sending GET");
        let res = self.client.get(&url).headers(self.auth_headers()?).send()?;
        let status = res.status();
        let text = res.text()?;
        debug!(%status, bytes = text.len(), "GET completed");
        Ok(ApiResponse { status, text })
    }
}

/// Status and undecoded body of a completed request.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub text: String,
}

impl ApiResponse {
    /// Parse the body as JSON, keeping the server's key order.
    pub fn json(&self) -> Result<Value, ApiError> {
        Ok(serde_json::from_str(&self.text)?)
    }
}
