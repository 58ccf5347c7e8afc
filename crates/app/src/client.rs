//! Backend HTTP client.

use std::{fmt, sync::Arc};

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::{config::ApiConfig, envelope::error_message};

/// Errors returned by backend calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection failed or timed out.
    #[error("cannot reach server: {0}")]
    Transport(#[source] reqwest::Error),

    /// The session token was rejected and has been cleared.
    #[error("unauthorized")]
    Unauthorized,

    /// Backend answered with a non-2xx status.
    #[error("request rejected with status {status}: {}", message.as_deref().unwrap_or("no message"))]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Message from the response body, verbatim
        message: Option<String>,
    },

    /// Response body was not what the endpoint promises.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Text to show the user.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Transport(_) => {
                "Cannot reach the server. Check that the backend is running.".to_string()
            }
            ApiError::Unauthorized => "Your session has expired. Please log in again.".to_string(),
            ApiError::Rejected {
                message: Some(message),
                ..
            } => message.clone(),
            ApiError::Rejected {
                status,
                message: None,
            } => format!("The server rejected the request (status {status})."),
            ApiError::Decode(_) => "The server sent a response that could not be read.".to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ApiError::Decode(error.to_string())
        } else {
            ApiError::Transport(error)
        }
    }
}

/// JSON client for the shop backend. Cloning shares the session token.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
    token: Arc<RwLock<Option<Zeroizing<String>>>>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            base_url: config.base_url().to_string(),
            http,
            token: Arc::new(RwLock::new(
                config.token.clone().filter(|t| !t.trim().is_empty()).map(Zeroizing::new),
            )),
        })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Use `token` for subsequent requests.
    pub async fn set_token(&self, token: impl Into<String>) {
        *self.token.write().await = Some(Zeroizing::new(token.into()));
    }

    /// Forget the session token.
    pub async fn clear_token(&self) {
        *self.token.write().await = None;
    }

    /// Whether a session token is held.
    pub async fn has_token(&self) -> bool {
        self.token.read().await.is_some()
    }

    /// `GET path`
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.send(self.request(Method::GET, path).await).await
    }

    /// `POST path` with a JSON body
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn post<B: Serialize + Sync + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        self.send(self.request(Method::POST, path).await.json(body)).await
    }

    /// `PUT path` with a JSON body
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn put<B: Serialize + Sync + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        self.send(self.request(Method::PUT, path).await.json(body)).await
    }

    /// `DELETE path`
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.send(self.request(Method::DELETE, path).await).await
    }

    async fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let builder = self.http.request(method, url);

        match self.token.read().await.as_ref() {
            Some(token) => builder.bearer_auth(token.as_str()),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Value, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let url = response.url().path().to_string();
        let text = response.text().await?;

        debug!(%status, path = %url, "backend response");

        if status == StatusCode::UNAUTHORIZED {
            warn!(path = %url, "session rejected; clearing token");
            self.clear_token().await;

            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|body| error_message(&body))
                .or_else(|| {
                    let trimmed = text.trim();

                    (!trimmed.is_empty() && !trimmed.starts_with(['{', '[', '<']))
                        .then(|| trimmed.to_string())
                });

            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|error| ApiError::Decode(error.to_string()))
    }
}
