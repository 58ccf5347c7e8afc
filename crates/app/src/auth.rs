//! Login

use std::fmt;

use async_trait::async_trait;
use mockall::automock;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument};
use zeroize::Zeroizing;

use crate::{
    client::{ApiClient, ApiError},
    envelope::{Record, unwrap_envelope},
};

const LOGIN_PATH: &str = "api/auth/login";

/// Role assumed when the backend does not send one
pub const DEFAULT_ROLE: &str = "Admin";

/// A logged-in user
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    /// Bearer token
    pub token: Zeroizing<String>,
    /// Role name
    pub role: String,
    /// Display name
    pub full_name: String,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("role", &self.role)
            .field("full_name", &self.full_name)
            .finish()
    }
}

impl Session {
    /// Read a login response. The token is probed as `Token`, `token`, the
    /// same inside the envelope, or a bare string body.
    pub(crate) fn from_response(body: &Value, username: &str) -> Option<Self> {
        let payload = unwrap_envelope(body);
        let outer = Record::new(body);
        let inner = Record::new(payload);

        let token = outer
            .and_then(|record| record.string(&["token"]))
            .or_else(|| inner.and_then(|record| record.string(&["token", "accessToken"])))
            .or_else(|| {
                payload
                    .as_str()
                    .map(str::trim)
                    .filter(|text| !text.is_empty())
                    .map(str::to_string)
            })?;

        let records = [inner, outer];

        Some(Self {
            token: Zeroizing::new(token),
            role: first_string(records, &["role"]).unwrap_or_else(|| DEFAULT_ROLE.to_string()),
            full_name: first_string(records, &["fullName", "name"])
                .unwrap_or_else(|| username.to_string()),
        })
    }
}

fn first_string(records: [Option<Record<'_>>; 2], names: &[&str]) -> Option<String> {
    records
        .into_iter()
        .flatten()
        .find_map(|record| record.string(names))
}

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Clone)]
pub struct HttpAuthService {
    client: ApiClient,
}

impl HttpAuthService {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthService for HttpAuthService {
    #[instrument(skip(self, password))]
    async fn login(&self, username: &str, password: &str) -> Result<Session, ApiError> {
        let body = self
            .client
            .post(LOGIN_PATH, &Credentials { username, password })
            .await?;

        let session = Session::from_response(&body, username)
            .ok_or_else(|| ApiError::Decode("login response has no token".to_string()))?;

        self.client.set_token(session.token.as_str()).await;

        info!(role = %session.role, "logged in");

        Ok(session)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Exchanges credentials for a session and uses its token from then on.
    async fn login(&self, username: &str, password: &str) -> Result<Session, ApiError>;
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn token_locations() -> TestResult {
        let pascal = Session::from_response(&json!({"Token": "a", "Role": "Usta"}), "ali")
            .ok_or("no session")?;
        let enveloped = Session::from_response(
            &json!({"Data": {"Token": "b", "FullName": "Ali Kaya"}}),
            "ali",
        )
        .ok_or("no session")?;
        let bare = Session::from_response(&json!("c"), "ali").ok_or("no session")?;

        assert_eq!(pascal.token.as_str(), "a");
        assert_eq!(pascal.role, "Usta");
        assert_eq!(pascal.full_name, "ali");
        assert_eq!(enveloped.token.as_str(), "b");
        assert_eq!(enveloped.full_name, "Ali Kaya");
        assert_eq!(enveloped.role, DEFAULT_ROLE);
        assert_eq!(bare.token.as_str(), "c");
        assert!(Session::from_response(&json!({"message": "ok"}), "ali").is_none());

        Ok(())
    }

    #[test]
    fn debug_hides_token() -> TestResult {
        let session = Session::from_response(&json!({"token": "secret"}), "ali").ok_or("no session")?;

        assert!(!format!("{session:?}").contains("secret"));

        Ok(())
    }
}
