//! Session login and logout.

use crate::error::{Result, StretchFsError};
use crate::request::Api;
use crate::types::LoginRequest;
use serde_json::Value;
use tracing::{debug, info};

/// Authentication client for a StretchFS server.
pub(crate) struct AuthClient<'a> {
    api: Api<'a>,
}

impl<'a> AuthClient<'a> {
    pub(crate) fn new(api: Api<'a>) -> Self {
        Self { api }
    }

    /// Login with username and password.
    ///
    /// Returns the session token from the response.
    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        debug!(username = %username, "Attempting login");

        let body = self
            .api
            .post_json("user/login", &LoginRequest { username, password })
            .await?;

        let token = session_token(&body)?;
        info!(username = %username, "Login successful");
        Ok(token)
    }

    /// Invalidate the session identified by the token header.
    pub async fn logout(&self) -> Result<Value> {
        if self.api.token().is_none() {
            return Err(StretchFsError::AuthRequired);
        }
        debug!("Logging out");

        let body = self.api.post_empty("user/logout").await?;
        if body.get("session").is_none() {
            return Err(StretchFsError::NoSession);
        }

        info!("Logged out");
        Ok(body)
    }
}

/// Pull `session.token` out of a login response.
fn session_token(body: &Value) -> Result<String> {
    body.get("session")
        .and_then(|session| session.get("token"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(StretchFsError::NoSession)
}
