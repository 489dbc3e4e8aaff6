//! Main StretchFS client.

use crate::auth::AuthClient;
use crate::config::ClientConfig;
use crate::content::ContentClient;
use crate::error::{Result, StretchFsError};
use crate::file::FileClient;
use crate::job::JobClient;
use crate::path;
use crate::request::Api;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use url::Url;

/// Main client for interacting with a StretchFS server.
///
/// Holds the connection settings and the current session token. File,
/// content and job operations are reached through a [`Session`] obtained
/// from [`session`](Self::session).
///
/// # Example
///
/// ```ignore
/// use stretchfs_client::{ClientConfig, StretchFsClient};
///
/// let config = ClientConfig::with_credentials("files.example.com", "alice", "secret");
/// let client = StretchFsClient::new(config)?;
///
/// client.generate_token().await?;
///
/// let session = client.session().await?;
/// let listing = session.files().list("/docs/").await?;
/// println!("{}", listing);
/// ```
pub struct StretchFsClient {
    http: Client,
    base_url: Url,
    config: ClientConfig,
    token: Arc<RwLock<Option<String>>>,
}

impl StretchFsClient {
    /// Create a new client with the given configuration.
    ///
    /// Fails unless the config carries a token or a username and password.
    pub fn new(config: ClientConfig) -> Result<Self> {
        if !config.has_credentials() {
            return Err(StretchFsError::MissingCredentials);
        }

        let base = format!("{}://{}:{}/", config.scheme(), config.domain, config.port);
        let base_url =
            Url::parse(&base).map_err(|e| StretchFsError::InvalidUrl(format!("{}: {}", base, e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .timeout(config.timeout_duration())
            .default_headers(headers)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .user_agent(format!("stretchfs-client/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        debug!(base_url = %base_url, "Client created");

        Ok(Self {
            http,
            base_url,
            token: Arc::new(RwLock::new(config.token.clone())),
            config,
        })
    }

    /// Get the server base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Check if the client holds a session token.
    pub async fn is_authenticated(&self) -> bool {
        self.token.read().await.is_some()
    }

    /// Get the current session token.
    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    /// Set the session token directly (e.g., from stored credentials).
    pub async fn set_token(&self, token: impl Into<String>) {
        *self.token.write().await = Some(token.into());
    }

    /// Forget the session token without contacting the server.
    pub async fn clear_token(&self) {
        *self.token.write().await = None;
    }

    /// Login with the configured username and password.
    ///
    /// On success the session token is stored for subsequent requests and
    /// returned.
    pub async fn generate_token(&self) -> Result<String> {
        let (Some(username), Some(password)) = (&self.config.username, &self.config.password)
        else {
            return Err(StretchFsError::MissingCredentials);
        };

        let api = Api::new(&self.http, &self.base_url, None);
        let token = AuthClient::new(api).login(username, password).await?;

        *self.token.write().await = Some(token.clone());
        Ok(token)
    }

    /// Logout the current session on the server and forget the token.
    pub async fn destroy_token(&self) -> Result<Value> {
        let token = self.token().await.ok_or(StretchFsError::AuthRequired)?;

        let api = Api::new(&self.http, &self.base_url, Some(&token));
        let response = AuthClient::new(api).logout().await?;

        self.clear_token().await;
        Ok(response)
    }

    /// Get a session handle for file, content and job operations.
    ///
    /// Returns an error if no token is held.
    pub async fn session(&self) -> Result<Session> {
        let token = self.token().await.ok_or(StretchFsError::AuthRequired)?;

        Ok(Session {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            token,
        })
    }

    /// Public static URL for content, no request is made.
    pub fn url_static(&self, hash: &str, name: &str) -> String {
        path::static_url(&self.config.domain, hash, name)
    }

    /// Download URL for a job's output file, no request is made.
    pub fn job_content_url(&self, handle: &str, file: &str) -> String {
        path::job_content_url(&self.config.domain, self.config.port, handle, file)
    }

    /// Run a login if no token is held yet.
    pub async fn ensure_token(&self) -> Result<()> {
        if self.is_authenticated().await {
            return Ok(());
        }
        info!("No session token, logging in");
        self.generate_token().await.map(|_| ())
    }
}

/// Handle for authenticated operations.
///
/// Snapshot of the token taken by [`StretchFsClient::session`]; a later
/// login or logout on the client does not affect it.
pub struct Session {
    http: Client,
    base_url: Url,
    token: String,
}

impl Session {
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Folder and file operations.
    pub fn files(&self) -> FileClient<'_> {
        FileClient::new(self.api())
    }

    /// Content lookups and purchases.
    pub fn content(&self) -> ContentClient<'_> {
        ContentClient::new(self.api())
    }

    /// Job lifecycle operations.
    pub fn jobs(&self) -> JobClient<'_> {
        JobClient::new(self.api())
    }

    fn api(&self) -> Api<'_> {
        Api::new(&self.http, &self.base_url, Some(&self.token))
    }
}
