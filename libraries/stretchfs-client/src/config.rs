//! Client configuration.

use crate::error::{Result, StretchFsError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration for connecting to a StretchFS server.
///
/// Either `token` or both `username` and `password` must be present for
/// [`StretchFsClient::new`](crate::StretchFsClient::new) to succeed.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    /// Existing session token, skips login
    #[serde(default)]
    pub token: Option<String>,

    #[serde(default = "default_domain")]
    pub domain: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Use https (the default) or plain http
    #[serde(default = "default_tls")]
    pub tls: bool,

    #[serde(default)]
    pub accept_invalid_certs: bool,
}

impl ClientConfig {
    /// Config authenticated by an existing session token.
    pub fn with_token(domain: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            token: Some(token.into()),
            ..Self::default()
        }
    }

    /// Config that logs in with a username and password.
    pub fn with_credentials(
        domain: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            username: Some(username.into()),
            password: Some(password.into()),
            ..Self::default()
        }
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    pub fn tls(mut self, tls: bool) -> Self {
        self.tls = tls;
        self
    }

    /// Load configuration from an optional TOML file and the environment.
    ///
    /// Environment variables are prefixed with `STRETCHFS_`
    /// (e.g. `STRETCHFS_TOKEN`, `STRETCHFS_PORT`) and override the file.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = ::config::Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                return Err(StretchFsError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            settings = settings.add_source(::config::File::from(path));
        }

        settings = settings
            .add_source(::config::Environment::with_prefix("STRETCHFS").try_parsing(true));

        let config = settings.build()?;
        Ok(config.try_deserialize()?)
    }

    /// True when a token or a full username/password pair is present.
    pub fn has_credentials(&self) -> bool {
        self.token.is_some() || (self.username.is_some() && self.password.is_some())
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn scheme(&self) -> &'static str {
        if self.tls {
            "https"
        } else {
            "http"
        }
    }
}

fn default_domain() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    8161
}

fn default_timeout() -> u64 {
    60
}

fn default_tls() -> bool {
    true
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            username: None,
            password: None,
            token: None,
            domain: default_domain(),
            port: default_port(),
            timeout: default_timeout(),
            tls: default_tls(),
            accept_invalid_certs: false,
        }
    }
}
