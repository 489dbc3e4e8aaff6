//! StretchFS Client
//!
//! HTTP client library for the StretchFS content and job API.
//!
//! # Features
//!
//! - **Authentication**: Login with username/password or reuse a session token
//! - **Files**: Create/remove folders, list, upload, download, link job output
//! - **Content**: Existence and detail lookups, temporary access grants
//! - **Jobs**: Create, update, start, abort, retry and remove server-side jobs
//!
//! Responses are relayed as `serde_json::Value` without reshaping.
//!
//! # Example
//!
//! ```ignore
//! use stretchfs_client::{ClientConfig, StretchFsClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::with_token("files.example.com", "session-token");
//!     let client = StretchFsClient::new(config)?;
//!
//!     let session = client.session().await?;
//!     session.files().folder_create("/reports/").await?;
//!     session
//!         .files()
//!         .upload(std::path::Path::new("q1.pdf"), "/reports/")
//!         .await?;
//!
//!     let job = session
//!         .jobs()
//!         .create(&serde_json::json!({"callback": {}, "resource": []}), None, None)
//!         .await?;
//!     println!("{}", job);
//!
//!     Ok(())
//! }
//! ```

mod auth;
mod client;
mod config;
mod content;
mod error;
mod file;
mod job;
mod path;
mod request;
mod types;

// Re-export main types
pub use client::{Session, StretchFsClient};
pub use self::config::ClientConfig;
pub use error::{ErrorKind, Result, StretchFsError};
pub use path::{job_content_url, sanitize_path, static_url};
pub use request::TOKEN_HEADER;
pub use types::DEFAULT_JOB_CATEGORY;

// Re-export sub-clients for direct use if needed
pub use content::ContentClient;
pub use file::{ByteStream, FileClient};
pub use job::JobClient;
