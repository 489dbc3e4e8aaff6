//! Request bodies for the StretchFS API.
//!
//! Responses are relayed as untyped `serde_json::Value`; only outgoing
//! bodies are modelled.

use serde::Serialize;
use serde_json::{Map, Value};

/// Category used by `job_create` when none is given.
pub const DEFAULT_JOB_CATEGORY: &str = "resource";

// =============================================================================
// Authentication Types
// =============================================================================

/// Request body for the login endpoint.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

// =============================================================================
// File Types
// =============================================================================

/// Body for endpoints addressed by a single path.
#[derive(Debug, Serialize)]
pub struct PathRequest {
    pub path: String,
}

#[derive(Debug, Serialize)]
pub struct FileLinkRequest<'a> {
    pub handle: &'a str,
    pub hash: &'a str,
    pub path: String,
}

// =============================================================================
// Content Types
// =============================================================================

/// Body for endpoints addressed by content hash.
#[derive(Debug, Serialize)]
pub struct HashRequest<'a> {
    pub hash: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ContentPurchaseRequest<'a> {
    pub hash: &'a str,
    pub token: &'a str,
    /// Grant lifetime in seconds
    pub life: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRemoveRequest<'a> {
    pub purchase_token: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ContentRetrieveRequest<'a> {
    pub request: &'a Value,
    pub extension: &'a str,
}

// =============================================================================
// Job Types
// =============================================================================

/// Request body for `job/create`.
///
/// `description` is the job document serialized to a JSON *string*; the
/// server decodes it a second time.
#[derive(Debug, Serialize)]
pub struct JobCreateRequest<'a> {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    pub category: &'a str,
}

/// Body for lifecycle endpoints addressed by handle alone.
#[derive(Debug, Serialize)]
pub struct JobHandleRequest<'a> {
    pub handle: &'a str,
}

/// Body for `job/update`: the handle with the changes merged beside it.
#[derive(Debug, Serialize)]
pub struct JobUpdateRequest<'a> {
    pub handle: &'a str,
    #[serde(flatten)]
    pub changes: Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub struct JobContentRequest<'a> {
    pub handle: &'a str,
    pub file: &'a str,
}
