//! Job lifecycle operations.
//!
//! Jobs are scheduled and executed by the server; every call here is a
//! single POST addressed by the job handle.

use crate::error::{Result, StretchFsError};
use crate::request::Api;
use crate::types::{
    JobContentRequest, JobCreateRequest, JobHandleRequest, JobUpdateRequest, DEFAULT_JOB_CATEGORY,
};
use serde_json::{Map, Value};
use tracing::{debug, info};

/// Job client for StretchFS.
pub struct JobClient<'a> {
    api: Api<'a>,
}

impl<'a> JobClient<'a> {
    pub(crate) fn new(api: Api<'a>) -> Self {
        Self { api }
    }

    /// Submit a new job.
    ///
    /// `description` is sent as a JSON-encoded string inside the body, not
    /// as a nested object; the server expects it that way.
    pub async fn create(
        &self,
        description: &Value,
        priority: Option<u32>,
        category: Option<&str>,
    ) -> Result<Value> {
        let category = category.unwrap_or(DEFAULT_JOB_CATEGORY);
        let body = JobCreateRequest {
            description: encode_description(description)?,
            priority,
            category,
        };

        debug!(category = %category, priority = ?priority, "Creating job");
        let response = self.api.post_json("job/create", &body).await?;
        info!(category = %category, "Job created");
        Ok(response)
    }

    /// Apply `changes` (a JSON object) to a job.
    pub async fn update(&self, handle: &str, changes: &Value) -> Result<Value> {
        let mut changes: Map<String, Value> = match changes {
            Value::Object(map) => map.clone(),
            Value::Null => Map::new(),
            _ => {
                return Err(StretchFsError::InvalidInput(
                    "job changes must be a JSON object".to_string(),
                ))
            }
        };
        changes.remove("handle");
        if let Some(description) = changes.get_mut("description") {
            if !description.is_string() {
                let encoded = encode_description(description)?;
                *description = Value::String(encoded);
            }
        }

        debug!(handle = %handle, "Updating job");
        self.api
            .post_json("job/update", &JobUpdateRequest { handle, changes })
            .await
    }

    pub async fn detail(&self, handle: &str) -> Result<Value> {
        self.lifecycle("job/detail", handle).await
    }

    pub async fn start(&self, handle: &str) -> Result<Value> {
        self.lifecycle("job/start", handle).await
    }

    pub async fn abort(&self, handle: &str) -> Result<Value> {
        self.lifecycle("job/abort", handle).await
    }

    pub async fn retry(&self, handle: &str) -> Result<Value> {
        self.lifecycle("job/retry", handle).await
    }

    pub async fn remove(&self, handle: &str) -> Result<Value> {
        self.lifecycle("job/remove", handle).await
    }

    /// Whether the job produced `file`.
    ///
    /// An empty body or a missing `exists` field counts as `false`.
    pub async fn content_exists(&self, handle: &str, file: &str) -> Result<bool> {
        debug!(handle = %handle, file = %file, "Checking job content");
        let body = self
            .api
            .post_json("job/content/exists", &JobContentRequest { handle, file })
            .await?;
        Ok(exists_flag(&body))
    }

    async fn lifecycle(&self, route: &str, handle: &str) -> Result<Value> {
        debug!(route = %route, handle = %handle, "Job call");
        self.api.post_json(route, &JobHandleRequest { handle }).await
    }
}

fn encode_description(description: &Value) -> Result<String> {
    serde_json::to_string(description).map_err(|e| StretchFsError::InvalidInput(e.to_string()))
}

fn exists_flag(body: &Value) -> bool {
    body.get("exists").and_then(Value::as_bool).unwrap_or(false)
}
