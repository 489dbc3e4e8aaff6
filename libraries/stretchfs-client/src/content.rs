//! Content lookups and temporary access grants.

use crate::error::Result;
use crate::request::Api;
use crate::types::{ContentPurchaseRequest, ContentRetrieveRequest, HashRequest, PurchaseRemoveRequest};
use serde_json::Value;
use tracing::debug;

/// Content client for StretchFS.
pub struct ContentClient<'a> {
    api: Api<'a>,
}

impl<'a> ContentClient<'a> {
    pub(crate) fn new(api: Api<'a>) -> Self {
        Self { api }
    }

    pub async fn exists(&self, hash: &str) -> Result<Value> {
        debug!(hash = %hash, "Checking content existence");
        self.api.post_json("content/exists", &HashRequest { hash }).await
    }

    pub async fn detail(&self, hash: &str) -> Result<Value> {
        debug!(hash = %hash, "Fetching content detail");
        self.api.post_json("content/detail", &HashRequest { hash }).await
    }

    /// Ask the server to fetch remote content described by `request`.
    pub async fn retrieve(&self, request: &Value, extension: &str) -> Result<Value> {
        debug!(extension = %extension, "Requesting content retrieval");
        self.api
            .post_json(
                "content/retrieve",
                &ContentRetrieveRequest { request, extension },
            )
            .await
    }

    /// Request a grant giving `life` seconds of access to `hash`.
    ///
    /// The response carries the purchase token used to revoke it.
    pub async fn purchase(&self, hash: &str, life: u64) -> Result<Value> {
        debug!(hash = %hash, life, "Purchasing content");
        let token = self.api.token().unwrap_or_default();
        self.api
            .post_json(
                "content/purchase",
                &ContentPurchaseRequest { hash, token, life },
            )
            .await
    }

    pub async fn purchase_remove(&self, purchase_token: &str) -> Result<Value> {
        debug!("Removing content purchase");
        self.api
            .post_json(
                "content/purchase/remove",
                &PurchaseRemoveRequest { purchase_token },
            )
            .await
    }
}
