//! Wire types and the transport seam for the outline REST API.
//!
//! [`OutlineApi`] is the engine's only view of the server, so tests swap in
//! an in-memory implementation and the production client
//! ([`HttpOutlineApi`]) stays a thin reqwest wrapper.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use storyloom_core::hierarchy::OutlineItem;
use storyloom_core::types::DbId;

use crate::error::{OutlineError, OutlineResult};

/// A plot element as the API serializes it.
///
/// Unknown response fields (parent summaries, relation lists) are ignored
/// on deserialization; the engine only mirrors the tree itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineNode {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub parent_id: Option<DbId>,
    #[serde(rename = "order")]
    pub sort_order: i32,
    pub status: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub word_count: i32,
}

impl OutlineItem for OutlineNode {
    fn id(&self) -> DbId {
        self.id
    }
    fn parent_id(&self) -> Option<DbId> {
        self.parent_id
    }
    fn kind(&self) -> &str {
        &self.kind
    }
    fn sort_order(&self) -> i32 {
        self.sort_order
    }
}

/// Request body for creating a node.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNode {
    pub project_id: DbId,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<DbId>,
    #[serde(rename = "order", skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub auto_create_children: bool,
}

/// Partial update request body. Absent fields are left untouched by the
/// server; `parent_id: Some(None)` serializes as an explicit `null` and
/// clears the parent.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "order", skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Option<DbId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// The engine's transport seam.
#[async_trait]
pub trait OutlineApi: Send + Sync {
    /// Fetch every plot element of a project.
    async fn list(&self, project_id: DbId) -> OutlineResult<Vec<OutlineNode>>;

    /// Create a node, returning the server's row.
    async fn create(&self, input: &CreateNode) -> OutlineResult<OutlineNode>;

    /// Partially update a node, returning the updated row.
    async fn update(&self, id: DbId, patch: &UpdateNode) -> OutlineResult<OutlineNode>;

    /// Delete a node. The server refuses nodes that still have children.
    async fn delete(&self, id: DbId) -> OutlineResult<()>;
}

/// HTTP implementation of [`OutlineApi`] over the REST server.
#[derive(Debug, Clone)]
pub struct HttpOutlineApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpOutlineApi {
    /// `base_url` is the server origin, e.g. `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1/plot-elements{path}", self.base_url)
    }

    /// Turn a non-success response into [`OutlineError::Api`] using the
    /// server's `{"error": ...}` payload when present.
    async fn check(response: reqwest::Response) -> OutlineResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| body["error"].as_str().map(str::to_string))
            .unwrap_or_else(|| status.to_string());
        Err(OutlineError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl OutlineApi for HttpOutlineApi {
    async fn list(&self, project_id: DbId) -> OutlineResult<Vec<OutlineNode>> {
        let response = self.client.get(self.url(&format!("/{project_id}"))).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn create(&self, input: &CreateNode) -> OutlineResult<OutlineNode> {
        let response = self.client.post(self.url("")).json(input).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn update(&self, id: DbId, patch: &UpdateNode) -> OutlineResult<OutlineNode> {
        let response = self
            .client
            .put(self.url(&format!("/{id}")))
            .json(patch)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn delete(&self, id: DbId) -> OutlineResult<()> {
        let response = self.client.delete(self.url(&format!("/{id}"))).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}
