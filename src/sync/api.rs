// src/sync/api.rs

//! REST client for the organisation endpoint.
//!
//! The server owns the rows; this module only moves them. Every mutation is
//! followed by a full refetch (scheduled by the manager), so the client never
//! patches its local copy in place.

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::tree::OrgRow;

/// Body for create and update requests. Optional fields are omitted from the
/// JSON entirely so the server keeps its defaults.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NodePayload {
    pub parent_id: Option<String>,
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_kerja: Option<String>,
    pub level: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_index: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bezetting: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kebutuhan_pegawai: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kelas_jabatan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jenis_jabatan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_pusat: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct DeleteResponse {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    deleted: u64,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Storage seam between the sync manager and the outside world. The manager
/// only sees this trait, so tests can swap in an in-memory store.
#[async_trait]
pub trait OrgStore: Send + Sync {
    async fn fetch_rows(&self) -> Result<Vec<OrgRow>>;
    async fn create_node(&self, payload: &NodePayload) -> Result<OrgRow>;
    async fn update_node(&self, id: &str, payload: &NodePayload) -> Result<()>;
    /// Returns the number of rows removed, subtree included.
    async fn delete_subtree(&self, id: &str) -> Result<u64>;
}

/// HTTP-backed implementation of [`OrgStore`].
pub struct OrgApi {
    client: reqwest::Client,
    base: Url,
}

impl OrgApi {
    /// `base_url` is the server root, e.g. `http://localhost:3000`. A missing
    /// trailing slash is tolerated.
    pub fn new(client: reqwest::Client, base_url: &str) -> Result<Self> {
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base = Url::parse(&normalized)
            .with_context(|| format!("Invalid API base URL: {}", base_url))?;
        Ok(OrgApi { client, base })
    }

    fn collection_url(&self) -> Result<Url> {
        self.base
            .join("api/struktur-organisasi")
            .context("Failed to build collection URL")
    }

    fn node_url(&self, id: &str) -> Result<Url> {
        self.base
            .join(&format!(
                "api/struktur-organisasi/{}",
                urlencoding::encode(id)
            ))
            .context("Failed to build node URL")
    }
}

// On a non-2xx response, surface the server's `{"error": ...}` message when
// there is one, the status line otherwise.
async fn check_status(resp: reqwest::Response, what: &str) -> Result<reqwest::Response> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let msg = match resp.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status.to_string(),
    };
    Err(anyhow!("{} failed: {}", what, msg))
}

#[async_trait]
impl OrgStore for OrgApi {
    async fn fetch_rows(&self) -> Result<Vec<OrgRow>> {
        let url = self.collection_url()?;
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to reach organisation API")?;
        let resp = check_status(resp, "Fetch").await?;
        resp.json::<Vec<OrgRow>>()
            .await
            .context("Failed to decode organisation rows")
    }

    async fn create_node(&self, payload: &NodePayload) -> Result<OrgRow> {
        let url = self.collection_url()?;
        let resp = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .context("Failed to reach organisation API")?;
        let resp = check_status(resp, "Create").await?;
        resp.json::<OrgRow>()
            .await
            .context("Failed to decode created node")
    }

    async fn update_node(&self, id: &str, payload: &NodePayload) -> Result<()> {
        let url = self.node_url(id)?;
        let resp = self
            .client
            .patch(url)
            .json(payload)
            .send()
            .await
            .context("Failed to reach organisation API")?;
        check_status(resp, "Update").await?;
        Ok(())
    }

    async fn delete_subtree(&self, id: &str) -> Result<u64> {
        let url = self.node_url(id)?;
        let resp = self
            .client
            .delete(url)
            .send()
            .await
            .context("Failed to reach organisation API")?;
        let resp = check_status(resp, "Delete").await?;
        let body = resp
            .json::<DeleteResponse>()
            .await
            .context("Failed to decode delete response")?;
        if !body.ok {
            bail!("Delete failed: server did not acknowledge");
        }
        Ok(body.deleted)
    }
}
