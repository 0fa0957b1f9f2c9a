//! HTTP client for the cellulose load backend.
//!
//! Wraps a shared [`reqwest::Client`] with one typed method per
//! endpoint under `/celulose`. All methods return [`ApiError`], which
//! separates transport failures from HTTP-level rejections so callers
//! can decide what is worth retrying.
//!
//! # Usage
//!
//! ```ignore
//! use celulog_client::CelluloseClient;
//!
//! let client = CelluloseClient::new("http://erp.local:8080/api");
//! let loads = client.latest().await?;
//! ```

use celulog_core::{DailySummary, Load, LoadDraft, LoadFilter};
use serde::de::DeserializeOwned;

mod wire;

pub use wire::FilterWire;

// ── Error ───────────────────────────────────────────────────────────

/// Client-side API error.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP {status}: {message}")]
    Server { status: u16, message: String },

    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    #[error("decode: {0}")]
    Decode(String),

    #[error("{0}")]
    Input(String),
}

impl ApiError {
    /// Whether retrying the same request has any chance of helping.
    /// Connection failures and 5xx responses are transient; 4xx
    /// rejections and malformed bodies are not.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Network(_) => true,
            ApiError::Server { status, .. } => *status >= 500,
            ApiError::Decode(_) | ApiError::Input(_) => false,
        }
    }
}

// ── CelluloseClient ─────────────────────────────────────────────────

const ENDPOINT: &str = "/celulose";

/// Typed client for the `/celulose` resource.
pub struct CelluloseClient {
    http: reqwest::Client,
    base_url: String,
    wire: FilterWire,
}

impl CelluloseClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            wire: FilterWire::default(),
        }
    }

    /// Select which field spelling search payloads use.
    pub fn with_wire(mut self, wire: FilterWire) -> Self {
        self.wire = wire;
        self
    }

    pub fn wire(&self) -> FilterWire {
        self.wire
    }

    /// Collection URL: `{base_url}/celulose`.
    fn collection_url(&self) -> String {
        format!("{}{}", self.base_url, ENDPOINT)
    }

    /// URL for a single record: `{base_url}/celulose/{id}`.
    fn item_url(&self, id: &str) -> String {
        format!("{}/{}", self.collection_url(), id)
    }

    /// Turn a non-success response into `ApiError::Server`.
    async fn read_error(resp: reqwest::Response) -> ApiError {
        let status = resp.status().as_u16();
        let message = resp.text().await.unwrap_or_default();
        ApiError::Server { status, message }
    }

    /// Parse a list response. The backend answers an empty collection
    /// with a `null` or empty body rather than `[]`, so both read as
    /// an empty vec.
    async fn parse_list<R: DeserializeOwned>(resp: reqwest::Response) -> Result<Vec<R>, ApiError> {
        if !resp.status().is_success() {
            return Err(Self::read_error(resp).await);
        }
        let body = resp.text().await?;
        let trimmed = body.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Ok(Vec::new());
        }
        serde_json::from_str(trimmed).map_err(|e| ApiError::Decode(format!("response body: {}", e)))
    }

    /// Parse a single-record response.
    async fn parse_one<R: DeserializeOwned>(resp: reqwest::Response) -> Result<R, ApiError> {
        if !resp.status().is_success() {
            return Err(Self::read_error(resp).await);
        }
        resp.json::<R>()
            .await
            .map_err(|e| ApiError::Decode(format!("response body: {}", e)))
    }

    /// `GET /celulose/latest` — most recent loads.
    pub async fn latest(&self) -> Result<Vec<Load>, ApiError> {
        let url = format!("{}/latest", self.collection_url());
        let resp = self.http.get(&url).send().await?;
        Self::parse_list(resp).await
    }

    /// `GET /celulose/day` — per-material totals for today.
    pub async fn day_summary(&self) -> Result<Vec<DailySummary>, ApiError> {
        let url = format!("{}/day", self.collection_url());
        let resp = self.http.get(&url).send().await?;
        Self::parse_list(resp).await
    }

    /// `POST /celulose/filtered` — search the load history.
    pub async fn filtered(&self, filter: &LoadFilter) -> Result<Vec<Load>, ApiError> {
        let url = format!("{}/filtered", self.collection_url());
        let body = wire::filter_body(filter, self.wire);
        let resp = self.http.post(&url).json(&body).send().await?;
        Self::parse_list(resp).await
    }

    /// `POST /celulose` — register a new load. The backend echoes the
    /// stored record, now carrying its assigned id.
    pub async fn create(&self, draft: &LoadDraft) -> Result<LoadDraft, ApiError> {
        let resp = self
            .http
            .post(&self.collection_url())
            .json(draft)
            .send()
            .await?;
        Self::parse_one(resp).await
    }

    /// `PUT /celulose/{id}` — replace an existing record.
    pub async fn update(&self, draft: &LoadDraft) -> Result<LoadDraft, ApiError> {
        let id = draft
            .id
            .as_deref()
            .ok_or_else(|| ApiError::Input("update requires a record id".into()))?;
        let resp = self.http.put(&self.item_url(id)).json(draft).send().await?;
        Self::parse_one(resp).await
    }

    /// `DELETE /celulose/{id}` — remove a record.
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let resp = self.http.delete(&self.item_url(id)).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::read_error(resp).await);
        }
        Ok(())
    }
}
