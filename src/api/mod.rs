//! Content API client
//!
//! Fetches documents from the headless CMS over HTTP. Every call is a
//! single attempt with no local retry; timeout behavior is whatever the
//! underlying HTTP client provides.

mod document;

pub use document::{
    Banner, Document, DocumentData, FormatSpan, RawBlock, RichTextFragment, SearchResponse,
    SlugRef,
};

use reqwest::StatusCode;
use thiserror::Error;

/// Errors surfaced at the content API boundary
#[derive(Debug, Error)]
pub enum ApiError {
    /// No document matches the requested slug
    #[error("no document found for slug '{uid}'")]
    NotFound { uid: String },

    /// Network or HTTP-level failure talking to the content API
    #[error("content API request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    /// The response arrived but a required field is missing or unusable
    #[error("malformed document: {reason}")]
    Malformed { reason: String },
}

impl ApiError {
    fn from_decode(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Malformed {
                reason: err.to_string(),
            }
        } else {
            ApiError::Upstream(err)
        }
    }
}

/// Client for the headless content API.
///
/// Constructed once per command and passed down; there is no global client.
#[derive(Clone)]
pub struct ContentClient {
    http: reqwest::Client,
    api_url: String,
    document_type: String,
}

impl ContentClient {
    pub fn new(api_url: &str, document_type: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            document_type: document_type.to_string(),
        }
    }

    /// The document type this client queries ("post" by default)
    pub fn document_type(&self) -> &str {
        &self.document_type
    }

    /// Enumerate the slugs of every document of the configured type.
    ///
    /// Order is the API response order; nothing more is guaranteed. Observed
    /// slugs are logged to the trace sink for diagnostics. No pagination:
    /// the full set is assumed to fit one query.
    pub async fn list_slugs(&self) -> Result<Vec<String>, ApiError> {
        let url = format!("{}/documents", self.api_url);
        let response = self
            .http
            .get(&url)
            .query(&[("type", self.document_type.as_str())])
            .send()
            .await?
            .error_for_status()?;

        let search: SearchResponse = response.json().await.map_err(ApiError::from_decode)?;
        let slugs: Vec<String> = search.results.into_iter().map(|r| r.uid).collect();

        tracing::info!(
            "Enumerated {} documents of type '{}'",
            slugs.len(),
            self.document_type
        );
        for slug in &slugs {
            tracing::debug!("Observed slug: {}", slug);
        }

        Ok(slugs)
    }

    /// Fetch exactly one document matching `uid`
    pub async fn get_by_uid(&self, uid: &str) -> Result<Document, ApiError> {
        let url = format!("{}/documents/{}/{}", self.api_url, self.document_type, uid);
        let response = self.http.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound {
                uid: uid.to_string(),
            });
        }

        let response = response.error_for_status()?;
        response.json().await.map_err(ApiError::from_decode)
    }
}
