//! Normalized post model

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::{ApiError, Document, RichTextFragment};

/// A blog post, normalized from a raw API document.
///
/// Produced fresh on each generation cycle and read-only from then on. Only
/// the fields the renderer consumes survive normalization; everything else
/// in the upstream payload is discarded.
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    /// URL-safe unique identifier
    pub uid: String,

    /// Set once at first publish; null until then
    pub first_publication_date: Option<DateTime<Utc>>,

    pub title: String,
    pub subtitle: String,
    pub author: String,

    /// Banner image reference
    pub banner_url: String,

    /// Ordered content blocks, order preserved from the API response
    pub content: Vec<ContentBlock>,
}

/// One content block: a heading and its rich-text body
#[derive(Debug, Clone, Serialize)]
pub struct ContentBlock {
    pub heading: String,
    pub body: Vec<RichTextFragment>,
}

impl Post {
    /// Normalize a raw document into a `Post`.
    ///
    /// A missing required field is a fatal error at generation time. Body
    /// fragment lists pass through verbatim; no text is rewritten here.
    pub fn from_document(document: Document) -> Result<Self, ApiError> {
        if !is_valid_slug(&document.uid) {
            return Err(ApiError::Malformed {
                reason: format!("unusable slug '{}'", document.uid),
            });
        }

        let data = document.data;
        let title = data.title.ok_or_else(|| missing("data.title"))?;
        let author = data.author.ok_or_else(|| missing("data.author"))?;
        let banner_url = data
            .banner
            .ok_or_else(|| missing("data.banner"))?
            .url
            .ok_or_else(|| missing("data.banner.url"))?;

        let content = data
            .content
            .into_iter()
            .map(|block| ContentBlock {
                heading: block.heading,
                body: block.body,
            })
            .collect();

        Ok(Post {
            uid: document.uid,
            first_publication_date: document.first_publication_date,
            title,
            subtitle: data.subtitle.unwrap_or_default(),
            author,
            banner_url,
            content,
        })
    }
}

/// Whether a slug is usable as a single output path component.
///
/// Slugs come from the content source and are written under the public
/// directory, so path separators and dot segments are rejected.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && !slug.contains('/') && !slug.contains('\\') && slug != "." && slug != ".."
}

fn missing(field: &str) -> ApiError {
    ApiError::Malformed {
        reason: format!("missing required field '{field}'"),
    }
}
