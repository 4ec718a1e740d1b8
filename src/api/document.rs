//! Raw document types returned by the content API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single document as returned by the content API.
///
/// Only the fields the transformer consumes are modeled; everything else in
/// the payload is ignored at decode time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// URL-safe unique identifier, assigned by the content source
    pub uid: String,

    /// Set once at first publish; null for documents that were never published
    #[serde(default)]
    pub first_publication_date: Option<DateTime<Utc>>,

    /// Document payload
    pub data: DocumentData,
}

/// The `data` envelope of a document.
///
/// Display fields are optional at decode time; the transformer decides which
/// ones are required. `content` is mandatory: a post without a content list
/// is undecodable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentData {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub banner: Option<Banner>,
    pub content: Vec<RawBlock>,
}

/// Banner image reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Banner {
    #[serde(default)]
    pub url: Option<String>,
}

/// One content block: a heading and its rich-text body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawBlock {
    pub heading: String,
    pub body: Vec<RichTextFragment>,
}

/// A rich-text fragment.
///
/// Every fragment carries at minimum `text`; the fragment type defaults to a
/// paragraph and `spans` to no formatting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RichTextFragment {
    #[serde(rename = "type")]
    pub fragment_type: String,
    pub text: String,
    pub spans: Vec<FormatSpan>,
}

impl RichTextFragment {
    /// Convenience constructor for a plain paragraph fragment
    pub fn paragraph(text: &str) -> Self {
        Self {
            fragment_type: "paragraph".to_string(),
            text: text.to_string(),
            spans: Vec::new(),
        }
    }
}

/// A formatting span over a fragment's text, in character offsets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatSpan {
    pub start: usize,
    pub end: usize,
    #[serde(rename = "type")]
    pub span_type: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// Response envelope of the enumeration endpoint.
///
/// Results are full documents upstream; only the uid is read here.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SlugRef>,
}

/// A document reference carrying just its slug
#[derive(Debug, Deserialize)]
pub struct SlugRef {
    pub uid: String,
}
