//! Normalized record types and their JSON-lines encoding.
//!
//! A record store is UTF-8 text with one JSON object per line. The batch-file
//! variant writes [`DocumentRecord`]s, the crawl variant writes
//! [`PageRecord`]s.

use serde::{Deserialize, Serialize};

use crate::{NormalizeError, Result};

/// Heading used for the synthetic section covering text with no headings.
pub const MAIN_CONTENT_HEADING: &str = "Main Content";

/// A heading and the content lines that follow it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub heading: String,
    pub content: String,
}

impl Section {
    pub fn new(heading: impl Into<String>, content: impl Into<String>) -> Self {
        Self { heading: heading.into(), content: content.into() }
    }
}

/// One normalized plaintext document.
///
/// `sections` and `commands` are always serialized as arrays, possibly empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub title: Option<String>,
    pub version: Option<String>,
    pub sections: Vec<Section>,
    pub commands: Vec<String>,
}

/// One normalized crawled page.
///
/// Empty text and empty lists are serialized as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub title: Option<String>,
    pub version: Option<String>,
    pub content: Option<String>,
    pub sections: Option<Vec<Section>>,
    pub commands: Option<Vec<String>>,
    pub url: String,
}

/// Records that can be written to and read from a record store.
pub trait JsonLine: Serialize + for<'de> Deserialize<'de> + Sized {
    /// Encode as a single line of JSON, without the trailing newline.
    fn to_json_line(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode one line of a record store.
    fn from_json_line(line: &str) -> Result<Self> {
        serde_json::from_str(line).map_err(|e| NormalizeError::MalformedRecord { line: 0, message: e.to_string() })
    }
}

impl JsonLine for DocumentRecord {}
impl JsonLine for PageRecord {}

/// Pretty-printed JSON for a single record (used by `inspect`)
pub fn to_pretty_json<T: Serialize>(record: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(record)?)
}
