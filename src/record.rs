//! Metadata records and catalog entries

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fields every metadata record must carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RequiredField {
    Title,
    Function,
    Description,
    CreatedAt,
}

impl RequiredField {
    /// All required fields, in the order they are reported
    pub const ALL: [RequiredField; 4] = [
        RequiredField::Title,
        RequiredField::Function,
        RequiredField::Description,
        RequiredField::CreatedAt,
    ];

    /// Key used in the metadata file
    pub fn as_str(&self) -> &'static str {
        match self {
            RequiredField::Title => "title",
            RequiredField::Function => "function",
            RequiredField::Description => "description",
            RequiredField::CreatedAt => "createdAt",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A metadata record as authored next to an artifact, before validation.
///
/// Required fields are optional here so that every absent one can be
/// reported at once; a value of the wrong JSON type fails the decode.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    pub title: Option<String>,
    pub function: Option<String>,
    pub description: Option<String>,
    pub created_at: Option<String>,
    pub tags: Option<Vec<String>>,
    pub author: Option<String>,
    pub source: Option<String>,
    /// Keys this crate does not interpret; carried through to the catalog
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawRecord {
    /// Decode a record from the text of a metadata file
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    pub(crate) fn field(&self, field: RequiredField) -> Option<&str> {
        match field {
            RequiredField::Title => self.title.as_deref(),
            RequiredField::Function => self.function.as_deref(),
            RequiredField::Description => self.description.as_deref(),
            RequiredField::CreatedAt => self.created_at.as_deref(),
        }
    }
}

/// Validated metadata: every required field present and non-empty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactMeta {
    pub title: String,
    pub function: String,
    pub description: String,
    pub created_at: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ArtifactMeta {
    /// Whether the artifact carries `tag`
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// One artifact in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Directory of the record relative to the artifact root, `/`-separated
    pub id: String,
    #[serde(flatten)]
    pub meta: ArtifactMeta,
    /// Public URL of the renderable file
    pub path: String,
}

impl CatalogEntry {
    /// Create an entry whose `path` is `{prefix}/{id}/{renderable}`
    pub fn new(id: impl Into<String>, meta: ArtifactMeta, prefix: &str, renderable: &str) -> Self {
        let id = id.into();
        let path = public_path(prefix, &id, renderable);
        Self { id, meta, path }
    }

    /// Parsed `createdAt`, if it is a recognizable date
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        parse_created_at(&self.meta.created_at)
    }
}

/// Public locator of an artifact's renderable file
pub fn public_path(prefix: &str, id: &str, renderable: &str) -> String {
    format!("{}/{}/{}", prefix.trim_end_matches('/'), id, renderable)
}

/// Parse a `createdAt` value.
///
/// Accepts RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM:SS[.fff]` timestamps
/// (read as UTC) and plain `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_created_at(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(ts.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ts| ts.and_utc())
}
