//! Error types for the catalog builder

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::record::RequiredField;

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Fatal errors: the build cannot produce a catalog at all
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CatalogError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Per-record problems. A record that produces one of these is left out of
/// the catalog; the build carries on with the next record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{}: malformed record: {reason}", .path.display())]
    MalformedRecord { path: PathBuf, reason: String },

    #[error("{}: Missing required fields: {}", .path.display(), join_fields(.fields))]
    MissingFields {
        path: PathBuf,
        fields: Vec<RequiredField>,
    },

    #[error("{}: Missing {renderable}", .path.display())]
    MissingRenderable { path: PathBuf, renderable: String },

    #[error("{}: record sits directly in the artifact root", .path.display())]
    UnplacedRecord { path: PathBuf },

    #[error("{}: unreadable: {reason}", .path.display())]
    Unreadable { path: PathBuf, reason: String },

    #[error("{}: symbolic link not followed", .path.display())]
    SkippedLink { path: PathBuf },

    #[error(
        "{}: duplicate id '{id}' replaces the entry from {}",
        .path.display(),
        .previous.display()
    )]
    DuplicateId {
        path: PathBuf,
        id: String,
        previous: PathBuf,
    },
}

impl ValidationError {
    /// Path of the metadata record the error refers to
    pub fn path(&self) -> &Path {
        match self {
            Self::MalformedRecord { path, .. }
            | Self::MissingFields { path, .. }
            | Self::MissingRenderable { path, .. }
            | Self::UnplacedRecord { path }
            | Self::Unreadable { path, .. }
            | Self::SkippedLink { path }
            | Self::DuplicateId { path, .. } => path,
        }
    }

    /// Warnings still leave the record in the catalog
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::DuplicateId { .. } | Self::SkippedLink { .. })
    }
}

fn join_fields(fields: &[RequiredField]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_message_names_every_field() {
        let err = ValidationError::MissingFields {
            path: PathBuf::from("artifacts/proj2/meta.json"),
            fields: vec![RequiredField::Description, RequiredField::CreatedAt],
        };
        assert_eq!(
            err.to_string(),
            "artifacts/proj2/meta.json: Missing required fields: description, createdAt"
        );
        assert!(!err.is_warning());
    }

    #[test]
    fn test_duplicate_is_warning() {
        let err = ValidationError::DuplicateId {
            path: PathBuf::from("b/meta.json"),
            id: "a".to_string(),
            previous: PathBuf::from("a/meta.json"),
        };
        assert!(err.is_warning());
        assert_eq!(err.path(), Path::new("b/meta.json"));
    }
}
