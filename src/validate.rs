//! Metadata validation
//!
//! Turns a decoded [`RawRecord`] into [`ArtifactMeta`] once every required
//! field is present and the artifact's renderable file exists next to it.

use std::path::{Path, PathBuf};

use crate::error::ValidationError;
use crate::record::{ArtifactMeta, RawRecord, RequiredField};

/// Keys derived by the builder; authored values are dropped
const DERIVED_KEYS: [&str; 2] = ["id", "path"];

/// Where a metadata record was found
#[derive(Debug, Clone)]
pub struct RecordLocation {
    /// The metadata file itself
    pub record_path: PathBuf,
    /// Name of the renderable file expected in the same directory
    pub renderable: String,
}

impl RecordLocation {
    pub fn new(record_path: impl Into<PathBuf>, renderable: impl Into<String>) -> Self {
        Self {
            record_path: record_path.into(),
            renderable: renderable.into(),
        }
    }

    /// Directory holding the record
    pub fn dir(&self) -> &Path {
        self.record_path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// Expected location of the renderable file
    pub fn renderable_path(&self) -> PathBuf {
        self.dir().join(&self.renderable)
    }
}

/// Validate one record.
///
/// Required fields are checked first and all missing ones are reported
/// together; the renderable file is only looked for once the fields pass.
pub fn validate(record: RawRecord, location: &RecordLocation) -> Result<ArtifactMeta, ValidationError> {
    let missing: Vec<RequiredField> = RequiredField::ALL
        .into_iter()
        .filter(|field| record.field(*field).map_or(true, str::is_empty))
        .collect();

    if !missing.is_empty() {
        return Err(ValidationError::MissingFields {
            path: location.record_path.clone(),
            fields: missing,
        });
    }

    if !location.renderable_path().is_file() {
        return Err(ValidationError::MissingRenderable {
            path: location.record_path.clone(),
            renderable: location.renderable.clone(),
        });
    }

    let RawRecord {
        title,
        function,
        description,
        created_at,
        tags,
        author,
        source,
        mut extra,
    } = record;

    for key in DERIVED_KEYS {
        extra.remove(key);
    }

    Ok(ArtifactMeta {
        title: title.unwrap_or_default(),
        function: function.unwrap_or_default(),
        description: description.unwrap_or_default(),
        created_at: created_at.unwrap_or_default(),
        tags: tags.unwrap_or_default(),
        author,
        source,
        extra,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn full_record() -> RawRecord {
        RawRecord::from_json(
            r#"{
                "title": "Demo",
                "function": "Engineering",
                "description": "A demo",
                "createdAt": "2024-01-01",
                "id": "spoofed",
                "theme": "dark"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_valid_record() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
        let location = RecordLocation::new(dir.path().join("meta.json"), "index.html");

        let meta = validate(full_record(), &location).unwrap();
        assert_eq!(meta.title, "Demo");
        assert!(meta.tags.is_empty());
        assert!(meta.extra.get("id").is_none());
        assert_eq!(meta.extra.get("theme").and_then(|v| v.as_str()), Some("dark"));
    }

    #[test]
    fn test_every_subset_of_missing_fields_is_reported() {
        let dir = tempdir().unwrap();
        let location = RecordLocation::new(dir.path().join("meta.json"), "index.html");

        for mask in 1u8..16 {
            let mut record = full_record();
            let mut expected = Vec::new();
            for (bit, field) in RequiredField::ALL.into_iter().enumerate() {
                if mask & (1 << bit) == 0 {
                    continue;
                }
                expected.push(field);
                // Alternate between absent and empty
                let blank = if bit % 2 == 0 { None } else { Some(String::new()) };
                match field {
                    RequiredField::Title => record.title = blank,
                    RequiredField::Function => record.function = blank,
                    RequiredField::Description => record.description = blank,
                    RequiredField::CreatedAt => record.created_at = blank,
                }
            }

            match validate(record, &location) {
                Err(ValidationError::MissingFields { fields, .. }) => assert_eq!(fields, expected),
                other => panic!("Expected MissingFields for mask {mask}, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_missing_renderable() {
        let dir = tempdir().unwrap();
        let location = RecordLocation::new(dir.path().join("meta.json"), "index.html");

        let err = validate(full_record(), &location).unwrap_err();
        assert!(matches!(err, ValidationError::MissingRenderable { .. }));
    }

    #[test]
    fn test_renderable_must_be_a_file() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("index.html")).unwrap();
        let location = RecordLocation::new(dir.path().join("meta.json"), "index.html");

        assert!(validate(full_record(), &location).is_err());
    }
}
