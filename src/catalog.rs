//! The compiled catalog
//!
//! Serialized as a bare JSON array of entries, most recent first.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::OutputFormat;
use crate::error::{CatalogError, Result};
use crate::filter::{self, Query, QueryView, TagStats};
use crate::record::CatalogEntry;

/// Ordered, immutable snapshot of every published artifact
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Wrap entries that are already in catalog order
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CatalogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Distinct categories in catalog order
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for entry in &self.entries {
            let function = entry.meta.function.as_str();
            if !seen.contains(&function) {
                seen.push(function);
            }
        }
        seen
    }

    /// Entries matching `query`, plus tag statistics for display
    pub fn query(&self, query: &Query) -> QueryView<'_> {
        QueryView {
            entries: filter::match_entries(self, query),
            tags: TagStats::compute(self),
        }
    }

    /// Read a catalog file written by [`Catalog::save`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write the catalog, creating parent directories as needed
    pub fn save(&self, path: impl AsRef<Path>, format: OutputFormat) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| CatalogError::io(parent, e))?;
        }
        let content = match format {
            OutputFormat::Pretty => serde_json::to_string_pretty(self)?,
            OutputFormat::Compact => serde_json::to_string(self)?,
        };
        fs::write(path, content).map_err(|e| CatalogError::io(path, e))
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a CatalogEntry;
    type IntoIter = std::slice::Iter<'a, CatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
