//! Catalog Builder
//!
//! Walks the artifact root for metadata records, validates each one and
//! compiles the survivors into a [`Catalog`] ordered newest first.
//!
//! Directory layout (nesting depth is free):
//!
//! ```text
//! artifacts/
//! ├── proj1/
//! │   ├── meta.json
//! │   └── index.html
//! └── team/
//!     └── dashboard/
//!         ├── meta.json
//!         └── index.html
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use crate::catalog::Catalog;
use crate::config::OutputFormat;
use crate::error::{CatalogError, Result, ValidationError};
use crate::record::{CatalogEntry, RawRecord};
use crate::validate::{validate, RecordLocation};

/// Knobs for a build
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// File name of per-artifact metadata records
    pub metadata_file: String,
    /// File that must accompany each record
    pub renderable_file: String,
    /// URL prefix of the artifact root
    pub public_prefix: String,
    /// Follow symbolic links while walking; unfollowed directory links are reported
    pub follow_links: bool,
    /// Create the root when it is missing (see [`rebuild`])
    pub create_missing_root: bool,
    /// Categories expected in `function`; anything else is logged. Empty disables the check.
    pub known_categories: Vec<String>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            metadata_file: "meta.json".to_string(),
            renderable_file: "index.html".to_string(),
            public_prefix: "/artifacts".to_string(),
            follow_links: true,
            create_missing_root: true,
            known_categories: Vec::new(),
        }
    }
}

/// Outcome of a build: the best-effort catalog and everything that went wrong
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub catalog: Catalog,
    pub errors: Vec<ValidationError>,
}

impl BuildReport {
    /// True when no record was dropped
    pub fn is_clean(&self) -> bool {
        !self.has_failures()
    }

    /// Errors that excluded a record from the catalog
    pub fn failures(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter().filter(|e| !e.is_warning())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter().filter(|e| e.is_warning())
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    pub fn into_parts(self) -> (Catalog, Vec<ValidationError>) {
        (self.catalog, self.errors)
    }
}

/// Build a catalog from `root` with default options
pub fn build(root: impl AsRef<Path>) -> Result<BuildReport> {
    CatalogBuilder::new(root).build()
}

/// Compiles an artifact directory tree into a catalog
pub struct CatalogBuilder {
    root: PathBuf,
    options: BuildOptions,
}

impl CatalogBuilder {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self::with_options(root, BuildOptions::default())
    }

    pub fn with_options(root: impl AsRef<Path>, options: BuildOptions) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            options,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scan, validate and sort.
    ///
    /// A missing root yields an empty catalog. Bad records and unreadable
    /// paths are reported in the returned [`BuildReport`]; only failing to
    /// read the root itself is fatal.
    pub fn build(&self) -> Result<BuildReport> {
        if !self.root.exists() {
            tracing::warn!(root = %self.root.display(), "artifact root does not exist");
            return Ok(BuildReport::default());
        }

        let Discovery { records, mut errors } =
            discover_records(&self.root, &self.options.metadata_file, self.options.follow_links)?;
        tracing::debug!(count = records.len(), "discovered metadata records");

        let mut entries = Entries::default();

        for record_path in records {
            match self.load_entry(&record_path) {
                Ok(entry) => {
                    if let Some(warning) = entries.insert(entry, record_path) {
                        tracing::warn!("{}", warning);
                        errors.push(warning);
                    }
                }
                Err(err) => {
                    tracing::warn!("{}", err);
                    errors.push(err);
                }
            }
        }

        let catalog = Catalog::from_entries(sort_newest_first(entries.into_vec()));
        tracing::info!(
            entries = catalog.len(),
            errors = errors.len(),
            "catalog built"
        );

        Ok(BuildReport { catalog, errors })
    }

    /// Parse, validate and place one record
    fn load_entry(&self, record_path: &Path) -> std::result::Result<CatalogEntry, ValidationError> {
        let malformed = |reason: String| ValidationError::MalformedRecord {
            path: record_path.to_path_buf(),
            reason,
        };

        let content = fs::read_to_string(record_path).map_err(|e| malformed(e.to_string()))?;
        let raw = RawRecord::from_json(&content).map_err(|e| malformed(e.to_string()))?;

        let location = RecordLocation::new(record_path, self.options.renderable_file.as_str());
        let meta = validate(raw, &location)?;

        let id = relative_id(&self.root, location.dir()).ok_or_else(|| {
            ValidationError::UnplacedRecord {
                path: record_path.to_path_buf(),
            }
        })?;

        let known = &self.options.known_categories;
        if !known.is_empty() && !known.contains(&meta.function) {
            tracing::warn!(id = %id, function = %meta.function, "unknown category");
        }

        tracing::debug!(id = %id, "cataloged artifact");
        Ok(CatalogEntry::new(
            id,
            meta,
            &self.options.public_prefix,
            &self.options.renderable_file,
        ))
    }
}

/// Result of walking the artifact root
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    /// Metadata records, in file-name order at each level
    pub records: Vec<PathBuf>,
    /// Paths below the root that could not be walked, and links left alone
    pub errors: Vec<ValidationError>,
}

/// Every metadata record under `root`.
///
/// Returns nothing when `root` does not exist. Only a failure to read the
/// root itself is fatal; a bad path deeper down is reported and skipped.
pub fn discover_records(root: &Path, metadata_file: &str, follow_links: bool) -> Result<Discovery> {
    let mut found = Discovery::default();
    if !root.exists() {
        return Ok(found);
    }

    for entry in WalkDir::new(root)
        .follow_links(follow_links)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => return Err(err.into()),
            Err(err) => {
                let path = err.path().unwrap_or(root).to_path_buf();
                let unreadable = ValidationError::Unreadable {
                    path,
                    reason: err.to_string(),
                };
                tracing::warn!("{}", unreadable);
                found.errors.push(unreadable);
                continue;
            }
        };

        if !follow_links && entry.depth() > 0 && entry.path_is_symlink() {
            if entry.path().is_dir() {
                let skipped = ValidationError::SkippedLink {
                    path: entry.into_path(),
                };
                tracing::warn!("{}", skipped);
                found.errors.push(skipped);
            }
            continue;
        }

        if entry.file_type().is_file() && entry.file_name() == metadata_file {
            found.records.push(entry.into_path());
        }
    }
    Ok(found)
}

/// Rebuild the catalog under `root` and write it to `output`.
///
/// A missing root yields an empty catalog (and is created when the options
/// ask for it). The catalog is written even when records were skipped;
/// callers decide from the report whether that counts as failure.
pub fn rebuild(
    root: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &BuildOptions,
    format: OutputFormat,
) -> Result<BuildReport> {
    let root = root.as_ref();
    if !root.exists() && options.create_missing_root {
        fs::create_dir_all(root).map_err(|e| CatalogError::io(root, e))?;
        tracing::info!(root = %root.display(), "created artifact root");
    }

    let report = CatalogBuilder::with_options(root, options.clone()).build()?;
    report.catalog.save(output, format)?;
    Ok(report)
}

/// `dir` relative to `root`, joined with `/`. `None` for the root itself.
fn relative_id(root: &Path, dir: &Path) -> Option<String> {
    let relative = dir.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Entries keyed by id; a later record with the same id replaces the earlier one
#[derive(Default)]
struct Entries {
    items: Vec<(CatalogEntry, PathBuf)>,
    by_id: HashMap<String, usize>,
}

impl Entries {
    fn insert(&mut self, entry: CatalogEntry, source: PathBuf) -> Option<ValidationError> {
        let existing = self.by_id.get(&entry.id).copied();
        match existing {
            Some(index) => {
                let previous = std::mem::replace(&mut self.items[index], (entry, source));
                let (current, path) = &self.items[index];
                Some(ValidationError::DuplicateId {
                    path: path.clone(),
                    id: current.id.clone(),
                    previous: previous.1,
                })
            }
            None => {
                self.by_id.insert(entry.id.clone(), self.items.len());
                self.items.push((entry, source));
                None
            }
        }
    }

    fn into_vec(self) -> Vec<CatalogEntry> {
        self.items.into_iter().map(|(entry, _)| entry).collect()
    }
}

/// Stable sort on `createdAt`, newest first. Dates that cannot be parsed
/// sort after every parseable one.
fn sort_newest_first(mut entries: Vec<CatalogEntry>) -> Vec<CatalogEntry> {
    for entry in entries.iter().filter(|e| e.created_at().is_none()) {
        tracing::warn!(id = %entry.id, created_at = %entry.meta.created_at, "unrecognized createdAt");
    }
    entries.sort_by_cached_key(|e| std::cmp::Reverse(e.created_at()));
    entries
}
