//! Filter engine
//!
//! Pure functions over a [`Catalog`]: free-text search, single category,
//! tag sets with AND semantics, and tag frequency ranking.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;

use serde::Serialize;

use crate::catalog::Catalog;
use crate::record::CatalogEntry;

/// One user interaction's worth of filters. Empty values do not constrain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub search_text: String,
    pub category: Option<String>,
    pub tags: BTreeSet<String>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// True when no clause constrains anything
    pub fn is_unconstrained(&self) -> bool {
        self.search_text.is_empty()
            && self.category.as_deref().map_or(true, str::is_empty)
            && self.tags.is_empty()
    }

    /// Case-insensitive substring match against title or description
    fn text_matches(&self, entry: &CatalogEntry) -> bool {
        if self.search_text.is_empty() {
            return true;
        }
        let needle = self.search_text.to_lowercase();
        entry.meta.title.to_lowercase().contains(&needle)
            || entry.meta.description.to_lowercase().contains(&needle)
    }

    fn category_matches(&self, entry: &CatalogEntry) -> bool {
        match self.category.as_deref() {
            None | Some("") => true,
            Some(category) => entry.meta.function == category,
        }
    }

    fn tags_match(&self, entry: &CatalogEntry) -> bool {
        self.tags.iter().all(|tag| entry.meta.has_tag(tag))
    }
}

/// Whether `entry` passes every clause of `query`
pub fn matches(entry: &CatalogEntry, query: &Query) -> bool {
    query.text_matches(entry) && query.category_matches(entry) && query.tags_match(entry)
}

/// Matching entries, in catalog order
pub fn match_entries<'a>(catalog: &'a Catalog, query: &Query) -> Vec<&'a CatalogEntry> {
    catalog.iter().filter(|entry| matches(entry, query)).collect()
}

/// Number of entries carrying each tag. Repeats inside one entry count once.
pub fn tag_frequencies(catalog: &Catalog) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for entry in catalog {
        let distinct: HashSet<&str> = entry.meta.tags.iter().map(String::as_str).collect();
        for tag in distinct {
            *counts.entry(tag.to_string()).or_insert(0) += 1;
        }
    }
    counts
}

/// Distinct tags, most frequent first, ties in ascending lexicographic order
pub fn rank_tags(catalog: &Catalog) -> Vec<String> {
    ranked(tag_frequencies(catalog))
        .into_iter()
        .map(|t| t.tag)
        .collect()
}

fn ranked(frequencies: BTreeMap<String, usize>) -> Vec<TagCount> {
    let mut tags: Vec<TagCount> = frequencies
        .into_iter()
        .map(|(tag, count)| TagCount { tag, count })
        .collect();
    tags.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
    tags
}

/// A tag and the number of entries carrying it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// Frequency table and ranking for one catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TagStats {
    pub frequencies: BTreeMap<String, usize>,
    pub ranked: Vec<TagCount>,
}

impl TagStats {
    pub fn compute(catalog: &Catalog) -> Self {
        let frequencies = tag_frequencies(catalog);
        let ranked = ranked(frequencies.clone());
        Self { frequencies, ranked }
    }

    pub fn count(&self, tag: &str) -> usize {
        self.frequencies.get(tag).copied().unwrap_or(0)
    }

    /// Ranked tags to offer in a picker.
    ///
    /// `search` narrows by case-insensitive substring; a non-empty search or
    /// `show_all` lifts the `limit` cut line.
    pub fn visible(&self, limit: usize, show_all: bool, search: &str) -> Vec<&TagCount> {
        let needle = search.to_lowercase();
        let narrowed = self
            .ranked
            .iter()
            .filter(|t| needle.is_empty() || t.tag.to_lowercase().contains(&needle));
        if show_all || !needle.is_empty() {
            narrowed.collect()
        } else {
            narrowed.take(limit).collect()
        }
    }
}

/// Result of a query as handed to the presentation layer
#[derive(Debug, Clone, Serialize)]
pub struct QueryView<'a> {
    pub entries: Vec<&'a CatalogEntry>,
    pub tags: TagStats,
}

/// Keeps the last computed [`TagStats`] for as long as the same shared
/// catalog snapshot is asked about.
///
/// Snapshots are immutable, so identity of the `Arc` stands in for content.
/// The cache holds its own handle, so the allocation cannot be reused by a
/// different catalog while cached.
#[derive(Debug, Default)]
pub struct TagStatsCache {
    cached: Option<(Arc<Catalog>, TagStats)>,
}

impl TagStatsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, catalog: &Arc<Catalog>) -> &TagStats {
        let slot = match self.cached.take() {
            Some((cached, stats)) if Arc::ptr_eq(&cached, catalog) => (cached, stats),
            _ => {
                tracing::debug!(entries = catalog.len(), "recomputing tag statistics");
                (Arc::clone(catalog), TagStats::compute(catalog))
            }
        };
        &self.cached.insert(slot).1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ArtifactMeta;

    fn entry(id: &str, title: &str, description: &str, function: &str, tags: &[&str]) -> CatalogEntry {
        let meta = ArtifactMeta {
            title: title.to_string(),
            function: function.to_string(),
            description: description.to_string(),
            created_at: "2024-01-01".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            author: None,
            source: None,
            extra: serde_json::Map::new(),
        };
        CatalogEntry::new(id, meta, "/artifacts", "index.html")
    }

    fn sample() -> Catalog {
        Catalog::from_entries(vec![
            entry("report", "Quarterly Report", "Numbers for Q3", "BD", &["finance", "q3"]),
            entry("demo", "Demo", "An AI demo", "Engineering", &["ai", "demo"]),
            entry("hiring", "Hiring plan", "Headcount and roles", "HR", &["planning"]),
            entry("roadmap", "Roadmap", "AI roadmap for product", "Product", &["ai", "planning"]),
        ])
    }

    fn ids<'a>(entries: &[&'a CatalogEntry]) -> Vec<&'a str> {
        entries.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let catalog = sample();
        let query = Query::new();
        assert!(query.is_unconstrained());
        assert_eq!(match_entries(&catalog, &query).len(), catalog.len());
    }

    #[test]
    fn test_text_search_is_case_insensitive_substring() {
        let catalog = sample();
        let found = match_entries(&catalog, &Query::new().search("quarter"));
        assert_eq!(ids(&found), vec!["report"]);

        // description counts too, and order follows the catalog
        let found = match_entries(&catalog, &Query::new().search("AI"));
        assert_eq!(ids(&found), vec!["demo", "roadmap"]);

        assert!(match_entries(&catalog, &Query::new().search("qtr")).is_empty());
    }

    #[test]
    fn test_category_is_exact() {
        let catalog = sample();
        assert_eq!(ids(&match_entries(&catalog, &Query::new().category("HR"))), vec!["hiring"]);
        assert!(match_entries(&catalog, &Query::new().category("hr")).is_empty());
        assert_eq!(match_entries(&catalog, &Query::new().category("")).len(), 4);
    }

    #[test]
    fn test_tags_require_all() {
        let catalog = Catalog::from_entries(vec![entry("xy", "t", "d", "BD", &["x", "y"])]);
        assert!(match_entries(&catalog, &Query::new().tags(["x", "z"])).is_empty());
        assert_eq!(match_entries(&catalog, &Query::new().tags(["x", "y"])).len(), 1);
        assert_eq!(match_entries(&catalog, &Query::new().tag("y")).len(), 1);
    }

    #[test]
    fn test_clauses_are_conjunctive() {
        let catalog = sample();
        let query = Query::new().search("ai").category("Product").tag("planning");
        assert_eq!(ids(&match_entries(&catalog, &query)), vec!["roadmap"]);

        let query = Query::new().search("ai").category("HR");
        assert!(match_entries(&catalog, &query).is_empty());
    }

    #[test]
    fn test_matching_is_idempotent() {
        let catalog = sample();
        let query = Query::new().search("a").tag("ai");
        assert_eq!(match_entries(&catalog, &query), match_entries(&catalog, &query));
    }

    #[test]
    fn test_tag_frequencies_count_entries() {
        let catalog = Catalog::from_entries(vec![
            entry("one", "t", "d", "BD", &["a"]),
            entry("two", "t", "d", "BD", &["a", "b"]),
            entry("three", "t", "d", "BD", &["b", "b"]),
        ]);
        let counts = tag_frequencies(&catalog);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts["a"], 2);
        assert_eq!(counts["b"], 2);
    }

    #[test]
    fn test_rank_tags_by_count_then_name() {
        let catalog = sample();
        assert_eq!(
            rank_tags(&catalog),
            vec!["ai", "planning", "demo", "finance", "q3"]
        );
        assert_eq!(rank_tags(&catalog), rank_tags(&catalog));
        assert!(rank_tags(&Catalog::default()).is_empty());
    }

    #[test]
    fn test_visible_tags() {
        let stats = TagStats::compute(&sample());
        let names = |tags: Vec<&TagCount>| tags.into_iter().map(|t| t.tag.clone()).collect::<Vec<_>>();

        assert_eq!(names(stats.visible(2, false, "")), vec!["ai", "planning"]);
        assert_eq!(stats.visible(2, true, "").len(), 5);
        assert_eq!(names(stats.visible(1, false, "N")), vec!["planning", "finance"]);
        assert_eq!(stats.count("ai"), 2);
        assert_eq!(stats.count("missing"), 0);
    }

    #[test]
    fn test_query_view() {
        let catalog = sample();
        let view = catalog.query(&Query::new().tag("ai"));
        assert_eq!(ids(&view.entries), vec!["demo", "roadmap"]);
        // statistics describe the whole catalog, not the filtered view
        assert_eq!(view.tags.ranked.len(), 5);
    }

    #[test]
    fn test_cache_follows_snapshot_identity() {
        let mut cache = TagStatsCache::new();
        let catalog = Arc::new(sample());
        assert_eq!(cache.get(&catalog).count("ai"), 2);
        assert!(std::ptr::eq(cache.get(&catalog), cache.get(&catalog)));

        let smaller = Arc::new(Catalog::from_entries(catalog.entries()[..1].to_vec()));
        assert_eq!(cache.get(&smaller).count("ai"), 0);
        assert_eq!(cache.get(&smaller).count("finance"), 1);

        // an equal but distinct snapshot is recomputed, not confused
        let rebuilt = Arc::new(sample());
        assert_eq!(cache.get(&rebuilt).count("ai"), 2);
    }
}
