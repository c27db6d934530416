use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

use super::category::FileCategory;
use super::event::FileEvent;

/// All known versions of one file, oldest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionChain {
    path: String,
    versions: Vec<FileEvent>,
}

impl VersionChain {
    /// Build a chain from events already sorted oldest-first
    ///
    /// Returns `None` for an empty list; a chain always holds at least one version.
    pub(crate) fn from_sorted(path: String, versions: Vec<FileEvent>) -> Option<Self> {
        if versions.is_empty() {
            return None;
        }
        Some(Self { path, versions })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// The most recent version
    pub fn current(&self) -> &FileEvent {
        // Non-empty by construction
        &self.versions[self.versions.len() - 1]
    }

    /// Version by index, 0 being the oldest
    pub fn version(&self, index: usize) -> Option<&FileEvent> {
        self.versions.get(index)
    }

    pub fn versions(&self) -> &[FileEvent] {
        &self.versions
    }

    pub fn version_count(&self) -> usize {
        self.versions.len()
    }

    pub fn has_history(&self) -> bool {
        self.versions.len() > 1
    }

    pub fn category(&self) -> FileCategory {
        FileCategory::from_path(&self.path)
    }
}

/// Aggregate statistics of a project catalog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogStats {
    pub total_files: usize,
    /// Sum of the current versions' sizes
    pub total_size_bytes: u64,
    pub by_category: BTreeMap<FileCategory, usize>,
    pub multi_version_files: usize,
    pub log_files_scanned: usize,
    pub records_parsed: usize,
    pub skipped_lines: usize,
    pub rejected_records: usize,
    pub latest_activity: Option<DateTime<Utc>>,
}

impl CatalogStats {
    /// Fold one chain's current version into the file, size and category totals
    pub fn add_chain(&mut self, chain: &VersionChain) {
        let current = chain.current();
        self.total_files += 1;
        self.total_size_bytes += current.size_bytes();
        *self.by_category.entry(chain.category()).or_insert(0) += 1;
        if chain.has_history() {
            self.multi_version_files += 1;
        }
        if current.timestamp > self.latest_activity {
            self.latest_activity = current.timestamp;
        }
    }

    /// Categories ordered by count (descending), ties by category order
    pub fn top_categories(&self) -> Vec<(FileCategory, usize)> {
        let mut counts: Vec<(FileCategory, usize)> =
            self.by_category.iter().map(|(c, n)| (*c, *n)).collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        counts
    }

    /// "3 Python, 2 Markdown, 1 Rust, 4 other" style summary of the top `n` categories
    pub fn category_breakdown(&self, n: usize) -> String {
        let top = self.top_categories();
        let mut parts: Vec<String> =
            top.iter().take(n).map(|(c, count)| format!("{} {}", count, c)).collect();

        let rest: usize = top.iter().skip(n).map(|(_, count)| count).sum();
        if rest > 0 {
            parts.push(format!("{} other", rest));
        }
        parts.join(", ")
    }
}

/// Recoverable files of one project, built fresh on each scan
#[derive(Debug, Clone)]
pub struct ProjectCatalog {
    project: String,
    chains: Vec<VersionChain>,
    index: HashMap<String, usize>,
    stats: CatalogStats,
}

impl ProjectCatalog {
    /// Assemble a catalog; chains are ordered newest current version first, ties by path
    pub(crate) fn new(project: String, mut chains: Vec<VersionChain>, stats: CatalogStats) -> Self {
        chains.sort_by(|a, b| {
            b.current().timestamp.cmp(&a.current().timestamp).then_with(|| a.path().cmp(b.path()))
        });
        let index = chains.iter().enumerate().map(|(i, c)| (c.path().to_string(), i)).collect();
        Self { project, chains, index, stats }
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn files(&self) -> &[VersionChain] {
        &self.chains
    }

    pub fn get(&self, path: &str) -> Option<&VersionChain> {
        self.index.get(path).map(|&i| &self.chains[i])
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.chains.iter().map(|c| c.path())
    }

    pub fn stats(&self) -> &CatalogStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::models::OperationKind;

    fn event(path: &str, content: &str, secs: i64) -> FileEvent {
        FileEvent {
            path: path.to_string(),
            content: content.to_string(),
            kind: OperationKind::Write,
            timestamp: Some(Utc.timestamp_opt(secs, 0).unwrap()),
            conversation_id: "conv".to_string(),
        }
    }

    #[test]
    fn test_chain_rejects_empty() {
        assert!(VersionChain::from_sorted("a.py".to_string(), Vec::new()).is_none());
    }

    #[test]
    fn test_chain_accessors() {
        let chain = VersionChain::from_sorted(
            "a.py".to_string(),
            vec![event("a.py", "v1", 1), event("a.py", "v2", 2)],
        )
        .unwrap();

        assert_eq!(chain.current().content, "v2");
        assert_eq!(chain.version(0).unwrap().content, "v1");
        assert!(chain.version(2).is_none());
        assert_eq!(chain.version_count(), 2);
        assert!(chain.has_history());
    }

    #[test]
    fn test_catalog_orders_newest_first_and_indexes_by_path() {
        let old = VersionChain::from_sorted("old.md".to_string(), vec![event("old.md", "x", 1)])
            .unwrap();
        let new = VersionChain::from_sorted("new.md".to_string(), vec![event("new.md", "y", 5)])
            .unwrap();

        let catalog = ProjectCatalog::new("demo".to_string(), vec![old, new], CatalogStats::default());

        let paths: Vec<&str> = catalog.paths().collect();
        assert_eq!(paths, vec!["new.md", "old.md"]);
        assert_eq!(catalog.get("old.md").unwrap().current().content, "x");
        assert!(catalog.get("missing.md").is_none());
    }

    #[test]
    fn test_category_breakdown() {
        let mut stats = CatalogStats::default();
        stats.by_category.insert(FileCategory::Python, 5);
        stats.by_category.insert(FileCategory::Markdown, 3);
        stats.by_category.insert(FileCategory::Rust, 3);
        stats.by_category.insert(FileCategory::Other, 1);
        stats.by_category.insert(FileCategory::Json, 1);

        assert_eq!(stats.category_breakdown(3), "5 Python, 3 Markdown, 3 Rust, 2 other");
        assert_eq!(stats.category_breakdown(10), "5 Python, 3 Markdown, 3 Rust, 1 JSON, 1 Other");
    }

    #[test]
    fn test_add_chain_accumulates_totals() {
        let app = VersionChain::from_sorted(
            "app.py".to_string(),
            vec![event("app.py", "v1", 1), event("app.py", "v22", 7)],
        )
        .unwrap();
        let util = VersionChain::from_sorted("util.py".to_string(), vec![event("util.py", "u", 3)])
            .unwrap();
        let readme = VersionChain::from_sorted("README.md".to_string(), vec![event("README.md", "#", 2)])
            .unwrap();

        let mut stats = CatalogStats::default();
        for chain in [&readme, &app, &util] {
            stats.add_chain(chain);
        }

        assert_eq!(stats.total_files, 3);
        assert_eq!(stats.total_size_bytes, 5);
        assert_eq!(stats.multi_version_files, 1);
        assert_eq!(stats.by_category.get(&FileCategory::Python), Some(&2));
        assert_eq!(stats.latest_activity, Some(Utc.timestamp_opt(7, 0).unwrap()));
        assert_eq!(stats.category_breakdown(3), "2 Python, 1 Markdown");
    }
}
