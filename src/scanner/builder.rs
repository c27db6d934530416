//! Catalog builder for one project's conversation logs.
//!
//! # Error Handling Strategy
//!
//! - **Data-shape problems**: Malformed lines are skipped by the parser and
//!   unsupported events are rejected by the classifier. Both are counted in the
//!   catalog statistics and never fail a build.
//! - **Environment failures**: A missing project or an unreadable log file is a
//!   [`CatalogError`]. [`build_catalog`] stops at the first one; callers that
//!   prefer a partial catalog drive [`CatalogBuilder`] file by file instead.
//! - **Atomic files**: A log file contributes events only if it was read to the
//!   end, so a failed file leaves the builder unchanged.

use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{CatalogError, Result};
use crate::models::{CatalogStats, FileEvent, ProjectCatalog, ProjectInfo};
use crate::parsers::LogRecordReader;
use crate::scanner::classifier::{EventClassifier, Rejection};
use crate::scanner::reconciler::VersionReconciler;
use crate::utils::open_no_follow;

/// Incremental Parser → Classifier → Reconciler pipeline
#[derive(Debug)]
pub struct CatalogBuilder {
    project: String,
    classifier: EventClassifier,
    reconciler: VersionReconciler,
    stats: CatalogStats,
}

impl CatalogBuilder {
    /// Start a catalog; `root` is the declared project root used for path normalization
    pub fn new(project: impl Into<String>, root: Option<PathBuf>) -> Self {
        Self {
            project: project.into(),
            classifier: EventClassifier::new(root),
            reconciler: VersionReconciler::new(),
            stats: CatalogStats::default(),
        }
    }

    /// Scan one log file; the conversation id defaults to the file stem
    pub fn add_log_file(&mut self, path: &Path) -> Result<()> {
        let file = open_no_follow(path).map_err(|e| CatalogError::unreadable(path, e))?;
        let conversation_id =
            path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();

        self.add_reader(BufReader::new(file), &path.display().to_string(), &conversation_id)
            .map_err(|e| CatalogError::unreadable(path, e))
    }

    /// Scan records from any buffered reader
    ///
    /// Events from the reader are committed only once it has been read to the end.
    pub fn add_reader<R: BufRead>(
        &mut self,
        reader: R,
        source: &str,
        conversation_id: &str,
    ) -> io::Result<()> {
        let mut records = LogRecordReader::new(reader, source, conversation_id);
        let mut events: Vec<FileEvent> = Vec::new();
        let mut parsed = 0;
        let mut rejected = 0;

        for record in records.by_ref() {
            let record = record?;
            parsed += 1;

            match self.classifier.classify(&record) {
                Ok(event) => events.push(event),
                Err(Rejection::NotFileOperation) => {}
                Err(rejection) => {
                    rejected += 1;
                    debug!(source, "Rejected record: {}", rejection);
                }
            }
        }

        let skipped = records.skipped_lines();
        if skipped > 0 {
            debug!(source, skipped, "Skipped malformed lines");
        }

        self.stats.log_files_scanned += 1;
        self.stats.records_parsed += parsed;
        self.stats.skipped_lines += skipped;
        self.stats.rejected_records += rejected;
        self.reconciler.extend(events);
        Ok(())
    }

    /// Finalize into an immutable catalog
    pub fn finish(self) -> ProjectCatalog {
        let event_count = self.reconciler.event_count();
        let chains = self.reconciler.finish();
        let mut stats = self.stats;

        for chain in &chains {
            stats.add_chain(chain);
        }

        info!(
            project = %self.project,
            files = stats.total_files,
            events = event_count,
            skipped = stats.skipped_lines,
            rejected = stats.rejected_records,
            "Built catalog"
        );

        ProjectCatalog::new(self.project, chains, stats)
    }
}

/// Build the catalog of a discovered project using its declared root
///
/// # Errors
///
/// - [`CatalogError::ProjectNotFound`] if the project directory is gone or holds no logs
/// - [`CatalogError::LogFileUnreadable`] for the first log file that cannot be read
pub fn build_catalog(project: &ProjectInfo) -> Result<ProjectCatalog> {
    build_catalog_with_root(project, project.root.clone())
}

/// Like [`build_catalog`], with an explicit project root (or none)
pub fn build_catalog_with_root(
    project: &ProjectInfo,
    root: Option<PathBuf>,
) -> Result<ProjectCatalog> {
    if !project.project_dir.is_dir() || project.log_files.is_empty() {
        return Err(CatalogError::project_not_found(&project.name));
    }

    let mut builder = CatalogBuilder::new(&project.name, root);
    for log_file in &project.log_files {
        builder.add_log_file(log_file)?;
    }
    Ok(builder.finish())
}
