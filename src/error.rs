//! Environment failures surfaced by catalog building.
//!
//! Data-shape problems in the logs never show up here: malformed lines are
//! skipped and unsupported events are rejected during the scan.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Project not found or has no conversation logs: {project}")]
    ProjectNotFound { project: String },

    #[error("Failed to read log file {}: {source}", .path.display())]
    LogFileUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CatalogError {
    pub fn project_not_found(project: impl Into<String>) -> Self {
        CatalogError::ProjectNotFound { project: project.into() }
    }

    pub fn unreadable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CatalogError::LogFileUnreadable { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
