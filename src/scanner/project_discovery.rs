use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::warn;
use walkdir::WalkDir;

use crate::error::CatalogError;
use crate::models::ProjectInfo;
use crate::utils::{
    decode_and_validate_path, is_lossless_encoding, project_display_name,
    validate_path_not_symlink,
};

/// Maximum number of projects to process (security: prevent resource exhaustion)
const MAX_PROJECTS: usize = 1000;

/// Maximum number of conversation logs per project (security: prevent resource exhaustion)
const MAX_LOG_FILES_PER_PROJECT: usize = 1000;

const LOG_EXTENSION: &str = "jsonl";

/// Discover all projects in ~/.claude/projects/ and their conversation logs
///
/// Scans the Claude projects directory for project subdirectories, decoding their
/// encoded names back to file system paths and collecting every `*.jsonl`
/// conversation log within each project, sorted by file name. Directories without
/// any log are not projects and are left out. Projects come back sorted by
/// encoded name.
///
/// # Arguments
///
/// * `claude_dir` - Path to the ~/.claude directory
///
/// # Returns
///
/// Returns a Vec of [`ProjectInfo`] containing decoded paths and log file locations.
/// Returns an empty Vec if the projects directory doesn't exist (not an error).
///
/// # Errors
///
/// Returns an error if:
/// - The projects directory exists but cannot be read
/// - A directory entry cannot be accessed
/// - More than [`MAX_PROJECTS`] (1000) projects are found (security: resource exhaustion)
/// - A project has more than [`MAX_LOG_FILES_PER_PROJECT`] (1000) log files
///
/// Individual project directories with invalid encoded names or read errors are logged
/// as warnings and skipped (graceful degradation).
pub fn discover_projects(claude_dir: &Path) -> Result<Vec<ProjectInfo>> {
    let projects_dir = claude_dir.join("projects");

    // Return empty vec if projects directory doesn't exist
    if !projects_dir.exists() {
        return Ok(Vec::new());
    }

    let mut projects = Vec::new();

    // Iterate through all entries in the projects directory
    let entries = fs::read_dir(&projects_dir)
        .context(format!("Failed to read projects directory: {}", projects_dir.display()))?;

    for entry in entries {
        let entry = entry.context("Failed to read directory entry")?;
        let path = entry.path();

        // Skip if not a directory
        if !path.is_dir() {
            continue;
        }

        // Get the directory name (encoded project path)
        let encoded_name = match path.file_name() {
            Some(name) => name.to_string_lossy().to_string(),
            None => continue,
        };

        // Decode and validate the project path
        let decoded_path = match decode_and_validate_path(&encoded_name) {
            Ok(path) => path,
            Err(e) => {
                warn!("Skipping invalid project directory {}: {}", encoded_name, e);
                continue;
            }
        };

        // Security: Validate project directory is not a symlink
        if let Err(e) = validate_path_not_symlink(&path) {
            warn!("Skipping project directory (symlink not allowed) {}: {}", encoded_name, e);
            continue;
        }

        let log_files = match find_log_files(&path, &encoded_name)? {
            Some(files) => files,
            None => continue,
        };
        if log_files.is_empty() {
            continue;
        }

        // Security: Enforce maximum projects limit
        if projects.len() >= MAX_PROJECTS {
            bail!(
                "Resource limit exceeded: Found more than {} projects. This may indicate a misconfiguration or attack.",
                MAX_PROJECTS
            );
        }

        let root = is_lossless_encoding(&encoded_name).then(|| decoded_path.clone());
        let name = project_display_name(&encoded_name, &decoded_path);

        projects.push(ProjectInfo {
            encoded_name,
            decoded_path,
            project_dir: path,
            name,
            root,
            log_files,
        });
    }

    projects.sort_by(|a, b| a.encoded_name.cmp(&b.encoded_name));
    Ok(projects)
}

/// Collect `*.jsonl` files directly inside a project directory, sorted by name
///
/// Returns `Ok(None)` when the directory cannot be read (logged and skipped).
fn find_log_files(project_dir: &Path, encoded_name: &str) -> Result<Option<Vec<PathBuf>>> {
    let mut log_files = Vec::new();

    for entry in WalkDir::new(project_dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Failed to read project directory {}: {}", project_dir.display(), e);
                return Ok(None);
            }
        };

        let file_path = entry.path();
        if file_path.extension().and_then(|e| e.to_str()) != Some(LOG_EXTENSION) {
            continue;
        }

        // Security: Skip symlinked log files
        if entry.path_is_symlink() {
            warn!("Skipping log file (symlink not allowed) {}", file_path.display());
            continue;
        }
        if !entry.file_type().is_file() {
            continue;
        }

        // Security: Enforce maximum log files per project limit
        if log_files.len() >= MAX_LOG_FILES_PER_PROJECT {
            bail!(
                "Resource limit exceeded: Project {} has more than {} log files",
                encoded_name,
                MAX_LOG_FILES_PER_PROJECT
            );
        }
        log_files.push(file_path.to_path_buf());
    }

    Ok(Some(log_files))
}

/// Resolve a user-supplied project name against discovered projects
///
/// Exact matches on display name or encoded name win; otherwise a single
/// case-insensitive substring match on the display name is accepted.
///
/// # Errors
///
/// [`CatalogError::ProjectNotFound`] when nothing matches or the query is ambiguous.
pub fn find_project<'a>(
    projects: &'a [ProjectInfo],
    query: &str,
) -> Result<&'a ProjectInfo, CatalogError> {
    if let Some(project) =
        projects.iter().find(|p| p.name == query || p.encoded_name == query)
    {
        return Ok(project);
    }

    let lower_query = query.to_lowercase();
    let matches: Vec<&ProjectInfo> =
        projects.iter().filter(|p| p.name.to_lowercase().contains(&lower_query)).collect();

    match matches.as_slice() {
        [only] => Ok(only),
        [] => Err(CatalogError::project_not_found(query)),
        many => {
            let names: Vec<&str> = many.iter().map(|p| p.name.as_str()).collect();
            warn!("Multiple projects match '{}': {}", query, names.join(", "));
            Err(CatalogError::project_not_found(query))
        }
    }
}
