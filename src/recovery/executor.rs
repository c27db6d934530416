//! Recovery executor.
//!
//! Existing targets are never overwritten silently: they are skipped unless the
//! recovery allows overwrites, and with backups enabled the previous content is
//! copied to `<name>.backup` before the new content is written. Symlinked
//! targets are refused.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::models::FileEvent;
use crate::recovery::targets::{Layout, target_path};

const BACKUP_SUFFIX: &str = ".backup";

/// Outcome of recovering one file version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryResult {
    /// Normalized path of the recovered event
    pub source_path: String,
    pub target_path: PathBuf,
    pub size_bytes: u64,
    pub success: bool,
    pub error: Option<String>,
    /// The target existed before recovery started
    pub existed: bool,
    pub backup_path: Option<PathBuf>,
}

impl RecoveryResult {
    fn new(event: &FileEvent, target_path: PathBuf, existed: bool) -> Self {
        Self {
            source_path: event.path.clone(),
            target_path,
            size_bytes: event.size_bytes(),
            success: false,
            error: None,
            existed,
            backup_path: None,
        }
    }

    pub fn backup_created(&self) -> bool {
        self.backup_path.is_some()
    }
}

/// Writes chosen file versions to disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileRecovery {
    pub create_backups: bool,
    pub overwrite: bool,
}

impl Default for FileRecovery {
    fn default() -> Self {
        Self { create_backups: true, overwrite: false }
    }
}

impl FileRecovery {
    pub fn new(create_backups: bool, overwrite: bool) -> Self {
        Self { create_backups, overwrite }
    }

    /// Write one version to `target`
    ///
    /// Failures are reported in the result, never returned as errors, so a batch
    /// keeps going past a single bad target.
    pub fn recover_file(&self, event: &FileEvent, target: &Path) -> RecoveryResult {
        let existed = fs::symlink_metadata(target).is_ok();
        let mut result = RecoveryResult::new(event, target.to_path_buf(), existed);

        if existed && !self.overwrite {
            result.error = Some("Target exists; overwrite not allowed".to_string());
            debug!(target = %target.display(), "Skipped existing target");
            return result;
        }

        match self.write_target(event, target, existed) {
            Ok(backup_path) => {
                result.success = true;
                result.backup_path = backup_path;
                info!(target = %target.display(), bytes = result.size_bytes, "Recovered file");
            }
            Err(e) => {
                warn!(target = %target.display(), "Recovery failed: {}", e);
                result.error = Some(e.to_string());
            }
        }
        result
    }

    /// Recover every event into `target_dir` (or back to its own path)
    pub fn recover_files<'a, I>(
        &self,
        events: I,
        target_dir: Option<&Path>,
        root: Option<&Path>,
        layout: Layout,
    ) -> Vec<RecoveryResult>
    where
        I: IntoIterator<Item = &'a FileEvent>,
    {
        events
            .into_iter()
            .map(|event| {
                let target = target_path(event, target_dir, root, layout);
                self.recover_file(event, &target)
            })
            .collect()
    }

    fn write_target(
        &self,
        event: &FileEvent,
        target: &Path,
        existed: bool,
    ) -> io::Result<Option<PathBuf>> {
        if let Some(parent) = target.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        if existed && fs::symlink_metadata(target)?.file_type().is_symlink() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Refusing to write through symlink: {}", target.display()),
            ));
        }

        let backup_path = if existed && self.create_backups {
            let backup = backup_path(target);
            fs::copy(target, &backup)?;
            debug!(backup = %backup.display(), "Created backup");
            Some(backup)
        } else {
            None
        };

        fs::write(target, &event.content)?;
        Ok(backup_path)
    }
}

/// `<name>.backup` next to the target
pub fn backup_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(BACKUP_SUFFIX);
    target.with_file_name(name)
}

/// One planned write, as shown by a dry run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedRecovery {
    pub source_path: String,
    pub target_path: PathBuf,
    pub size_bytes: u64,
    pub exists: bool,
}

/// Compute targets without touching the filesystem beyond existence checks
pub fn plan_recovery<'a, I>(
    events: I,
    target_dir: Option<&Path>,
    root: Option<&Path>,
    layout: Layout,
) -> Vec<PlannedRecovery>
where
    I: IntoIterator<Item = &'a FileEvent>,
{
    events
        .into_iter()
        .map(|event| {
            let target = target_path(event, target_dir, root, layout);
            PlannedRecovery {
                source_path: event.path.clone(),
                exists: fs::symlink_metadata(&target).is_ok(),
                target_path: target,
                size_bytes: event.size_bytes(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::models::OperationKind;

    fn event(path: &str, content: &str) -> FileEvent {
        FileEvent {
            path: path.to_string(),
            content: content.to_string(),
            kind: OperationKind::Write,
            timestamp: None,
            conversation_id: "conv".to_string(),
        }
    }

    #[test]
    fn test_writes_new_file_with_parents() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("a/b/c.py");

        let result = FileRecovery::default().recover_file(&event("c.py", "print(1)"), &target);

        assert!(result.success);
        assert!(!result.existed);
        assert!(!result.backup_created());
        assert_eq!(fs::read_to_string(&target).unwrap(), "print(1)");
    }

    #[test]
    fn test_existing_target_skipped_without_overwrite() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("c.py");
        fs::write(&target, "original").unwrap();

        let result = FileRecovery::default().recover_file(&event("c.py", "new"), &target);

        assert!(!result.success);
        assert!(result.existed);
        assert!(result.error.is_some());
        assert_eq!(fs::read_to_string(&target).unwrap(), "original");
    }

    #[test]
    fn test_overwrite_creates_backup() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("c.py");
        fs::write(&target, "original").unwrap();

        let result = FileRecovery::new(true, true).recover_file(&event("c.py", "new"), &target);

        assert!(result.success);
        let backup = dir.path().join("c.py.backup");
        assert_eq!(result.backup_path, Some(backup.clone()));
        assert_eq!(fs::read_to_string(&backup).unwrap(), "original");
        assert_eq!(fs::read_to_string(&target).unwrap(), "new");
    }

    #[test]
    fn test_overwrite_without_backup() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("Makefile");
        fs::write(&target, "old").unwrap();

        let result = FileRecovery::new(false, true).recover_file(&event("Makefile", "new"), &target);

        assert!(result.success);
        assert!(!result.backup_created());
        assert!(!dir.path().join("Makefile.backup").exists());
        assert_eq!(fs::read_to_string(&target).unwrap(), "new");
    }

    #[test]
    #[cfg(unix)]
    fn test_symlink_target_is_refused() {
        let dir = TempDir::new().unwrap();
        let outside = dir.path().join("outside.txt");
        fs::write(&outside, "keep").unwrap();
        let target = dir.path().join("link.txt");
        std::os::unix::fs::symlink(&outside, &target).unwrap();

        let result = FileRecovery::new(false, true).recover_file(&event("link.txt", "x"), &target);

        assert!(!result.success);
        assert_eq!(fs::read_to_string(&outside).unwrap(), "keep");
    }

    #[test]
    fn test_recover_files_into_target_dir() {
        let dir = TempDir::new().unwrap();
        let events = [event("src/a.py", "a"), event("docs/b.md", "b")];

        let results =
            FileRecovery::default().recover_files(&events, Some(dir.path()), None, Layout::Preserve);

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.success));
        assert_eq!(fs::read_to_string(dir.path().join("src/a.py")).unwrap(), "a");
        assert_eq!(fs::read_to_string(dir.path().join("docs/b.md")).unwrap(), "b");
    }

    #[test]
    fn test_plan_recovery_does_not_write() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.md"), "existing").unwrap();
        let events = [event("src/a.py", "a"), event("docs/b.md", "b")];

        let plan = plan_recovery(&events, Some(dir.path()), None, Layout::Flat);

        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].target_path, dir.path().join("a.py"));
        assert!(!plan[0].exists);
        assert!(plan[1].exists);
        assert!(!dir.path().join("a.py").exists());
    }

    #[test]
    fn test_backup_path_appends_suffix() {
        assert_eq!(backup_path(Path::new("/x/y.tar.gz")), PathBuf::from("/x/y.tar.gz.backup"));
        assert_eq!(backup_path(Path::new("Makefile")), PathBuf::from("Makefile.backup"));
    }
}
