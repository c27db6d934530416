use std::path::{Component, Path, PathBuf};

use crate::models::FileEvent;

/// Directory names treated as the start of a project tree when recovering
/// absolute paths into a target directory
const RECOVERY_INDICATORS: &[&str] = &["src", "lib", "app", ".claude", "tests", "docs"];

/// Fallback name for paths without a single normal component
const UNNAMED_FILE: &str = "unnamed";

/// How recovered files are laid out inside a target directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Keep the file's relative directory structure
    #[default]
    Preserve,
    /// Put every file directly in the target directory
    Flat,
}

/// Where `event` should be written
///
/// Without a target directory the file goes back to its own path, resolved
/// against `root` when relative. With a target directory the result is always
/// inside it: only normal path components are ever joined.
pub fn target_path(
    event: &FileEvent,
    target_dir: Option<&Path>,
    root: Option<&Path>,
    layout: Layout,
) -> PathBuf {
    let path = Path::new(&event.path);

    let Some(target_dir) = target_dir else {
        return match root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        };
    };

    let parts = normal_components(path);
    let relative: PathBuf = match layout {
        Layout::Flat => parts.last().map(PathBuf::from).unwrap_or_default(),
        Layout::Preserve if path.is_relative() => parts.iter().collect(),
        Layout::Preserve => shorten_absolute(&parts),
    };

    if relative.as_os_str().is_empty() {
        target_dir.join(UNNAMED_FILE)
    } else {
        target_dir.join(relative)
    }
}

/// Cut an absolute path at the parent of its first project indicator, or keep
/// only the file name
fn shorten_absolute(parts: &[&str]) -> PathBuf {
    match parts.iter().position(|p| RECOVERY_INDICATORS.contains(p)) {
        Some(i) => parts[i.saturating_sub(1)..].iter().collect(),
        None => parts.last().map(PathBuf::from).unwrap_or_default(),
    }
}

fn normal_components(path: &Path) -> Vec<&str> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect()
}
