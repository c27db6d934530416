use std::borrow::Cow;
use std::env;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};

// Define characters to percent-encode (everything except alphanumeric and safe chars)
const ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b':')
    .add(b'@')
    .add(b'[')
    .add(b']')
    .add(b'!');

/// Encodes a file system path into Claude's project directory format using percent encoding
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use claude_file_recovery::encode_path;
///
/// let path = PathBuf::from("/Users/foo/bar");
/// assert_eq!(encode_path(&path), "-Users%2Ffoo%2Fbar");
/// ```
pub fn encode_path(path: &Path) -> String {
    let path_str = path.to_string_lossy();
    // Strip leading slash to avoid encoding it
    let without_leading_slash = path_str.strip_prefix('/').unwrap_or(&path_str);
    let encoded = utf8_percent_encode(without_leading_slash, ENCODE_SET).to_string();
    // Prepend hyphen to match Claude's format
    format!("-{}", encoded)
}

/// Decodes Claude's project directory format back to a file system path
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use claude_file_recovery::decode_path;
///
/// let encoded = "-Users%2Ffoo%2Fbar";
/// assert_eq!(decode_path(encoded), PathBuf::from("/Users/foo/bar"));
/// ```
pub fn decode_path(encoded: &str) -> PathBuf {
    // Remove leading hyphen
    let without_prefix = encoded.strip_prefix('-').unwrap_or(encoded);

    // Percent-decode the string (avoiding double allocation)
    let decoded = percent_decode_str(without_prefix).decode_utf8_lossy();
    let decoded_str = match decoded {
        Cow::Borrowed(s) => s,
        Cow::Owned(ref s) => s.as_str(),
    };

    // Add back the leading slash for absolute paths
    PathBuf::from(format!("/{}", decoded_str))
}

/// Validates that a decoded path is safe and doesn't contain path traversal sequences
///
/// # Errors
///
/// Returns an error if:
/// - The path contains '..' components (path traversal)
/// - The path is not absolute
pub fn validate_decoded_path(path: &Path) -> Result<()> {
    // Check for path traversal via '..' components
    for component in path.components() {
        if component == std::path::Component::ParentDir {
            bail!("Path contains '..' component: {}", path.display());
        }
    }

    // Additional validation: ensure path is absolute
    if !path.is_absolute() {
        bail!("Path must be absolute: {}", path.display());
    }

    Ok(())
}

/// Decodes and validates a path in one operation
///
/// Convenience function that combines [`decode_path`] and [`validate_decoded_path`].
///
/// # Errors
///
/// Returns an error if the decoded path contains path traversal sequences or is not absolute.
pub fn decode_and_validate_path(encoded: &str) -> Result<PathBuf> {
    let decoded = decode_path(encoded);
    validate_decoded_path(&decoded)?;
    Ok(decoded)
}

/// Whether an encoded project name decodes back to its exact original path
///
/// Percent-encoded names (`-Users%2Ffoo%2Fbar`) are lossless. Names in the
/// dash-separated form (`-Users-foo-bar`) cannot tell a path separator from a
/// dash in a directory name.
pub fn is_lossless_encoding(encoded: &str) -> bool {
    encoded.to_ascii_uppercase().contains("%2F")
}

/// Human-readable project name for an encoded project directory
///
/// Lossless names use the last component of the decoded path; dash-separated
/// names use their last dash-separated segment.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use claude_file_recovery::utils::project_display_name;
///
/// assert_eq!(project_display_name("-Users%2Ffoo%2Fbar", Path::new("/Users/foo/bar")), "bar");
/// assert_eq!(project_display_name("-Users-foo-bar", Path::new("/Users-foo-bar")), "bar");
/// ```
pub fn project_display_name(encoded: &str, decoded: &Path) -> String {
    if is_lossless_encoding(encoded) {
        if let Some(name) = decoded.file_name() {
            return name.to_string_lossy().to_string();
        }
    } else if let Some(last) = encoded.rsplit('-').find(|part| !part.is_empty()) {
        return last.to_string();
    }
    encoded.to_string()
}

/// Checks that a path is not itself a symbolic link
///
/// # Errors
///
/// Returns an error if the path's metadata cannot be read or the path is a symlink.
pub fn validate_path_not_symlink(path: &Path) -> Result<()> {
    let metadata = fs::symlink_metadata(path)
        .with_context(|| format!("Failed to read metadata: {}", path.display()))?;

    if metadata.file_type().is_symlink() {
        bail!("Path is a symbolic link: {}", path.display());
    }

    Ok(())
}

/// Opens a file for reading without following a symlink at the final component
///
/// On unix this uses `O_NOFOLLOW`, so a log swapped for a symlink between
/// discovery and opening fails to open instead of being read.
pub fn open_no_follow(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.read(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.custom_flags(libc::O_NOFOLLOW);
    }

    #[cfg(not(unix))]
    {
        if fs::symlink_metadata(path)?.file_type().is_symlink() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("refusing to follow symlink: {}", path.display()),
            ));
        }
    }

    options.open(path)
}

/// Formats a path with ~ substitution for the home directory
///
/// # Examples
///
/// ```no_run
/// use std::path::PathBuf;
/// use claude_file_recovery::format_path_with_tilde;
///
/// let path = PathBuf::from("/Users/alice/Documents");
/// // Returns "~/Documents" if HOME=/Users/alice
/// let formatted = format_path_with_tilde(&path);
/// ```
pub fn format_path_with_tilde(path: &Path) -> String {
    format_path_with_tilde_internal(path, None)
}

/// Internal helper for path formatting with optional home override (for testing)
pub(crate) fn format_path_with_tilde_internal(path: &Path, home_override: Option<&str>) -> String {
    let home_from_env = env::var("HOME").ok();
    let home = home_override.or(home_from_env.as_deref());

    let path_str = path.to_string_lossy();
    if let Some(home) = home
        && path_str.starts_with(home)
    {
        return path_str.replacen(home, "~", 1);
    }

    // Avoid double allocation when converting Cow to String
    match path_str {
        Cow::Borrowed(s) => s.to_string(),
        Cow::Owned(s) => s,
    }
}
