use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectInfo {
    pub encoded_name: String,
    pub decoded_path: PathBuf,
    pub project_dir: PathBuf,
    pub name: String,
    /// Directory file paths are made relative to, when the encoded name is lossless
    pub root: Option<PathBuf>,
    pub log_files: Vec<PathBuf>,
}
