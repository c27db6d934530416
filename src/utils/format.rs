/// Human-readable byte size: `512B`, `1.5KB`, `2.0MB`
///
/// # Examples
///
/// ```
/// use claude_file_recovery::utils::format_size;
///
/// assert_eq!(format_size(1024), "1.0KB");
/// ```
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;

    if bytes < KB {
        format!("{}B", bytes)
    } else if bytes < MB {
        format!("{:.1}KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1}MB", bytes as f64 / MB as f64)
    }
}
