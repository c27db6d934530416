use crate::utils::strip_ansi_codes;

/// First line of `text`, cut to `max_chars` characters with `...` appended
///
/// Escape sequences are stripped so a preview is always safe to print.
pub fn content_preview(text: &str, max_chars: usize) -> String {
    let first_line = text.lines().next().unwrap_or("");
    let clean = strip_ansi_codes(first_line);

    if clean.chars().count() <= max_chars {
        return clean;
    }

    let mut preview: String = clean.chars().take(max_chars).collect();
    preview.push_str("...");
    preview
}
