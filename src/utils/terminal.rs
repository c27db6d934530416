//! Terminal output sanitization
//!
//! Paths and content previews come straight from conversation logs, which may
//! hold escape sequences able to clear the screen, move the cursor, retitle the
//! window or plant hyperlinks. The CLI passes every log-derived string through
//! [`strip_ansi_codes`] (or [`sanitize_line`] for table cells) before printing.
//! Content printed by `show` or written by `recover` is left untouched.

const ESC: char = '\x1b';
const BEL: char = '\x07';

/// Strips escape sequences and control characters from a string
///
/// Removes CSI sequences (`ESC [ ... letter`), OSC sequences (`ESC ] ... BEL`
/// or `ESC ] ... ESC \`), any other two-character escape, and control
/// characters except tab, newline and carriage return.
///
/// # Examples
///
/// ```
/// use claude_file_recovery::utils::terminal::strip_ansi_codes;
///
/// let text = "\x1b[31mRed text\x1b[0m";
/// assert_eq!(strip_ansi_codes(text), "Red text");
/// ```
pub fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == ESC {
            match chars.next() {
                // CSI: parameters until a final letter
                Some('[') => {
                    for next in chars.by_ref() {
                        if next.is_ascii_alphabetic() {
                            break;
                        }
                    }
                }
                // OSC: terminated by BEL or ST (ESC \)
                Some(']') => {
                    while let Some(next) = chars.next() {
                        if next == BEL {
                            break;
                        }
                        if next == ESC && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            }
            continue;
        }

        if ch.is_control() && ch != '\t' && ch != '\n' && ch != '\r' {
            continue;
        }

        result.push(ch);
    }

    result
}

/// [`strip_ansi_codes`] for single-line output: line breaks and tabs become spaces
pub fn sanitize_line(text: &str) -> String {
    strip_ansi_codes(text)
        .chars()
        .map(|c| if matches!(c, '\n' | '\r' | '\t') { ' ' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_color_codes() {
        assert_eq!(strip_ansi_codes("\x1b[31mRed text\x1b[0m normal"), "Red text normal");
        assert_eq!(
            strip_ansi_codes("\x1b[1m\x1b[31mBold Red\x1b[0m\x1b[32m Green\x1b[0m"),
            "Bold Red Green"
        );
    }

    #[test]
    fn test_strip_cursor_movement() {
        assert_eq!(strip_ansi_codes("\x1b[2J\x1b[H Cleared screen"), " Cleared screen");
    }

    #[test]
    fn test_strip_osc_title_and_hyperlink() {
        assert_eq!(strip_ansi_codes("\x1b]0;owned\x07title"), "title");
        assert_eq!(
            strip_ansi_codes("\x1b]8;;http://evil\x1b\\click\x1b]8;;\x1b\\"),
            "click"
        );
    }

    #[test]
    fn test_strip_unterminated_sequences() {
        assert_eq!(strip_ansi_codes("tail\x1b["), "tail");
        assert_eq!(strip_ansi_codes("tail\x1b]0;never ends"), "tail");
        assert_eq!(strip_ansi_codes("tail\x1b"), "tail");
    }

    #[test]
    fn test_strip_control_characters() {
        assert_eq!(strip_ansi_codes("Alert! \x07"), "Alert! ");
        assert_eq!(strip_ansi_codes("Test\x08"), "Test");
        assert_eq!(strip_ansi_codes("a\u{0}b"), "ab");
    }

    #[test]
    fn test_keeps_whitespace_and_unicode() {
        assert_eq!(strip_ansi_codes("Line 1\nLine 2\rLine 3\tTabbed"), "Line 1\nLine 2\rLine 3\tTabbed");
        assert_eq!(strip_ansi_codes("Hello 👋 \x1b[31mWorld\x1b[0m 🌍"), "Hello 👋 World 🌍");
        assert_eq!(strip_ansi_codes(""), "");
    }

    #[test]
    fn test_sanitize_line_flattens_breaks() {
        assert_eq!(sanitize_line("src/a\nb.py"), "src/a b.py");
        assert_eq!(sanitize_line("\x1b[31mx\x1b[0m\ty"), "x y");
    }
}
