pub mod environment;
pub mod format;
pub mod paths;
pub mod terminal;

pub use environment::get_claude_dir;
pub use format::format_size;
pub use paths::{
    decode_and_validate_path, decode_path, encode_path, format_path_with_tilde,
    is_lossless_encoding, open_no_follow, project_display_name, validate_decoded_path,
    validate_path_not_symlink,
};
pub use terminal::{sanitize_line, strip_ansi_codes};
