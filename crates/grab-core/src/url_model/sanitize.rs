//! Filesystem-safe filename cleanup.

/// Linux NAME_MAX, in bytes.
const NAME_MAX: usize = 255;

/// Makes a URL-derived name safe to create in the current directory.
///
/// Path separators, NUL, control characters and whitespace become `_` (runs
/// collapse to one). Leading and trailing dots and underscores are stripped so
/// the result can never be `.`/`..` or a hidden file. Output is cut to
/// NAME_MAX bytes on a char boundary.
pub fn sanitize_filename_for_linux(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        let unsafe_char = matches!(c, '/' | '\\' | '\0') || c.is_control() || c.is_whitespace();
        if !unsafe_char {
            out.push(c);
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_');
    let mut end = trimmed.len().min(NAME_MAX);
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    trimmed[..end].to_string()
}
