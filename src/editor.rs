//! Launching the configured editor on a selected entry.

use crate::config::EditorConfig;
use crate::error::{NgpError, Result};
use std::process::Command;

/// Escape `/` and `'` so the pattern can sit inside the editor template's search slot.
pub fn sanitize_pattern(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    for ch in pattern.chars() {
        if ch == '/' || ch == '\'' {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// `\c` (vim's inline case-insensitive marker) when the search was case-insensitive, empty
/// otherwise.
fn case_insensitive_suffix(case_insensitive: bool) -> &'static str {
    if case_insensitive {
        "\\c"
    } else {
        ""
    }
}

/// Substitute the template's four conversion specifiers, in order: `%d` with the line number,
/// then three `%s` with the file path, the sanitized pattern, and the case-insensitive suffix.
fn render_template(template: &str, line_no: u32, path: &str, pattern: &str, suffix: &str) -> String {
    let mut remaining_strings = [path, pattern, suffix].into_iter();
    let mut result = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '%' {
            match chars.peek() {
                Some('d') => {
                    chars.next();
                    result.push_str(&line_no.to_string());
                    continue;
                }
                Some('s') => {
                    chars.next();
                    if let Some(value) = remaining_strings.next() {
                        result.push_str(value);
                    }
                    continue;
                }
                _ => {}
            }
        }
        result.push(c);
    }
    result
}

/// Open `path` at `line_no` in the configured editor, with the search pattern passed through for
/// in-editor highlighting. The editor's exit code is ignored; only a failure to spawn it at all
/// is reported.
pub fn open_entry(
    config: &EditorConfig,
    path: &str,
    line_no: u32,
    pattern: &str,
    case_insensitive: bool,
) -> Result<()> {
    let sanitized = sanitize_pattern(pattern);
    let suffix = case_insensitive_suffix(case_insensitive);
    let command_line = render_template(&config.editor_template, line_no, path, &sanitized, suffix);

    Command::new("sh")
        .arg("-c")
        .arg(&command_line)
        .status()
        .map_err(|e| NgpError::other(format!("failed to launch editor: {e}")))?;
    Ok(())
}
