//! Command line parsing and `ngprc` configuration loading.
//!
//! [`CliArgs`] is the `clap`-derived surface described in the external interfaces section:
//! `ngp [options] pattern [directory-or-file]`. [`EditorConfig`] is loaded separately from
//! `/etc/ngprc` then `./ngprc`, and supplies the editor command template plus the special-file
//! and extension lists that seed [`crate::model::MainSearchAttributes`].

use crate::error::{NgpError, Result};
use crate::model::MainSearchAttributes;
use clap::Parser;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// `ngp [options] pattern [directory-or-file]`
#[derive(Parser, Debug)]
#[command(
    name = "ngp",
    version,
    about = "Interactive, concurrent recursive source-code grep"
)]
pub struct CliArgs {
    /// Case-insensitive matching.
    #[arg(short = 'i')]
    pub case_insensitive: bool,

    /// Scan every regular file, ignoring extension and special-file filters.
    #[arg(short = 'r')]
    pub raw: bool,

    /// Add an extension to the include list (repeatable).
    #[arg(short = 't', value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Reset the include list to just this extension, clearing special files too.
    #[arg(short = 'o', value_name = "EXT")]
    pub only_extension: Option<String>,

    /// Treat the pattern as a regular expression.
    #[arg(short = 'e')]
    pub regex: bool,

    /// Follow symbolic links while walking.
    #[arg(short = 'f')]
    pub follow_symlinks: bool,

    /// Exclude a directory (by path) from traversal; repeatable.
    #[arg(short = 'x', value_name = "DIR")]
    pub exclude_dirs: Vec<PathBuf>,

    /// Pattern to search for.
    pub pattern: String,

    /// Root directory or file to search (defaults to `.`).
    pub path: Option<PathBuf>,
}

impl CliArgs {
    /// Resolve the search root, defaulting to `./`.
    pub fn search_root(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| PathBuf::from("./"))
    }
}

/// The resolved editor invocation template plus the config file's special-files/extensions
/// lists.
#[derive(Debug, Clone, Default)]
pub struct EditorConfig {
    /// printf-style template with four conversion specifiers, in order: line number, file
    /// path, sanitized pattern, case-insensitive suffix.
    pub editor_template: String,
    pub special_files: Vec<String>,
    pub extensions: Vec<String>,
}

/// Load `/etc/ngprc` then `./ngprc`, returning the first one found. Failure to find either is
/// a fatal startup misconfiguration.
pub fn load_editor_config() -> Result<EditorConfig> {
    for candidate in [Path::new("/etc/ngprc"), Path::new("./ngprc")] {
        if candidate.is_file() {
            let contents = fs::read_to_string(candidate).map_err(|e| {
                NgpError::config(format!("failed to read {}: {e}", candidate.display()))
            })?;
            return parse_ngprc(&contents, &resolve_editor_basename());
        }
    }
    Err(NgpError::config(
        "no configuration file found (looked for /etc/ngprc and ./ngprc)",
    ))
}

/// The editor basename used to pick the matching template line, from `$EDITOR`, defaulting to
/// `vim`.
fn resolve_editor_basename() -> String {
    env::var("EDITOR")
        .ok()
        .and_then(|editor| {
            Path::new(&editor)
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| "vim".to_string())
}

/// Extract the double-quoted payload of a `;`-bearing configuration line.
fn quoted_payload(line: &str) -> Option<&str> {
    if !line.contains(';') {
        return None;
    }
    let start = line.find('"')?;
    let rest = &line[start + 1..];
    let end = rest.find('"')?;
    Some(&rest[..end])
}

fn parse_ngprc(contents: &str, editor_basename: &str) -> Result<EditorConfig> {
    let mut config = EditorConfig::default();

    for line in contents.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let Some(payload) = quoted_payload(trimmed) else {
            continue;
        };

        if trimmed.starts_with(editor_basename) {
            config.editor_template = payload.to_string();
        } else if trimmed.contains("files") {
            config.special_files = payload.split_whitespace().map(str::to_string).collect();
        } else if trimmed.contains("extensions") {
            config.extensions = payload.split_whitespace().map(str::to_string).collect();
        }
    }

    if config.editor_template.is_empty() {
        return Err(NgpError::config(format!(
            "no editor command configured for '{editor_basename}'"
        )));
    }

    Ok(config)
}

/// Merge CLI flags and the config file's lists into the attribute set the walker consumes.
pub fn build_attributes(args: &CliArgs, editor_config: &EditorConfig) -> MainSearchAttributes {
    let mut extensions = editor_config.extensions.clone();
    let mut special_files = editor_config.special_files.clone();

    if let Some(only) = &args.only_extension {
        extensions = vec![only.clone()];
        special_files.clear();
    }
    extensions.extend(args.extensions.iter().cloned());

    let exclude_inodes = args
        .exclude_dirs
        .iter()
        .filter_map(|dir| fs::metadata(dir).ok())
        .map(file_inode)
        .collect();

    MainSearchAttributes {
        raw: args.raw,
        follow_symlinks: args.follow_symlinks,
        case_insensitive: args.case_insensitive,
        extensions,
        special_files,
        exclude_inodes,
    }
}

#[cfg(unix)]
fn file_inode(metadata: fs::Metadata) -> u64 {
    use std::os::unix::fs::MetadataExt;
    metadata.ino()
}

#[cfg(not(unix))]
fn file_inode(_metadata: fs::Metadata) -> u64 {
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_editor_template_and_lists() {
        let contents = r#"
            # comment line, ignored
            vim ; "vim -c 'call cursor(%d,0)' '%s' +\"normal! /%s%s\""
            files ; "Makefile makefile CMakeLists.txt"
            extensions ; ".c .h .rs"
        "#;
        let parsed = parse_ngprc(contents, "vim").unwrap();
        assert!(parsed.editor_template.contains("call cursor"));
        assert_eq!(
            parsed.special_files,
            vec!["Makefile", "makefile", "CMakeLists.txt"]
        );
        assert_eq!(parsed.extensions, vec![".c", ".h", ".rs"]);
    }

    #[test]
    fn missing_editor_line_is_an_error() {
        let contents = r#"files ; "Makefile""#;
        let result = parse_ngprc(contents, "vim");
        assert!(result.is_err());
    }

    #[test]
    fn only_extension_resets_includes_and_special_files() {
        let args = CliArgs {
            case_insensitive: false,
            raw: false,
            extensions: vec![".h".to_string()],
            only_extension: Some(".rs".to_string()),
            regex: false,
            follow_symlinks: false,
            exclude_dirs: vec![],
            pattern: "pat".to_string(),
            path: None,
        };
        let editor_config = EditorConfig {
            editor_template: "vim %d %s".to_string(),
            special_files: vec!["Makefile".to_string()],
            extensions: vec![".c".to_string()],
        };
        let attrs = build_attributes(&args, &editor_config);
        assert_eq!(attrs.extensions, vec![".rs", ".h"]);
        assert!(attrs.special_files.is_empty());
    }

    #[test]
    fn search_root_defaults_to_current_directory() {
        let args = CliArgs {
            case_insensitive: false,
            raw: false,
            extensions: vec![],
            only_extension: None,
            regex: false,
            follow_symlinks: false,
            exclude_dirs: vec![],
            pattern: "pat".to_string(),
            path: None,
        };
        assert_eq!(args.search_root(), PathBuf::from("./"));
    }
}
