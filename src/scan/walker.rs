//! The directory walker: recursive traversal with the include/exclude rules of section 4.5.

use crate::error::Result;
use crate::model::MainSearchAttributes;
use std::fs;
use std::path::Path;

const SKIPPED_DIR_NAMES: [&str; 2] = [".git", ".svn"];

/// Walk `root` (a file or directory), calling `submit` for every admissible file, in
/// lexicographic order within each directory for deterministic results.
pub fn walk_tree(root: &Path, attrs: &MainSearchAttributes, submit: &mut dyn FnMut(&Path)) -> Result<()> {
    let metadata = fs::symlink_metadata(root)?;
    if metadata.is_file() {
        if is_admissible_file(root, attrs) {
            submit(root);
        }
        return Ok(());
    }
    walk_dir(root, attrs, submit)
}

fn walk_dir(dir: &Path, attrs: &MainSearchAttributes, submit: &mut dyn FnMut(&Path)) -> Result<()> {
    let mut entries: Vec<_> = match fs::read_dir(dir) {
        Ok(iter) => iter.filter_map(std::result::Result::ok).collect(),
        Err(_) => return Ok(()),
    };
    entries.sort_by_key(std::fs::DirEntry::file_name);

    for entry in entries {
        let path = entry.path();
        let name = entry.file_name();
        let name_str = name.to_string_lossy();

        if SKIPPED_DIR_NAMES.contains(&name_str.as_ref()) {
            continue;
        }

        let Ok(file_type) = entry.file_type() else {
            continue;
        };

        if file_type.is_symlink() {
            if !attrs.follow_symlinks {
                continue;
            }
            match fs::metadata(&path) {
                Ok(meta) if meta.is_dir() => {
                    if !is_excluded(&path, attrs) {
                        walk_dir(&path, attrs, submit)?;
                    }
                }
                Ok(meta) if meta.is_file() && is_admissible_file(&path, attrs) => submit(&path),
                _ => {}
            }
            continue;
        }

        if file_type.is_dir() {
            if !is_excluded(&path, attrs) {
                walk_dir(&path, attrs, submit)?;
            }
        } else if file_type.is_file() && is_admissible_file(&path, attrs) {
            submit(&path);
        }
    }

    Ok(())
}

fn is_admissible_file(path: &Path, attrs: &MainSearchAttributes) -> bool {
    if attrs.raw {
        return true;
    }

    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        if attrs.special_files.iter().any(|special| special == name) {
            return true;
        }
    }

    path.to_str()
        .is_some_and(|name| attrs.extensions.iter().any(|ext| name.ends_with(ext.as_str())))
}

fn is_excluded(path: &Path, attrs: &MainSearchAttributes) -> bool {
    if attrs.exclude_inodes.is_empty() {
        return false;
    }
    fs::metadata(path)
        .map(|meta| attrs.exclude_inodes.contains(&inode_of(&meta)))
        .unwrap_or(false)
}

#[cfg(unix)]
fn inode_of(metadata: &fs::Metadata) -> u64 {
    use std::os::unix::fs::MetadataExt;
    metadata.ino()
}

#[cfg(not(unix))]
fn inode_of(_metadata: &fs::Metadata) -> u64 {
    0
}
