//! The subsearch stack: narrowing a search's results by layering a new pattern on top.
//!
//! Every level past the root is always a regex (the interactive narrow prompt has no raw-text
//! mode) and filters its parent's lines rather than rescanning any file. Matching is always
//! case-sensitive regardless of the root search's `-i` flag: `original_source/ngp.c`'s
//! `is_regex_valid`/`subsearch` never consult `mainsearch_attr.is_insensitive` when compiling or
//! running a subsearch pattern.

use crate::error::{NgpError, Result};
use crate::model::{Entry, Search};
use parking_lot::Mutex;
use regex::Regex;
use std::sync::Arc;

/// A stack of searches, root first. `current()` is always the top.
pub struct SubsearchStack {
    levels: Vec<Arc<Mutex<Search>>>,
}

impl SubsearchStack {
    pub fn new(root: Arc<Mutex<Search>>) -> Self {
        SubsearchStack { levels: vec![root] }
    }

    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    pub fn current(&self) -> Arc<Mutex<Search>> {
        Arc::clone(self.levels.last().expect("stack always has a root"))
    }

    pub fn at_root(&self) -> bool {
        self.levels.len() == 1
    }

    /// Derive a new search from the current top by keeping only lines matching `pattern`
    /// (compiled as a case-sensitive regex) and the file markers that still have at least one
    /// surviving line. Pushes the derived search and returns it; leaves the stack unchanged on a
    /// bad pattern.
    pub fn push_child(&mut self, pattern: &str) -> Result<Arc<Mutex<Search>>> {
        let regex = build_regex(pattern)?;

        let parent = self.current();
        let parent = parent.lock();
        let mut child = Search::new_derived(pattern.to_string(), true, false);

        let mut pending_file: Option<&str> = None;
        for entry in parent.entries() {
            match entry {
                Entry::FileMarker { path } => pending_file = Some(path.as_str()),
                Entry::LineHit { text, line_no } => {
                    if regex.is_match(text) {
                        if let Some(path) = pending_file.take() {
                            child.append_file(path.to_string());
                        }
                        child.append_line(text.as_bytes(), *line_no);
                    }
                }
            }
        }
        drop(parent);

        let child = Arc::new(Mutex::new(child));
        self.levels.push(Arc::clone(&child));
        Ok(child)
    }

    /// Pop the current level. No-op at the root.
    pub fn pop(&mut self) -> Option<Arc<Mutex<Search>>> {
        if self.at_root() {
            return None;
        }
        self.levels.pop()
    }
}

fn build_regex(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| NgpError::pattern(format!("invalid subsearch pattern: {e}")))
}
