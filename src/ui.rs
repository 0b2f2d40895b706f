//! Terminal UI: a cooperative, single-threaded reader of the result store.
//!
//! The UI periodically redraws and polls for input (see [`terminal::TerminalUi`]); it never
//! mutates a [`crate::model::Search`] itself except for its own `cursor`/`index` fields. The only
//! cross-thread coordination it performs is locking the same mutex the collator writes through.

pub mod terminal;
pub mod theme;

use crate::model::{Entry, Search};

/// One interpreted input event, independent of the key that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    CursorUp,
    CursorDown,
    PageUp,
    PageDown,
    /// Open the highlighted entry's file in the editor.
    Confirm,
    /// Enter narrow-search prompt mode.
    StartSubsearch,
    /// Narrow-search pattern confirmed with Enter.
    SubmitSubsearch(String),
    /// Narrow-search prompt dismissed with Escape.
    CancelSubsearch,
    /// `q`: pop the subsearch stack, or quit at the root.
    Quit,
    Resize,
}

/// Render the status line: `"<pattern> | <position>%"`, or the live narrow-search prompt while
/// one is open.
pub fn format_status_line(search: &Search, prompt: Option<&str>) -> String {
    if let Some(prompt) = prompt {
        return format!("/{prompt}");
    }

    let position = if search.is_empty() {
        100
    } else {
        ((search.index + 1) * 100 / search.len()).min(100)
    };

    format!("{} | {position}%", search.pattern)
}

/// Entries currently in the viewport, paired with their absolute index for highlighting.
pub fn visible_entries(search: &Search, height: usize) -> Vec<(usize, &Entry)> {
    let start = search.cursor.min(search.len());
    let end = (start + height).min(search.len());
    (start..end).filter_map(|i| search.get(i).map(|entry| (i, entry))).collect()
}
