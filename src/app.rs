//! Application core: wires CLI/config, the scan pipeline, the subsearch stack, and the UI
//! together, and drives the cooperative main loop on the process's initial thread.

use crate::config::{self, CliArgs, EditorConfig};
use crate::editor;
use crate::error::{NgpError, Result};
use crate::matcher::Matcher;
use crate::model::{MainSearchAttributes, Search};
use crate::scan::{walker, Pipeline};
use crate::subsearch::SubsearchStack;
use crate::ui::terminal::{TerminalUi, POLL_INTERVAL};
use crate::ui::UiCommand;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level application state, constructed once from parsed CLI arguments.
pub struct Application {
    pattern: String,
    is_regex: bool,
    search_root: PathBuf,
    attrs: MainSearchAttributes,
    editor_config: EditorConfig,
    ui: TerminalUi,
}

impl Application {
    pub fn new(args: CliArgs) -> Result<Self> {
        let search_root = args.search_root();
        if !search_root.exists() {
            return Err(NgpError::invalid_argument(format!(
                "search root does not exist: {}",
                search_root.display()
            )));
        }

        let editor_config = config::load_editor_config()?;
        let attrs = config::build_attributes(&args, &editor_config);

        log::debug!("starting scan under {}", search_root.display());

        Ok(Application {
            pattern: args.pattern.clone(),
            is_regex: args.regex,
            search_root,
            attrs,
            editor_config,
            ui: TerminalUi::new(),
        })
    }

    /// Run the scan pipeline and the UI loop. Returns once the user quits at the root of the
    /// subsearch stack. Matches the "no attempt to join in-flight workers cleanly" teardown: if
    /// the user quits before the walker finishes, the background threads are simply abandoned
    /// and reclaimed when the process exits.
    pub fn run(&mut self) -> Result<()> {
        let matcher = Matcher::new(&self.pattern, self.is_regex, self.attrs.case_insensitive)?;
        let root = Arc::new(Mutex::new(Search::new_root(
            self.pattern.clone(),
            self.is_regex,
            self.attrs.case_insensitive,
            self.search_root.clone(),
        )));

        spawn_walker_thread(matcher, Arc::clone(&root), self.search_root.clone(), self.attrs.clone());

        let mut stack = SubsearchStack::new(root);
        self.ui.enable()?;
        let result = self.event_loop(&mut stack);
        self.ui.disable()?;
        result
    }

    fn event_loop(&mut self, stack: &mut SubsearchStack) -> Result<()> {
        loop {
            self.ui.render(&stack.current().lock())?;

            let Some(command) = self.ui.poll_command(POLL_INTERVAL)? else {
                continue;
            };

            let height = self.ui.content_height();

            match command {
                UiCommand::CursorDown => move_cursor(stack, 1, height),
                UiCommand::CursorUp => move_cursor(stack, -1, height),
                UiCommand::PageDown => move_cursor(stack, height as i64, height),
                UiCommand::PageUp => move_cursor(stack, -(height as i64), height),
                UiCommand::Resize | UiCommand::StartSubsearch | UiCommand::CancelSubsearch => {}
                UiCommand::SubmitSubsearch(pattern) => {
                    if pattern.is_empty() {
                        continue;
                    }
                    if let Err(err) = stack.push_child(&pattern) {
                        log::warn!("subsearch pattern rejected: {err}");
                    }
                }
                UiCommand::Confirm => self.confirm(stack)?,
                UiCommand::Quit => {
                    if stack.pop().is_none() {
                        return Ok(());
                    }
                }
            }
        }
    }

    fn confirm(&mut self, stack: &SubsearchStack) -> Result<()> {
        let search = stack.current();
        let search = search.lock();

        let index = search.index;
        let Some(entry) = search.get(index) else {
            return Ok(());
        };
        let crate::model::Entry::LineHit { line_no, .. } = entry else {
            return Ok(());
        };
        let Some(path) = search.find_file(index) else {
            return Ok(());
        };

        let path = path.to_string();
        let line_no = *line_no;
        let pattern = search.pattern.clone();
        let case_insensitive = search.case_insensitive;
        drop(search);

        self.ui.disable()?;
        let outcome = editor::open_entry(&self.editor_config, &path, line_no, &pattern, case_insensitive);
        self.ui.enable()?;

        if let Err(err) = outcome {
            log::warn!("failed to open editor: {err}");
        }
        Ok(())
    }
}

/// Move the highlighted entry by `delta` and keep it inside the `height`-row viewport, scrolling
/// `cursor` up or down as needed so the highlighted entry is never rendered off-screen.
fn move_cursor(stack: &mut SubsearchStack, delta: i64, height: usize) {
    let search = stack.current();
    let mut search = search.lock();
    if search.is_empty() {
        return;
    }
    let max = search.len() - 1;
    let new_index = (search.index as i64 + delta).clamp(0, max as i64) as usize;
    search.index = new_index;
    if new_index < search.cursor {
        search.cursor = new_index;
    } else if height > 0 && new_index >= search.cursor + height {
        search.cursor = new_index + 1 - height;
    }
}

fn spawn_walker_thread(
    matcher: Matcher,
    root: Arc<Mutex<Search>>,
    search_root: PathBuf,
    attrs: MainSearchAttributes,
) {
    std::thread::spawn(move || {
        let pipeline = Pipeline::spawn(matcher, root);
        let result = walker::walk_tree(&search_root, &attrs, &mut |path| {
            if let Err(err) = pipeline.submit_file(path) {
                log::warn!("failed to submit {}: {err}", path.display());
            }
        });
        if let Err(err) = result {
            log::error!("directory walk failed: {err}");
        }
        pipeline.finish();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_cursor_clamps_within_bounds() {
        let root = Arc::new(Mutex::new(Search::new_root(
            "p".to_string(),
            false,
            false,
            PathBuf::from("."),
        )));
        root.lock().append_line(b"a", 1);
        root.lock().append_line(b"b", 2);

        let mut stack = SubsearchStack::new(root);
        move_cursor(&mut stack, 5, 10);
        assert_eq!(stack.current().lock().index, 1);
        move_cursor(&mut stack, -100, 10);
        assert_eq!(stack.current().lock().index, 0);
    }

    #[test]
    fn move_cursor_scrolls_the_viewport_to_follow_the_highlight() {
        let root = Arc::new(Mutex::new(Search::new_root(
            "p".to_string(),
            false,
            false,
            PathBuf::from("."),
        )));
        {
            let mut root = root.lock();
            for i in 0..50u32 {
                root.append_line(b"line", i);
            }
        }

        let mut stack = SubsearchStack::new(root);
        let height = 10;

        for _ in 0..12 {
            move_cursor(&mut stack, 1, height);
        }
        let current = stack.current();
        let search = current.lock();
        assert_eq!(search.index, 12);
        assert!(
            search.index < search.cursor + height,
            "highlighted entry must stay within the rendered viewport"
        );
        assert_eq!(search.cursor, 3);
    }

    #[test]
    fn move_cursor_scrolls_back_up_when_moving_above_the_viewport() {
        let root = Arc::new(Mutex::new(Search::new_root(
            "p".to_string(),
            false,
            false,
            PathBuf::from("."),
        )));
        {
            let mut root = root.lock();
            for i in 0..50u32 {
                root.append_line(b"line", i);
            }
        }

        let mut stack = SubsearchStack::new(root);
        let height = 10;
        for _ in 0..20 {
            move_cursor(&mut stack, 1, height);
        }
        move_cursor(&mut stack, -15, height);

        let current = stack.current();
        let search = current.lock();
        assert_eq!(search.index, 5);
        assert_eq!(search.cursor, 5);
    }
}
