//! Terminal UI implementation using ratatui and crossterm.

use crate::error::Result;
use crate::model::{Entry, Search};
use crate::ui::theme::ColorTheme;
use crate::ui::{format_status_line, visible_entries, UiCommand};
use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Terminal,
};
use regex::Regex;
use std::io::{self, Stdout};
use std::time::Duration;

type CrosstermTerminal = Terminal<CrosstermBackend<Stdout>>;

/// The 10 ms status/input poll interval from the UI glue design.
pub const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Ratatui/crossterm-backed terminal UI. Owns the alternate-screen session so the editor shell-out
/// (which needs the real screen back) can suspend and resume it.
pub struct TerminalUi {
    terminal: Option<CrosstermTerminal>,
    theme: ColorTheme,
    /// `Some(buffer)` while a narrow-search pattern is being typed.
    prompt: Option<String>,
}

impl TerminalUi {
    pub fn new() -> Self {
        Self {
            terminal: None,
            theme: ColorTheme::default(),
            prompt: None,
        }
    }

    pub fn with_theme(theme: ColorTheme) -> Self {
        Self {
            terminal: None,
            theme,
            prompt: None,
        }
    }

    pub fn enable(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        self.terminal = Some(Terminal::new(backend)?);
        Ok(())
    }

    pub fn disable(&mut self) -> Result<()> {
        if self.terminal.take().is_some() {
            disable_raw_mode()?;
            execute!(io::stdout(), LeaveAlternateScreen)?;
        }
        Ok(())
    }

    /// Number of rows available to the entry list, i.e. the real rendered terminal height minus
    /// the one-row status line. `0` before the terminal is enabled or if the size can't be read.
    pub fn content_height(&self) -> usize {
        if self.terminal.is_none() {
            return 0;
        }
        ratatui::crossterm::terminal::size()
            .map(|(_cols, rows)| rows.saturating_sub(1) as usize)
            .unwrap_or(0)
    }

    /// Poll for one input event, interpreting keys according to whether a narrow-search prompt
    /// is currently open.
    pub fn poll_command(&mut self, timeout: Duration) -> Result<Option<UiCommand>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }

        match event::read()? {
            Event::Key(key) => Ok(self.key_to_command(key.code, key.modifiers)),
            Event::Resize(_, _) => Ok(Some(UiCommand::Resize)),
            _ => Ok(None),
        }
    }

    fn key_to_command(&mut self, key: KeyCode, modifiers: KeyModifiers) -> Option<UiCommand> {
        if let Some(buffer) = self.prompt.as_mut() {
            return match key {
                KeyCode::Enter => {
                    let pattern = std::mem::take(buffer);
                    self.prompt = None;
                    Some(UiCommand::SubmitSubsearch(pattern))
                }
                KeyCode::Esc => {
                    self.prompt = None;
                    Some(UiCommand::CancelSubsearch)
                }
                KeyCode::Backspace => {
                    buffer.pop();
                    None
                }
                KeyCode::Char(c) => {
                    buffer.push(c);
                    None
                }
                _ => None,
            };
        }

        match (key, modifiers) {
            (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => Some(UiCommand::CursorDown),
            (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => Some(UiCommand::CursorUp),
            (KeyCode::Char('f'), KeyModifiers::NONE)
            | (KeyCode::PageDown, _)
            | (KeyCode::Char(' '), KeyModifiers::NONE) => Some(UiCommand::PageDown),
            (KeyCode::Char('b'), KeyModifiers::NONE) | (KeyCode::PageUp, _) => Some(UiCommand::PageUp),
            (KeyCode::Enter, _) => Some(UiCommand::Confirm),
            (KeyCode::Char('/'), KeyModifiers::NONE) => {
                self.prompt = Some(String::new());
                Some(UiCommand::StartSubsearch)
            }
            (KeyCode::Char('q'), KeyModifiers::NONE) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
                Some(UiCommand::Quit)
            }
            _ => None,
        }
    }

    pub fn render(&mut self, search: &Search) -> Result<()> {
        let theme = self.theme.clone();
        let prompt = self.prompt.clone();
        let Some(terminal) = self.terminal.as_mut() else {
            return Ok(());
        };

        terminal.draw(|frame| {
            let size = frame.size();
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
                .split(size);

            let height = chunks[0].height as usize;
            let lines: Vec<Line> = visible_entries(search, height)
                .into_iter()
                .map(|(idx, entry)| render_entry(entry, idx == search.index, search, &theme))
                .collect();
            frame.render_widget(Paragraph::new(lines), chunks[0]);

            let status_text = format_status_line(search, prompt.as_deref());
            let status_style = Style::default().bg(theme.status_bg).fg(theme.status_fg);
            frame.render_widget(Paragraph::new(status_text).style(status_style), chunks[1]);
        })?;

        Ok(())
    }
}

fn render_entry<'a>(entry: &'a Entry, selected: bool, search: &Search, theme: &ColorTheme) -> Line<'a> {
    let line = match entry {
        Entry::FileMarker { path } => Line::styled(path.as_str(), theme.file_marker),
        Entry::LineHit { text, line_no } => line_hit_line(*line_no, text, search, theme),
    };
    if selected {
        line.patch_style(theme.selection)
    } else {
        line
    }
}

/// Render a line hit as `"{line_no}: {text}"`, styling the span of `text` that matches the
/// active search's pattern with `theme.search_match`.
fn line_hit_line<'a>(line_no: u32, text: &'a str, search: &Search, theme: &ColorTheme) -> Line<'a> {
    let mut spans = vec![Span::raw(format!("{line_no}: "))];

    match find_match_span(text, search) {
        Some((start, end)) => {
            if start > 0 {
                spans.push(Span::raw(&text[..start]));
            }
            spans.push(Span::styled(&text[start..end], theme.search_match));
            if end < text.len() {
                spans.push(Span::raw(&text[end..]));
            }
        }
        None => spans.push(Span::raw(text)),
    }

    Line::from(spans)
}

/// Locate the byte range of the active search's pattern within `text`, honoring its regex and
/// case-insensitivity flags. Returns `None` if the pattern doesn't appear (e.g. a subsearch
/// level filtering on a different field) or fails to compile.
fn find_match_span(text: &str, search: &Search) -> Option<(usize, usize)> {
    if search.is_regex {
        let built = if search.case_insensitive {
            format!("(?i){}", search.pattern)
        } else {
            search.pattern.clone()
        };
        let re = Regex::new(&built).ok()?;
        let m = re.find(text)?;
        return Some((m.start(), m.end()));
    }

    if search.case_insensitive {
        let lower_text = text.to_lowercase();
        let lower_pattern = search.pattern.to_lowercase();
        let start = lower_text.find(&lower_pattern)?;
        return Some((start, start + lower_pattern.len()));
    }

    let start = text.find(&search.pattern)?;
    Some((start, start + search.pattern.len()))
}

impl Default for TerminalUi {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TerminalUi {
    fn drop(&mut self) {
        let _ = self.disable();
    }
}
