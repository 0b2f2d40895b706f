//! Color theme and styling definitions using ratatui colors.

use ratatui::style::{Color, Style};

/// Color theme for terminal UI elements.
#[derive(Debug, Clone)]
pub struct ColorTheme {
    pub search_match: Style,
    pub file_marker: Style,
    pub selection: Style,
    pub status_bg: Color,
    pub status_fg: Color,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            search_match: Style::default().fg(Color::Black).bg(Color::Yellow),
            file_marker: Style::default().fg(Color::LightCyan),
            selection: Style::default().fg(Color::Black).bg(Color::LightBlue),
            status_bg: Color::Blue,
            status_fg: Color::White,
        }
    }
}

impl ColorTheme {
    /// Theme for terminals without color support.
    pub fn monochrome() -> Self {
        Self {
            search_match: Style::default().fg(Color::Black).bg(Color::White),
            file_marker: Style::default(),
            selection: Style::default().fg(Color::White).bg(Color::Black),
            status_bg: Color::Black,
            status_fg: Color::White,
        }
    }
}
