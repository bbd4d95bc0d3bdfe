// Theme system for the TUI
//
// Each theme defines colors for every element of the table screen.

use crate::logging::LogLevel;
use ratatui::style::{Color, Modifier, Style};

/// Available themes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeKind {
    #[default]
    Dark,
    Light,
}

impl ThemeKind {
    /// Get all available themes
    pub fn all() -> &'static [ThemeKind] {
        &[ThemeKind::Dark, ThemeKind::Light]
    }

    /// Get the next theme in the cycle
    pub fn next(self) -> Self {
        let themes = Self::all();
        let current = themes.iter().position(|&t| t == self).unwrap_or(0);
        themes[(current + 1) % themes.len()]
    }

    /// Look up a theme by config name; unknown names fall back to dark
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "light" => ThemeKind::Light,
            _ => ThemeKind::Dark,
        }
    }

    /// Get the theme configuration
    pub fn theme(&self) -> Theme {
        match self {
            ThemeKind::Dark => Theme::dark(),
            ThemeKind::Light => Theme::light(),
        }
    }
}

/// Complete theme definition with all UI colors
#[derive(Debug, Clone)]
pub struct Theme {
    // Base colors
    pub bg: Color,
    pub fg: Color,
    pub border: Color,
    pub border_focused: Color,

    // Title and status
    pub title: Color,
    pub status_bar: Color,

    // Table
    pub header: Color,
    pub header_active: Color,
    pub muted: Color,
    pub selected_bg: Color,
    pub selected_fg: Color,

    // States
    pub spinner: Color,
    pub error: Color,

    // Log levels
    pub log_error: Color,
    pub log_warn: Color,
    pub log_info: Color,
    pub log_debug: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            bg: Color::Reset,
            fg: Color::White,
            border: Color::Gray,
            border_focused: Color::Cyan,

            title: Color::Cyan,
            status_bar: Color::Green,

            header: Color::Gray,
            header_active: Color::Cyan,
            muted: Color::DarkGray,
            selected_bg: Color::DarkGray,
            selected_fg: Color::Yellow,

            spinner: Color::Cyan,
            error: Color::Red,

            log_error: Color::Red,
            log_warn: Color::Yellow,
            log_info: Color::Blue,
            log_debug: Color::Gray,
        }
    }

    /// Light theme
    pub fn light() -> Self {
        Self {
            bg: Color::White,
            fg: Color::Black,
            border: Color::DarkGray,
            border_focused: Color::Blue,

            title: Color::Blue,
            status_bar: Color::DarkGray,

            header: Color::DarkGray,
            header_active: Color::Blue,
            muted: Color::Gray,
            selected_bg: Color::LightBlue,
            selected_fg: Color::Black,

            spinner: Color::Blue,
            error: Color::Red,

            log_error: Color::Red,
            log_warn: Color::Rgb(184, 134, 11), // Dark goldenrod
            log_info: Color::Blue,
            log_debug: Color::DarkGray,
        }
    }

    /// Style for a header cell
    pub fn header_style(&self, active: bool, focused: bool) -> Style {
        let fg = if active { self.header_active } else { self.header };
        let mut style = Style::default().fg(fg).add_modifier(Modifier::BOLD);
        if focused {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        style
    }

    pub fn log_style(&self, level: LogLevel) -> Style {
        let fg = match level {
            LogLevel::Error => self.log_error,
            LogLevel::Warn => self.log_warn,
            LogLevel::Info => self.log_info,
            LogLevel::Debug | LogLevel::Trace => self.log_debug,
        };
        Style::default().fg(fg)
    }
}
