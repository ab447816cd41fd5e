use std::fmt;

use colored::Colorize;

use crate::cli::output::{current_preferences, OutputPreferences};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Style {
    Header,
    Detail,
    Error,
    Emphasis,
}

pub struct Formatter {
    prefs: OutputPreferences,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter {
    pub fn new() -> Self {
        Self {
            prefs: current_preferences(),
        }
    }

    pub fn with_preferences(prefs: OutputPreferences) -> Self {
        Self { prefs }
    }

    pub fn header_text(&self, title: impl fmt::Display) -> String {
        self.colorize(format!("=== {} ===", title), Style::Header)
    }

    pub fn detail_text(&self, message: impl fmt::Display) -> String {
        self.colorize(message.to_string(), Style::Detail)
    }

    pub fn emphasis_text(&self, message: impl fmt::Display) -> String {
        self.colorize(message.to_string(), Style::Emphasis)
    }

    /// Inline field error shown under a value.
    pub fn field_error_text(&self, message: impl fmt::Display) -> String {
        let text = if self.plain() {
            format!("    ERROR: {}", message)
        } else {
            format!("    ✖ {}", message)
        };
        self.colorize(text, Style::Error)
    }

    pub fn navigation_hint(&self) -> String {
        "(Use arrow keys to navigate, Enter to select, ESC to go back)".to_string()
    }

    pub fn format_two_column_row(&self, label: &str, description: &str, width: usize) -> String {
        format!("  {:<width$}  {}", label, description, width = width + 2)
    }

    pub fn checkbox(&self, checked: bool) -> &'static str {
        if checked {
            "[x]"
        } else {
            "[ ]"
        }
    }

    fn plain(&self) -> bool {
        self.prefs.plain_mode || !self.prefs.color_enabled
    }

    fn colorize(&self, text: String, style: Style) -> String {
        if self.plain() {
            return text;
        }

        if self.prefs.high_contrast_mode {
            return match style {
                Style::Detail => text,
                _ => text.bold().to_string(),
            };
        }

        match style {
            Style::Header => text.bold().to_string(),
            Style::Detail => text.dimmed().to_string(),
            Style::Error => text.red().to_string(),
            Style::Emphasis => text.cyan().to_string(),
        }
    }
}
