//! Centralized theme module for TUI color constants and styles

use ratatui::prelude::*;
use serde::{Deserialize, Serialize};

/// Theme selection from config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Detect from terminal background luminance
    #[default]
    Auto,
    Dark,
    Light,
}

/// Complete color palette for the TUI
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Grade-band colors (traffic light pattern)
    pub grade_high: Color,
    pub grade_mid: Color,
    pub grade_low: Color,

    // Completion bar colors
    pub bar_filled: Color,
    pub bar_empty: Color,

    // Form colors
    pub row_selected: Style,
    pub present_marker: Color,
    pub missing_marker: Color,
    pub dropped_marker: Color,
    pub editing: Style,

    // General colors
    pub muted: Color,
    pub title_color: Color,
    pub header_style: Style,

    // Status bar colors
    pub status_bar_bg: Color,
    pub status_key_color: Color,
    pub flash_success: Color,
    pub flash_error: Color,

    // Popup overlay colors
    pub popup_border: Color,
    pub popup_title: Style,
    pub popup_bg: Color,
}

impl ThemeColors {
    pub fn dark() -> Self {
        Self {
            grade_high: Color::Green,
            grade_mid: Color::Yellow,
            grade_low: Color::Red,
            bar_filled: Color::Cyan,
            bar_empty: Color::DarkGray,
            row_selected: Style::new().reversed(),
            present_marker: Color::Green,
            missing_marker: Color::DarkGray,
            dropped_marker: Color::Magenta,
            editing: Style::new().fg(Color::Black).bg(Color::Yellow),
            muted: Color::Gray,
            title_color: Color::Cyan,
            header_style: Style::new().bold(),
            status_bar_bg: Color::Indexed(236),
            status_key_color: Color::Cyan,
            flash_success: Color::Green,
            flash_error: Color::Red,
            popup_border: Color::Cyan,
            popup_title: Style::new().fg(Color::Cyan).bold(),
            popup_bg: Color::Indexed(234),
        }
    }

    pub fn light() -> Self {
        Self {
            grade_high: Color::Rgb(0, 120, 0),
            grade_mid: Color::Rgb(160, 110, 0),
            grade_low: Color::Rgb(180, 0, 0),
            bar_filled: Color::Blue,
            bar_empty: Color::Indexed(250),
            row_selected: Style::new().reversed(),
            present_marker: Color::Rgb(0, 120, 0),
            missing_marker: Color::Indexed(245),
            dropped_marker: Color::Magenta,
            editing: Style::new().fg(Color::White).bg(Color::Blue),
            muted: Color::Indexed(242),
            title_color: Color::Blue,
            header_style: Style::new().bold(),
            status_bar_bg: Color::Indexed(254),
            status_key_color: Color::Blue,
            flash_success: Color::Rgb(0, 120, 0),
            flash_error: Color::Rgb(180, 0, 0),
            popup_border: Color::Blue,
            popup_title: Style::new().fg(Color::Blue).bold(),
            popup_bg: Color::Indexed(255),
        }
    }

    /// Color for an average, by approximate letter band (A-/C-/below).
    pub fn grade_color(&self, average: f64) -> Color {
        if average >= 80.0 {
            self.grade_high
        } else if average >= 50.0 {
            self.grade_mid
        } else {
            self.grade_low
        }
    }

    /// Color for a required average: above 100 is out of reach.
    pub fn required_color(&self, required: f64) -> Color {
        if required > 100.0 {
            self.grade_low
        } else if required > 90.0 {
            self.grade_mid
        } else {
            self.grade_high
        }
    }
}

/// Pick a palette. `Auto` asks the terminal for its background luminance and
/// falls back to dark when the terminal does not answer.
pub fn resolve_theme(theme: Theme) -> ThemeColors {
    match theme {
        Theme::Dark => ThemeColors::dark(),
        Theme::Light => ThemeColors::light(),
        Theme::Auto => match terminal_light::luma() {
            Ok(luma) if luma > 0.6 => ThemeColors::light(),
            _ => ThemeColors::dark(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_color_bands() {
        let colors = ThemeColors::dark();
        assert_eq!(colors.grade_color(85.0), Color::Green);
        assert_eq!(colors.grade_color(60.0), Color::Yellow);
        assert_eq!(colors.grade_color(20.0), Color::Red);
    }

    #[test]
    fn test_required_color_bands() {
        let colors = ThemeColors::dark();
        assert_eq!(colors.required_color(120.0), Color::Red);
        assert_eq!(colors.required_color(95.0), Color::Yellow);
        assert_eq!(colors.required_color(70.0), Color::Green);
    }

    #[test]
    fn test_explicit_themes_skip_detection() {
        assert_eq!(resolve_theme(Theme::Light).title_color, Color::Blue);
        assert_eq!(resolve_theme(Theme::Dark).title_color, Color::Cyan);
    }
}
