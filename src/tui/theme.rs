//! Centralized theme module for TUI color constants and styles

use ratatui::prelude::*;

pub const TITLE_COLOR: Color = Color::Cyan;
pub const MUTED: Color = Color::Gray;
pub const INDEX_COLOR: Color = Color::DarkGray;
pub const ROW_ALT_BG: Color = Color::Indexed(235);
pub const BAR_EMPTY: Color = Color::DarkGray;
pub const STATUS_BAR_BG: Color = Color::Indexed(236);
pub const STATUS_KEY_COLOR: Color = Color::Cyan;
pub const FLASH_SUCCESS: Color = Color::Green;
pub const FLASH_ERROR: Color = Color::Red;

pub const HEADER_STYLE: Style = Style::new().add_modifier(Modifier::BOLD);
pub const ROW_SELECTED: Style = Style::new().add_modifier(Modifier::REVERSED);

/// Color for a grade on the fixed 0-100 scale: red below the pass/fail
/// eligibility threshold, green at 85 and up, yellow in between.
pub fn grade_color(grade: f64) -> Color {
    if grade < crate::scoring::PASS_ELIGIBLE_MIN {
        Color::Red
    } else if grade >= 85.0 {
        Color::Green
    } else {
        Color::Yellow
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_color_bands() {
        assert_eq!(grade_color(40.0), Color::Red);
        assert_eq!(grade_color(54.9), Color::Red);
        assert_eq!(grade_color(55.0), Color::Yellow);
        assert_eq!(grade_color(84.9), Color::Yellow);
        assert_eq!(grade_color(85.0), Color::Green);
        assert_eq!(grade_color(100.0), Color::Green);
    }
}
