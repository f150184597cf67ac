//! Color palettes for the TUI

use ratatui::prelude::*;

use crate::config::ThemeMode;
use crate::scoring::{Direction, ScoreResult};

/// Complete color palette for the TUI
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Traffic light by how sustainable a score is
    pub score_good: Color,
    pub score_mid: Color,
    pub score_poor: Color,
    pub score_flagged: Color,

    pub bar_empty: Color,

    // Table colors
    pub row_alt_bg: Color,
    pub index_color: Color,
    pub header_style: Style,
    pub row_selected: Style,

    pub muted: Color,
    pub title_color: Color,

    // Status bar colors
    pub status_bar_bg: Color,
    pub status_key_color: Color,
    pub flash_success: Color,
    pub flash_error: Color,
    pub flash_default: Color,

    // Popup overlay colors
    pub popup_border: Color,
    pub popup_title: Style,
    pub popup_bg: Color,
}

impl ThemeColors {
    pub fn dark() -> Self {
        Self {
            score_good: Color::Green,
            score_mid: Color::Yellow,
            score_poor: Color::Red,
            score_flagged: Color::Magenta,
            bar_empty: Color::DarkGray,
            row_alt_bg: Color::Indexed(235),
            index_color: Color::DarkGray,
            header_style: Style::new().bold(),
            row_selected: Style::new().reversed(),
            muted: Color::Gray,
            title_color: Color::Cyan,
            status_bar_bg: Color::Indexed(236),
            status_key_color: Color::Cyan,
            flash_success: Color::Green,
            flash_error: Color::Red,
            flash_default: Color::White,
            popup_border: Color::Cyan,
            popup_title: Style::new().fg(Color::Cyan).bold(),
            popup_bg: Color::Indexed(234),
        }
    }

    pub fn light() -> Self {
        Self {
            score_good: Color::Rgb(0, 128, 0),
            score_mid: Color::Rgb(175, 110, 0),
            score_poor: Color::Rgb(190, 0, 0),
            score_flagged: Color::Rgb(140, 0, 140),
            bar_empty: Color::Indexed(250),
            row_alt_bg: Color::Indexed(255),
            index_color: Color::Indexed(244),
            header_style: Style::new().bold(),
            row_selected: Style::new().reversed(),
            muted: Color::Indexed(242),
            title_color: Color::Rgb(0, 95, 135),
            status_bar_bg: Color::Indexed(253),
            status_key_color: Color::Rgb(0, 95, 135),
            flash_success: Color::Rgb(0, 128, 0),
            flash_error: Color::Rgb(190, 0, 0),
            flash_default: Color::Black,
            popup_border: Color::Rgb(0, 95, 135),
            popup_title: Style::new().fg(Color::Rgb(0, 95, 135)).bold(),
            popup_bg: Color::Indexed(254),
        }
    }

    /// Color for a goodness ratio in [0, 1]; None means a sentinel score
    pub fn score_color(&self, goodness: Option<f64>) -> Color {
        match goodness {
            None => self.score_flagged,
            Some(g) if g >= 0.7 => self.score_good,
            Some(g) if g >= 0.4 => self.score_mid,
            Some(_) => self.score_poor,
        }
    }
}

/// Pick the palette for the configured mode. `Auto` asks the terminal for its
/// background luminance and falls back to dark when it cannot tell.
pub fn resolve_theme(mode: ThemeMode) -> ThemeColors {
    match mode {
        ThemeMode::Dark => ThemeColors::dark(),
        ThemeMode::Light => ThemeColors::light(),
        ThemeMode::Auto => match terminal_light::luma() {
            Ok(luma) if luma > 0.6 => ThemeColors::light(),
            _ => ThemeColors::dark(),
        },
    }
}

/// How good a score is on a 0-1 scale, relative to the list it appears in.
///
/// Higher-is-better scores are read against 100. Lower-is-better scores are
/// read against `worst`, the largest non-sentinel score in the list.
/// Sentinel scores have no goodness.
pub fn goodness(result: &ScoreResult, worst: f64) -> Option<f64> {
    if result.sentinel.is_some() {
        return None;
    }
    let ratio = match result.direction {
        Direction::HigherIsBetter => result.score / 100.0,
        Direction::LowerIsBetter => {
            if worst > 0.0 {
                1.0 - result.score / worst
            } else {
                1.0
            }
        }
    };
    Some(ratio.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Sentinel;

    fn result(score: f64, direction: Direction, sentinel: Option<Sentinel>) -> ScoreResult {
        ScoreResult {
            score,
            direction,
            sentinel,
            defaulted: Vec::new(),
            breakdown: Vec::new(),
        }
    }

    #[test]
    fn test_goodness_higher_is_better() {
        let g = goodness(&result(85.0, Direction::HigherIsBetter, None), 0.0).unwrap();
        assert!((g - 0.85).abs() < 1e-9);
        // Unclamped mobile scores stay in range
        let g = goodness(&result(130.0, Direction::HigherIsBetter, None), 0.0).unwrap();
        assert_eq!(g, 1.0);
    }

    #[test]
    fn test_goodness_lower_is_better() {
        let g = goodness(&result(25.0, Direction::LowerIsBetter, None), 100.0).unwrap();
        assert!((g - 0.75).abs() < 1e-9);
        assert_eq!(goodness(&result(0.0, Direction::LowerIsBetter, None), 0.0), Some(1.0));
    }

    #[test]
    fn test_goodness_sentinel() {
        let r = result(9999.0, Direction::LowerIsBetter, Some(Sentinel::InvalidMileage));
        assert_eq!(goodness(&r, 9999.0), None);
    }

    #[test]
    fn test_score_color() {
        let theme = ThemeColors::dark();
        assert_eq!(theme.score_color(Some(0.9)), Color::Green);
        assert_eq!(theme.score_color(Some(0.5)), Color::Yellow);
        assert_eq!(theme.score_color(Some(0.1)), Color::Red);
        assert_eq!(theme.score_color(None), Color::Magenta);
    }

    #[test]
    fn test_resolve_explicit_modes() {
        assert_eq!(resolve_theme(ThemeMode::Dark).score_good, Color::Green);
        assert_eq!(
            resolve_theme(ThemeMode::Light).flash_default,
            Color::Black
        );
    }
}
