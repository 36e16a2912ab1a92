use ratatui::style::{Color, Modifier, Style};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
    Unknown,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`. Background values
/// 0-6 are dark, 7-15 light. Absent or unparseable values yield `Unknown`.
pub fn detect_background() -> BackgroundType {
    std::env::var("COLORFGBG")
        .ok()
        .map(|val| background_from_colorfgbg(&val))
        .unwrap_or(BackgroundType::Unknown)
}

fn background_from_colorfgbg(val: &str) -> BackgroundType {
    match val.split(';').next_back().and_then(|bg| bg.parse::<u8>().ok()) {
        Some(bg) if bg <= 6 => BackgroundType::Dark,
        Some(_) => BackgroundType::Light,
        None => BackgroundType::Unknown,
    }
}

/// Styles for everything on the chart screen except the series line, whose
/// colour comes from the chart options.
#[derive(Debug, Clone)]
pub struct Theme {
    pub title: Style,
    pub text: Style,
    pub dim: Style,
    /// Axis spines and tick labels.
    pub axis: Style,
    /// Per-point value annotations.
    pub label: Style,
    pub warning: Style,
}

impl Theme {
    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            title: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            axis: Style::default().fg(Color::Gray),
            label: Style::default().fg(Color::White),
            warning: Style::default().fg(Color::Yellow),
        }
    }

    /// Light-background terminal theme.
    pub fn light() -> Self {
        Self {
            title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            axis: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Black),
            warning: Style::default().fg(Color::Red),
        }
    }

    /// Basic 8-colour palette, no modifiers.
    pub fn classic() -> Self {
        Self {
            title: Style::default().fg(Color::White),
            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            axis: Style::default().fg(Color::White),
            label: Style::default().fg(Color::White),
            warning: Style::default().fg(Color::Yellow),
        }
    }

    /// Choose a theme automatically based on the detected terminal background.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Construct a theme by name. Unknown names and `"auto"` fall back to
    /// [`Theme::auto_detect`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dark_theme_creation() {
        let theme = Theme::dark();
        assert_eq!(theme.text.fg, Some(Color::White));
        assert!(theme.title.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_light_theme_creation() {
        let theme = Theme::light();
        assert_eq!(theme.text.fg, Some(Color::Black));
    }

    #[test]
    fn test_classic_theme_has_no_modifiers() {
        let theme = Theme::classic();
        assert!(theme.title.add_modifier.is_empty());
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Theme::from_name("light").text.fg, Some(Color::Black));
        assert_eq!(Theme::from_name("dark").text.fg, Some(Color::White));
        assert!(Theme::from_name("classic").title.add_modifier.is_empty());
    }

    #[test]
    fn test_from_name_unknown_falls_back() {
        let theme = Theme::from_name("neon");
        assert!(theme.text.fg.is_some());
    }

    #[test]
    fn test_background_from_colorfgbg() {
        assert_eq!(background_from_colorfgbg("15;0"), BackgroundType::Dark);
        assert_eq!(background_from_colorfgbg("0;15"), BackgroundType::Light);
        assert_eq!(background_from_colorfgbg("0;default;7"), BackgroundType::Light);
        assert_eq!(background_from_colorfgbg("garbage"), BackgroundType::Unknown);
        assert_eq!(background_from_colorfgbg(""), BackgroundType::Unknown);
    }
}
