use std::fs;
use std::path::Path;

use ratatui::style::{Color, Modifier, Style};
use rust_embed::Embed;
use serde::{Deserialize, Serialize};

use crate::session::state::CharClass;

#[derive(Embed)]
#[folder = "assets/themes/"]
struct ThemeAssets;

pub const DEFAULT_THEME: &str = "terminal-default";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

/// Colour roles as `#rrggbb` strings, or `reset` for the terminal default.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeColors {
    pub fg: String,
    pub bg: String,
    pub title: String,
    pub correct: String,
    pub incorrect: String,
    pub pending: String,
    pub cursor: String,
    pub dim: String,
    pub accent: String,
}

impl Theme {
    /// User theme from `<config dir>/keysmash/themes/<name>.toml`, then the
    /// bundled one of that name.
    pub fn load(name: &str) -> Option<Self> {
        if let Some(config_dir) = dirs::config_dir() {
            let user_themes = config_dir.join("keysmash").join("themes");
            if let Some(theme) = Self::load_from_dir(&user_themes, name) {
                return Some(theme);
            }
        }
        Self::load_bundled(name)
    }

    pub fn load_from_dir(dir: &Path, name: &str) -> Option<Self> {
        let path = dir.join(format!("{name}.toml"));
        let content = fs::read_to_string(&path).ok()?;
        match toml::from_str::<Theme>(&content) {
            Ok(theme) => Some(theme),
            Err(err) => {
                tracing::warn!(target: "ui.theme", path = %path.display(), %err, "theme_parse_failed");
                None
            }
        }
    }

    pub fn load_bundled(name: &str) -> Option<Self> {
        let file = ThemeAssets::get(&format!("{name}.toml"))?;
        let content = std::str::from_utf8(file.data.as_ref()).ok()?;
        toml::from_str::<Theme>(content).ok()
    }

    pub fn available_themes() -> Vec<String> {
        let mut names: Vec<String> = ThemeAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(|n| n.to_string()))
            .collect();
        names.sort();
        names
    }

    pub fn text(&self) -> Style {
        Style::default()
            .fg(self.colors.fg_color())
            .bg(self.colors.bg_color())
    }

    pub fn title(&self) -> Style {
        self.text()
            .fg(self.colors.title_color())
            .add_modifier(Modifier::BOLD)
    }

    pub fn dim(&self) -> Style {
        self.text().fg(self.colors.dim_color())
    }

    pub fn accent(&self) -> Style {
        self.text().fg(self.colors.accent_color())
    }

    pub fn incorrect(&self) -> Style {
        self.text().fg(self.colors.incorrect_color())
    }

    pub fn cursor(&self) -> Style {
        self.text().fg(self.colors.cursor_color())
    }

    /// Style of a glyph in the reference or input region.
    pub fn char_style(&self, class: CharClass) -> Style {
        match class {
            CharClass::Correct => self.text().fg(self.colors.correct_color()),
            CharClass::Incorrect => self
                .text()
                .fg(self.colors.incorrect_color())
                .add_modifier(Modifier::UNDERLINED),
            CharClass::Pending => self.text().fg(self.colors.pending_color()),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::load_bundled(DEFAULT_THEME).unwrap_or_else(|| Self {
            name: DEFAULT_THEME.to_string(),
            colors: ThemeColors::default(),
        })
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            fg: "reset".to_string(),
            bg: "reset".to_string(),
            title: "#5fafff".to_string(),
            correct: "#87d787".to_string(),
            incorrect: "#ff5f5f".to_string(),
            pending: "#808080".to_string(),
            cursor: "#ffffff".to_string(),
            dim: "#585858".to_string(),
            accent: "#5fafff".to_string(),
        }
    }
}

impl ThemeColors {
    pub fn parse_color(value: &str) -> Color {
        if value.eq_ignore_ascii_case("reset") {
            return Color::Reset;
        }
        let hex = value.trim_start_matches('#');
        if hex.len() == 6 && hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return Color::Rgb(r, g, b);
            }
        }
        Color::Reset
    }

    pub fn fg_color(&self) -> Color { Self::parse_color(&self.fg) }
    pub fn bg_color(&self) -> Color { Self::parse_color(&self.bg) }
    pub fn title_color(&self) -> Color { Self::parse_color(&self.title) }
    pub fn correct_color(&self) -> Color { Self::parse_color(&self.correct) }
    pub fn incorrect_color(&self) -> Color { Self::parse_color(&self.incorrect) }
    pub fn pending_color(&self) -> Color { Self::parse_color(&self.pending) }
    pub fn cursor_color(&self) -> Color { Self::parse_color(&self.cursor) }
    pub fn dim_color(&self) -> Color { Self::parse_color(&self.dim) }
    pub fn accent_color(&self) -> Color { Self::parse_color(&self.accent) }
}
