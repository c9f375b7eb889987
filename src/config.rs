use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::engine::layout::LayoutConfig;
use crate::session::state::NewlinePolicy;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Directory of `.txt` passages. Unset means search the usual places.
    #[serde(default)]
    pub tests_dir: Option<String>,
    #[serde(default = "default_use_bundled_texts")]
    pub use_bundled_texts: bool,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub newline_policy: NewlinePolicy,
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub layout: LayoutConfig,
}

fn default_use_bundled_texts() -> bool {
    true
}
fn default_theme() -> String {
    "terminal-default".to_string()
}
fn default_tick_rate_ms() -> u64 {
    100
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tests_dir: None,
            use_bundled_texts: default_use_bundled_texts(),
            theme: default_theme(),
            newline_policy: NewlinePolicy::default(),
            tick_rate_ms: default_tick_rate_ms(),
            log_level: default_log_level(),
            layout: LayoutConfig::default(),
        }
    }
}

impl Config {
    /// Load from the default location, or defaults if there is no file yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            let mut config: Config = toml::from_str(&content)
                .with_context(|| format!("parsing config {}", path.display()))?;
            config.normalize();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("keysmash")
    }

    pub fn tests_dir(&self) -> Option<PathBuf> {
        self.tests_dir
            .as_deref()
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
    }

    /// Clamp values a hand-edited file could set to something unusable.
    pub fn normalize(&mut self) {
        if self.tick_rate_ms == 0 {
            self.tick_rate_ms = default_tick_rate_ms();
        }
        if self.log_level.trim().is_empty() {
            self.log_level = default_log_level();
        }
        self.layout.normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.tests_dir, None);
        assert!(config.use_bundled_texts);
        assert_eq!(config.theme, "terminal-default");
        assert_eq!(config.newline_policy, NewlinePolicy::Score);
        assert_eq!(config.tick_rate_ms, 100);
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.layout, LayoutConfig::default());
    }

    #[test]
    fn test_config_partial_layout_table() {
        let toml_str = r#"
theme = "solarized-dark"
newline_policy = "match-reference"

[layout]
min_width = 60
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.theme, "solarized-dark");
        assert_eq!(config.newline_policy, NewlinePolicy::MatchReference);
        assert_eq!(config.layout.min_width, 60);
        assert_eq!(config.layout.min_height, 15);
        assert_eq!(config.layout.max_padding, 4);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let mut config = Config::default();
        config.tests_dir = Some("/tmp/passages".to_string());
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.tests_dir, config.tests_dir);
        assert_eq!(deserialized.layout, config.layout);
        assert_eq!(deserialized.newline_policy, config.newline_policy);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.tick_rate_ms, 100);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.use_bundled_texts = false;
        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert!(!loaded.use_bundled_texts);
    }

    #[test]
    fn test_load_reports_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "tick_rate_ms = \"fast\"").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("parsing config"));
    }

    #[test]
    fn test_normalize_fixes_zero_values() {
        let mut config: Config = toml::from_str("tick_rate_ms = 0\nlog_level = \"\"").unwrap();
        config.normalize();
        assert_eq!(config.tick_rate_ms, 100);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_load_clamps_layout_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[layout]\nmax_padding = 10\nmin_content_width = 500\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.layout.max_padding, 4);
        assert_eq!(config.layout.min_content_width, 32);
    }

    #[test]
    fn test_blank_tests_dir_is_unset() {
        let mut config = Config::default();
        config.tests_dir = Some("  ".to_string());
        assert_eq!(config.tests_dir(), None);
        config.tests_dir = Some("texts".to_string());
        assert_eq!(config.tests_dir(), Some(PathBuf::from("texts")));
    }
}
