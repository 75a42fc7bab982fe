use crate::alarms::AlarmCategory;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Longest legend name shown before truncation, ellipsis included.
pub const DEFAULT_MAX_TRACE_NAME_CHARS: usize = 23;
pub const DEFAULT_ELLIPSIS: &str = "...";

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub selection: SelectionConfig,
}

/// Legend naming for per-entity traces.
///
/// `ellipsis` should be shorter than `max_trace_name_chars` ([`Config::validate`]
/// checks this); otherwise names are cut to the limit with no ellipsis.
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_max_trace_name_chars")]
    pub max_trace_name_chars: usize,
    #[serde(default = "default_ellipsis")]
    pub ellipsis: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            max_trace_name_chars: default_max_trace_name_chars(),
            ellipsis: default_ellipsis(),
        }
    }
}

/// Categories used when the CLI is given none.
#[derive(Debug, Deserialize)]
pub struct SelectionConfig {
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            categories: default_categories(),
        }
    }
}

impl SelectionConfig {
    /// Names asked for on the command line, or the configured set when none were.
    pub fn or_requested(&self, requested: Vec<String>) -> Vec<String> {
        if requested.is_empty() {
            self.categories.clone()
        } else {
            requested
        }
    }
}

// Defaults
fn default_max_trace_name_chars() -> usize {
    DEFAULT_MAX_TRACE_NAME_CHARS
}
fn default_ellipsis() -> String {
    DEFAULT_ELLIPSIS.into()
}
fn default_categories() -> Vec<String> {
    AlarmCategory::ALL
        .iter()
        .map(|c| c.prefix().to_string())
        .collect()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read config {}: {e}", path.display())))?;
        toml::from_str(&content).map_err(|e| Error::config(format!("Failed to parse config: {e}")))
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        let ellipsis_chars = self.display.ellipsis.chars().count();
        if ellipsis_chars >= self.display.max_trace_name_chars {
            return Err(Error::config(format!(
                "display.ellipsis ({ellipsis_chars} chars) must be shorter than display.max_trace_name_chars ({})",
                self.display.max_trace_name_chars
            )));
        }
        if self.selection.categories.is_empty() {
            return Err(Error::config("selection.categories must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_config_parses() {
        let toml = r#"
[display]
max_trace_name_chars = 30
ellipsis = "…"

[selection]
categories = ["hegemony", "bgp"]
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.display.max_trace_name_chars, 30);
        assert_eq!(config.display.ellipsis, "…");
        assert_eq!(config.selection.categories, vec!["hegemony", "bgp"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn requested_categories_override_config() {
        let selection = SelectionConfig {
            categories: vec!["bgp".into()],
        };
        assert_eq!(selection.or_requested(Vec::new()), vec!["bgp"]);
        assert_eq!(
            selection.or_requested(vec!["moas".into(), "edges".into()]),
            vec!["moas", "edges"]
        );
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.display.max_trace_name_chars, 23);
        assert_eq!(config.display.ellipsis, "...");
        assert_eq!(config.selection.categories.len(), 9);
        assert_eq!(config.selection.categories[0], "hegemony");
    }

    #[test]
    fn validate_rejects_oversized_ellipsis() {
        let mut config = Config::default();
        config.display.max_trace_name_chars = 3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_selection() {
        let mut config = Config::default();
        config.selection.categories.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = Config::load_or_default(Path::new("/nonexistent/alarmchart.toml")).unwrap();
        assert_eq!(config.display.max_trace_name_chars, DEFAULT_MAX_TRACE_NAME_CHARS);
    }
}
