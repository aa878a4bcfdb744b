//! Dashboard configuration.

use crate::view::StatCard;
use crate::widget::WidgetType;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {reason}", .path.display())]
    Io { path: PathBuf, reason: String },
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Dashboard configuration. Every field has a default, so an empty JSON
/// object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Directory for the native file store. `None` uses the platform data
    /// directory.
    pub storage_dir: Option<PathBuf>,
    /// Widget type selected when the creation form starts fresh.
    pub initial_widget_type: WidgetType,
    /// Default log filter (overridden by `RUST_LOG`).
    pub log_filter: String,
    /// Summary cards at the top of the dashboard.
    pub stat_cards: Vec<StatCard>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            storage_dir: None,
            initial_widget_type: WidgetType::Chart,
            log_filter: "info".to_string(),
            stat_cards: StatCard::defaults(),
        }
    }
}

impl DashboardConfig {
    /// Parse a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a JSON config file.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_json(&json)
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::view::StatIcon;

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(DashboardConfig::from_json("{}").unwrap(), DashboardConfig::default());
    }

    #[test]
    fn test_partial_config() {
        let config = DashboardConfig::from_json(
            r#"{"initial_widget_type": "table", "stat_cards": [{"title": "Uptime", "value": "99.9%", "icon": "trending-up"}]}"#,
        )
        .unwrap();
        assert_eq!(config.initial_widget_type, WidgetType::Table);
        assert_eq!(config.stat_cards, vec![StatCard::new("Uptime", "99.9%", StatIcon::TrendingUp)]);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            DashboardConfig::from_json(r#"{"initial_widget_type": "gauge"}"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_round_trip() {
        let mut config = DashboardConfig::default();
        config.storage_dir = Some(PathBuf::from("/tmp/widgets"));
        let restored = DashboardConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashwidget.json");
        std::fs::write(&path, r#"{"log_filter": "debug"}"#).unwrap();

        assert_eq!(DashboardConfig::load(&path).unwrap().log_filter, "debug");
        assert!(matches!(
            DashboardConfig::load(&dir.path().join("missing.json")),
            Err(ConfigError::Io { .. })
        ));
    }
}
