use crate::pattern::FilterKind;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Substring of the `class` attribute marking the shortcut table.
    pub table_class: String,
    /// Fail at startup when an input element id is missing from the document.
    pub require_inputs: bool,
    pub inputs: InputIds,
    pub columns: ColumnPositions,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            table_class: "collection-content".to_string(),
            require_inputs: true,
            inputs: InputIds::default(),
            columns: ColumnPositions::default(),
        }
    }
}

impl FilterConfig {
    /// Reject configurations the extractor or session cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.table_class.trim().is_empty() {
            return Err(ConfigError::Invalid("table_class must not be empty".into()));
        }

        let mut seen_ids = HashSet::new();
        for kind in FilterKind::ALL {
            let id = self.inputs.id_for(kind);
            if id.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "input id for {kind} must not be empty"
                )));
            }
            if !seen_ids.insert(id) {
                return Err(ConfigError::Invalid(format!(
                    "input id '{id}' is bound to more than one filter"
                )));
            }
        }

        let mut seen_positions = HashSet::new();
        for kind in FilterKind::ALL {
            let position = self.columns.position_for(kind);
            if position == 0 {
                return Err(ConfigError::Invalid(format!(
                    "column position for {kind} must be 1 or greater"
                )));
            }
            if !seen_positions.insert(position) {
                return Err(ConfigError::Invalid(format!(
                    "column position {position} is assigned to more than one filter"
                )));
            }
        }

        Ok(())
    }
}

/// Element ids of the three filter inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputIds {
    pub command_id: String,
    pub key_shortcut: String,
    pub command_palette: String,
}

impl Default for InputIds {
    fn default() -> Self {
        Self {
            command_id: "cmd_ids".to_string(),
            key_shortcut: "key_sht".to_string(),
            command_palette: "cmd_plt".to_string(),
        }
    }
}

impl InputIds {
    pub fn id_for(&self, kind: FilterKind) -> &str {
        match kind {
            FilterKind::CommandId => &self.command_id,
            FilterKind::KeyShortcut => &self.key_shortcut,
            FilterKind::CommandPalette => &self.command_palette,
        }
    }

    pub fn kind_for(&self, element_id: &str) -> Option<FilterKind> {
        FilterKind::ALL
            .into_iter()
            .find(|&kind| self.id_for(kind) == element_id)
    }
}

/// 1-based positions among a row's non-input cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnPositions {
    pub command_id: usize,
    pub key_shortcut: usize,
    pub command_palette: usize,
}

impl Default for ColumnPositions {
    fn default() -> Self {
        Self {
            command_id: 1,
            key_shortcut: 2,
            command_palette: 3,
        }
    }
}

impl ColumnPositions {
    pub fn position_for(&self, kind: FilterKind) -> usize {
        match kind {
            FilterKind::CommandId => self.command_id,
            FilterKind::KeyShortcut => self.key_shortcut,
            FilterKind::CommandPalette => self.command_palette,
        }
    }
}

pub fn load_config(path: Option<&Path>) -> Result<FilterConfig, ConfigError> {
    let config = if let Some(path) = path {
        load_config_from_path(path)?
    } else {
        default_config().clone()
    };
    config.validate()?;
    Ok(config)
}

pub fn load_config_from_path(path: &Path) -> Result<FilterConfig, ConfigError> {
    let path_display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path_display.clone(),
        source,
    })?;

    toml::from_str::<FilterConfig>(&raw).map_err(|source| ConfigError::Parse {
        path: path_display,
        source,
    })
}

pub fn default_config() -> &'static FilterConfig {
    static DEFAULT_CONFIG: LazyLock<FilterConfig> = LazyLock::new(FilterConfig::default);
    &DEFAULT_CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(default_config().validate().is_ok());
        assert_eq!(
            default_config().inputs.kind_for("key_sht"),
            Some(FilterKind::KeyShortcut)
        );
        assert_eq!(default_config().inputs.kind_for("search"), None);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: FilterConfig = toml::from_str(
            r#"
            table_class = "shortcuts"

            [columns]
            key_shortcut = 4
            "#,
        )
        .expect("valid toml");

        assert_eq!(config.table_class, "shortcuts");
        assert_eq!(config.columns.key_shortcut, 4);
        assert_eq!(config.columns.command_id, 1);
        assert_eq!(config.inputs.command_palette, "cmd_plt");
        assert!(config.require_inputs);
    }

    #[test]
    fn test_duplicate_positions_rejected() {
        let mut config = FilterConfig::default();
        config.columns.command_palette = 1;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_zero_position_rejected() {
        let mut config = FilterConfig::default();
        config.columns.key_shortcut = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_duplicate_input_ids_rejected() {
        let mut config = FilterConfig::default();
        config.inputs.command_palette = "cmd_ids".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("cmd_ids"));
    }
}
