//! Engine configuration

use serde::{Deserialize, Serialize};

use crate::error::{BindError, Result};

/// Tag namespace looked up on every field unless overridden
pub const DEFAULT_TAG_NAME: &str = "tagbind";

/// Separates the selector from the function call in a tag
pub const DEFAULT_FUNC_SYMBOL: &str = "->";

/// Tag value that skips a field
pub const IGNORE_SYMBOL: &str = "-";

/// Settings shared read-only by every bind on one engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which tag namespace of a field to read
    pub tag_name: String,
    /// Token splitting `selector->func(args)`
    pub func_symbol: String,
    /// Fail the bind on cast errors instead of assigning zero values
    pub cast_error: bool,
    /// Log skipped fields and degraded casts
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tag_name: DEFAULT_TAG_NAME.to_string(),
            func_symbol: DEFAULT_FUNC_SYMBOL.to_string(),
            cast_error: false,
            debug: false,
        }
    }
}

impl Config {
    /// Parse a config from JSON. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)
            .map_err(|e| BindError::InvalidConfig(format!("failed to parse config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tag_name.trim().is_empty() {
            return Err(BindError::InvalidConfig("tag_name is empty".to_string()));
        }
        if self.func_symbol.trim().is_empty() {
            return Err(BindError::InvalidConfig("func_symbol is empty".to_string()));
        }
        if self.func_symbol.contains(['(', ')', ',', '\'', '"']) {
            return Err(BindError::InvalidConfig(format!(
                "func_symbol {:?} collides with call syntax",
                self.func_symbol
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.tag_name, "tagbind");
        assert_eq!(config.func_symbol, "->");
        assert!(!config.cast_error);
        assert!(!config.debug);
    }

    #[test]
    fn test_from_json_partial() {
        let config = Config::from_json(r#"{"cast_error": true, "tag_name": "scrape"}"#).unwrap();
        assert_eq!(config.tag_name, "scrape");
        assert_eq!(config.func_symbol, "->");
        assert!(config.cast_error);
    }

    #[test]
    fn test_validate_rejects_empty_symbol() {
        let err = Config::from_json(r#"{"func_symbol": ""}"#).unwrap_err();
        assert!(matches!(err, BindError::InvalidConfig(_)));

        let config = Config {
            func_symbol: "(".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(Config::from_json("not json").is_err());
    }
}
