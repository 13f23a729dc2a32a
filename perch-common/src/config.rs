//! Page-level names shared by portals, the container and placeholders

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_CONTAINER_ID: &str = "perch-portal-target";
pub const DEFAULT_PLACEHOLDER_PREFIX: &str = "perch-portal_dropdown-id_";

fn default_container_id() -> String {
    DEFAULT_CONTAINER_ID.to_string()
}

fn default_placeholder_prefix() -> String {
    DEFAULT_PLACEHOLDER_PREFIX.to_string()
}

/// Portal configuration
///
/// One per page. Every field has a default so a partial JSON object is enough.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalConfig {
    /// `id` of the shared container that hosts every proxy node
    #[serde(default = "default_container_id")]
    pub container_id: String,
    /// Prefix for placeholder ids (`{prefix}{key}`)
    #[serde(default = "default_placeholder_prefix")]
    pub placeholder_prefix: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            container_id: default_container_id(),
            placeholder_prefix: default_placeholder_prefix(),
        }
    }
}

impl PortalConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.container_id.is_empty() {
            return Err(ConfigError::Invalid("container_id is empty".into()));
        }
        if self.container_id.chars().any(char::is_whitespace) {
            return Err(ConfigError::Invalid(format!(
                "container_id {:?} contains whitespace",
                self.container_id
            )));
        }
        if self.placeholder_prefix.chars().any(char::is_whitespace) {
            return Err(ConfigError::Invalid(format!(
                "placeholder_prefix {:?} contains whitespace",
                self.placeholder_prefix
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(PortalConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = PortalConfig::from_json(r#"{"container_id": "overlays"}"#).unwrap();
        assert_eq!(config.container_id, "overlays");
        assert_eq!(config.placeholder_prefix, DEFAULT_PLACEHOLDER_PREFIX);
    }

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(PortalConfig::from_json("{}").unwrap(), PortalConfig::default());
    }

    #[test]
    fn test_invalid_container_id_rejected() {
        match PortalConfig::from_json(r#"{"container_id": "two words"}"#) {
            Err(ConfigError::Invalid(msg)) => assert!(msg.contains("two words")),
            other => panic!("Expected Invalid, got {other:?}"),
        }
        assert!(PortalConfig::from_json(r#"{"container_id": ""}"#).is_err());
    }

    #[test]
    fn test_malformed_json() {
        match PortalConfig::from_json("{") {
            Err(ConfigError::Json(_)) => {}
            other => panic!("Expected Json error, got {other:?}"),
        }
    }
}
