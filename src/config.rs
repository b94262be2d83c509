//! Graph configuration.

use serde::{Deserialize, Serialize};

use crate::model::Directionality;
use crate::Result;

/// Default cap on BFS depth for [`ExpandDepth::Unbounded`](crate::traverse::ExpandDepth).
pub const DEFAULT_MAX_EXPAND_DEPTH: usize = 100;

/// Tunables for a [`SceneGraph`](crate::SceneGraph).
///
/// Every field has a default, so a config file only needs the keys it
/// overrides:
///
/// ```json
/// { "default_directionality": "OneWay" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Directionality used by [`SceneGraph::connect_default`](crate::SceneGraph::connect_default).
    pub default_directionality: Directionality,
    /// Safety limit for unbounded traversals.
    pub max_expand_depth: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            default_directionality: Directionality::Bidirectional,
            max_expand_depth: DEFAULT_MAX_EXPAND_DEPTH,
        }
    }
}

impl GraphConfig {
    /// Parse a JSON config document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = GraphConfig::from_json_str(r#"{"default_directionality": "OneWay"}"#).unwrap();
        assert_eq!(config.default_directionality, Directionality::OneWay);
        assert_eq!(config.max_expand_depth, DEFAULT_MAX_EXPAND_DEPTH);
    }

    #[test]
    fn test_empty_config() {
        assert_eq!(GraphConfig::from_json_str("{}").unwrap(), GraphConfig::default());
    }

    #[test]
    fn test_malformed_config() {
        assert!(matches!(
            GraphConfig::from_json_str("{not json"),
            Err(crate::Error::Serialization(_))
        ));
    }
}
