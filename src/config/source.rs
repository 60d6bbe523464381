//! Data source configuration

use crate::render::DisplayKind;
use serde::{Deserialize, Serialize};

/// One polled JSON endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Stable target key, also used as the metrics label
    pub name: String,
    /// Human-readable title shown above the target (defaults to `name`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub url: String,
    #[serde(default)]
    pub display: DisplayKind,
    /// Historical index query parameter appended on every call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<IndexConfig>,
}

impl SourceConfig {
    /// Title to display, falling back to the source name.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }
}

/// Index query parameter settings.
///
/// Exactly one of `fixed` or `random_max` must be set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfig {
    #[serde(default = "default_index_param")]
    pub param: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed: Option<u64>,
    /// Pick a uniform random index in `0..=random_max` per call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub random_max: Option<u64>,
}

fn default_index_param() -> String {
    "index".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_defaults_to_table() {
        let toml = r#"
        name = "processing"
        url = "http://localhost:8100/stats"
        "#;
        let source: SourceConfig = toml::from_str(toml).unwrap();
        assert_eq!(source.display, DisplayKind::Table);
        assert!(source.index.is_none());
        assert_eq!(source.display_title(), "processing");
    }

    #[test]
    fn test_source_with_random_index() {
        let toml = r#"
        name = "admission"
        title = "Admission event"
        url = "http://localhost:9100/hospital/admission/history"
        display = "text"

        [index]
        random_max = 10
        "#;
        let source: SourceConfig = toml::from_str(toml).unwrap();
        assert_eq!(source.display, DisplayKind::Text);
        assert_eq!(source.display_title(), "Admission event");

        let index = source.index.unwrap();
        assert_eq!(index.param, "index");
        assert_eq!(index.random_max, Some(10));
        assert_eq!(index.fixed, None);
    }

    #[test]
    fn test_source_unknown_display_rejected() {
        let toml = r#"
        name = "x"
        url = "http://localhost/x"
        display = "chart"
        "#;
        assert!(toml::from_str::<SourceConfig>(toml).is_err());
    }
}
