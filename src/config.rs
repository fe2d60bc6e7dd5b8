//! # Config
//!
//! The user's tracked metric definitions plus connection/publish settings, as read from
//! `config.yml`
//!
//! ```yaml
//! region: ap-southeast-2
//! profile: personal
//! skipPublish: false
//! metricNamespace: Personal
//! metricMappings:
//!   steps:
//!     name: Steps
//!     dimensions:
//!       - name: Goal
//!         value: Fitness
//!   sleep:
//!     name: SleepTime
//!     unit: seconds
//! ```

use super::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub profile: Option<String>,
    #[serde(default)]
    pub skip_publish: bool,
    #[serde(default)]
    pub metric_namespace: Option<String>,
    /// Decimal places values are rounded to, 1 (legacy) or 2
    #[serde(default)]
    pub precision: Option<u32>,
    #[serde(default)]
    pub metric_mappings: HashMap<String, MetricMapping>,
}

/// Maps a data key onto the CloudWatch metric it is reported as
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MetricMapping {
    pub name: String,
    #[serde(default)]
    pub dimensions: Vec<Dimension>,
    /// Canonical [metrics::Unit] label, e.g. `count`, `percent`, `seconds`, `kibibytes`
    #[serde(default = "default_unit", deserialize_with = "deserialize_unit")]
    pub unit: metrics::Unit,
}

impl MetricMapping {
    /// Mapping reported with the default `Count` unit
    pub fn new(name: impl Into<String>, dimensions: Vec<Dimension>) -> Self {
        Self {
            name: name.into(),
            dimensions,
            unit: default_unit(),
        }
    }
}

fn default_unit() -> metrics::Unit {
    metrics::Unit::Count
}

fn deserialize_unit<'de, D>(deserializer: D) -> Result<metrics::Unit, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let label = String::deserialize(deserializer)?;
    metrics::Unit::from_string(&label)
        .ok_or_else(|| serde::de::Error::custom(format!("unknown unit `{label}`")))
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Dimension {
    pub name: String,
    pub value: String,
}

impl Dimension {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        load_yaml(path.as_ref())
    }
}

/// Read and deserialize a YAML document, tagging failures with the path
pub(crate) fn load_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::InputRead {
        path: path.to_owned(),
        source,
    })?;
    serde_yaml::from_str(&content).map_err(|source| Error::InputParse {
        path: path.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_config() {
        let config: Config = serde_yaml::from_str(
            r#"
region: ap-southeast-2
profile: personal
skipPublish: true
metricNamespace: Personal
metricMappings:
  steps:
    name: Steps
    dimensions:
      - name: Goal
        value: Fitness
      - name: Goal
        value: Health
  weight:
    name: Weight
"#,
        )
        .unwrap();

        assert_eq!(config.region.as_deref(), Some("ap-southeast-2"));
        assert_eq!(config.profile.as_deref(), Some("personal"));
        assert!(config.skip_publish);
        assert_eq!(config.metric_namespace.as_deref(), Some("Personal"));
        assert_eq!(config.precision, None);
        assert_eq!(
            config.metric_mappings["steps"].dimensions,
            vec![Dimension::new("Goal", "Fitness"), Dimension::new("Goal", "Health")]
        );
        assert!(config.metric_mappings["weight"].dimensions.is_empty());
        assert_eq!(config.metric_mappings["weight"].unit, metrics::Unit::Count);
    }

    #[test]
    fn mapping_units() {
        let config: Config = serde_yaml::from_str(
            r#"
metricMappings:
  sleep:
    name: SleepTime
    unit: seconds
  battery:
    name: Battery
    unit: percent
"#,
        )
        .unwrap();
        assert_eq!(config.metric_mappings["sleep"].unit, metrics::Unit::Seconds);
        assert_eq!(config.metric_mappings["battery"].unit, metrics::Unit::Percent);

        let err = serde_yaml::from_str::<Config>("metricMappings:\n  a:\n    name: A\n    unit: furlongs\n")
            .unwrap_err();
        assert!(err.to_string().contains("unknown unit `furlongs`"), "{err}");
    }

    #[test]
    fn empty_document_fields_default() {
        let config: Config = serde_yaml::from_str("metricNamespace: Personal").unwrap();
        assert!(config.region.is_none());
        assert!(!config.skip_publish);
        assert!(config.metric_mappings.is_empty());
    }

    #[test]
    fn missing_file_is_input_read_error() {
        let err = Config::load("does/not/exist.yml").unwrap_err();
        assert!(matches!(err, Error::InputRead { .. }), "{err:?}");
    }

    #[test]
    fn malformed_mapping_is_input_parse_error() {
        let path = std::env::temp_dir().join(format!("cwpublish-config-{}.yml", std::process::id()));
        std::fs::write(&path, "metricMappings:\n  steps:\n    dimensions: 12\n").unwrap();
        let err = Config::load(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(err, Error::InputParse { .. }), "{err:?}");
    }
}
