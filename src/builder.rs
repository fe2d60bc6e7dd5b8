use super::assembler::Precision;
use super::cli::Overrides;
use super::config::Config;
use super::settings::Settings;
use super::{Error, Result};

/// Builder for the session [Settings]
///
/// Values from the config document win, CLI flags and environment variables only fill in what
/// the document left empty
///
/// # Example
/// ```
///  let settings = metrics_cloudwatch_publish::Builder::new()
///      .region("ap-southeast-2")
///      .profile("personal")
///      .cloudwatch_namespace("Personal")
///      .build()
///      .unwrap();
/// ```
#[derive(Debug, Default)]
pub struct Builder {
    region: Option<String>,
    profile: Option<String>,
    cloudwatch_namespace: Option<String>,
    skip_publish: bool,
    non_interactive: bool,
    precision: Precision,
}

impl Builder {
    pub fn new() -> Self {
        Builder::default()
    }

    /// Seeds the builder with everything the config document sets
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Builder {
            region: non_empty(config.region.clone()),
            profile: non_empty(config.profile.clone()),
            cloudwatch_namespace: non_empty(config.metric_namespace.clone()),
            skip_publish: config.skip_publish,
            non_interactive: false,
            precision: match config.precision {
                Some(places) => Precision::try_from(places)?,
                None => Precision::default(),
            },
        })
    }

    /// Fills in unset fields from the command line / environment
    /// * skip_publish and non_interactive can only be switched on
    pub fn with_overrides(self, overrides: &Overrides) -> Self {
        Self {
            region: self.region.or_else(|| non_empty(overrides.region.clone())),
            profile: self.profile.or_else(|| non_empty(overrides.profile.clone())),
            skip_publish: self.skip_publish || overrides.skip_publish,
            non_interactive: self.non_interactive || overrides.non_interactive,
            ..self
        }
    }

    /// AWS region to publish to
    /// * Must be set or build() will return Err(Configuration)
    pub fn region(self, region: impl Into<String>) -> Self {
        Self {
            region: non_empty(Some(region.into())),
            ..self
        }
    }

    /// Profile from the shared AWS config/credentials files
    /// * Must be set or build() will return Err(Configuration)
    pub fn profile(self, profile: impl Into<String>) -> Self {
        Self {
            profile: non_empty(Some(profile.into())),
            ..self
        }
    }

    /// Sets the CloudWatch namespace for all metrics
    /// * Must be set or build() will return Err(Configuration)
    pub fn cloudwatch_namespace(self, namespace: impl Into<String>) -> Self {
        Self {
            cloudwatch_namespace: non_empty(Some(namespace.into())),
            ..self
        }
    }

    pub fn skip_publish(self, skip_publish: bool) -> Self {
        Self { skip_publish, ..self }
    }

    pub fn non_interactive(self, non_interactive: bool) -> Self {
        Self {
            non_interactive,
            ..self
        }
    }

    pub fn precision(self, precision: Precision) -> Self {
        Self { precision, ..self }
    }

    pub fn build(self) -> Result<Settings> {
        Ok(Settings {
            region: self.region.ok_or_else(|| missing("region", "--region or AWS_REGION"))?,
            profile: self.profile.ok_or_else(|| missing("profile", "--profile or AWS_PROFILE"))?,
            cloudwatch_namespace: self
                .cloudwatch_namespace
                .ok_or_else(|| Error::Configuration("cloudwatch_namespace missing, set metricNamespace".into()))?,
            skip_publish: self.skip_publish,
            non_interactive: self.non_interactive,
            precision: self.precision,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn missing(setting: &str, fallback: &str) -> Error {
    Error::Configuration(format!("{setting} missing, set it in the config file or with {fallback}"))
}
