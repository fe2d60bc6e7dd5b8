//! Command line for the `cwpublish` binary

use clap::{Args, Parser};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(about = "Preview and publish personal metrics to CloudWatch", version)]
pub struct Cli {
    #[arg(
        long,
        default_value = "config.yml",
        value_hint = clap::ValueHint::FilePath,
        help = "Metric mappings and publish settings"
    )]
    pub config: PathBuf,

    #[arg(
        long,
        default_value = "data.yml",
        value_hint = clap::ValueHint::FilePath,
        help = "Values observed this cycle"
    )]
    pub data: PathBuf,

    #[arg(
        long,
        help = "Write Embedded Metric Format documents to stdout instead of calling PutMetricData, \
                the preview and prompt go to stderr"
    )]
    pub emf: bool,

    #[command(flatten)]
    pub overrides: Overrides,
}

/// Fallbacks that only apply where the config document leaves a field empty
#[derive(Debug, Clone, Default, Args)]
pub struct Overrides {
    #[arg(long, env = "AWS_REGION", help = "AWS Region to push metrics")]
    pub region: Option<String>,

    #[arg(long, env = "AWS_PROFILE", help = "Configured AWS profile to use")]
    pub profile: Option<String>,

    #[arg(long, help = "Skip publishing metrics")]
    pub skip_publish: bool,

    #[arg(long, help = "Perform work without interactions")]
    pub non_interactive: bool,
}
