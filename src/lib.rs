use std::path::PathBuf;

/// Everything that can end a run early
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required setting is missing or out of range
    #[error("{0}")]
    Configuration(String),
    #[error("unable to read {}: {source}", path.display())]
    InputRead { path: PathBuf, source: std::io::Error },
    #[error("unable to parse {}: {source}", path.display())]
    InputParse { path: PathBuf, source: serde_yaml::Error },
    /// The remote submission (or setting up the client for it) failed
    #[error("failed to publish metrics: {0}")]
    Publish(BoxError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub use {
    assembler::{assemble, AssembledRecord, Precision},
    builder::Builder,
    config::{Config, Dimension, MetricMapping},
    confirm::{Confirmation, Decision},
    data::PerformanceData,
    emf::EmfSink,
    pipeline::{Outcome, Pipeline},
    publisher::{publish, Sink},
    settings::Settings,
};

#[cfg(feature = "cloudwatch")]
pub use cloudwatch::CloudWatchSink;

mod assembler;
mod builder;
pub mod cli;
#[cfg(feature = "cloudwatch")]
mod cloudwatch;
mod config;
mod confirm;
mod data;
mod emf;
mod pipeline;
pub mod preview;
mod publisher;
mod settings;
