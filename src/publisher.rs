//! # Publisher
//!
//! Hands the assembled batch to a [Sink] in a single call

use super::assembler::AssembledRecord;
use super::settings::Settings;
use super::{BoxError, Error, Result};
use tracing::info;

/// Destination for a batch of records, e.g. [CloudWatchSink](super::CloudWatchSink) or
/// [EmfSink](super::EmfSink)
pub trait Sink {
    /// Submit every record as one batch tagged with `namespace`
    /// * Called at most once per run, retries are up to the implementation's transport
    fn put_metric_data(&mut self, namespace: &str, records: &[AssembledRecord]) -> Result<(), BoxError>;
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn put_metric_data(&mut self, namespace: &str, records: &[AssembledRecord]) -> Result<(), BoxError> {
        (**self).put_metric_data(namespace, records)
    }
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn put_metric_data(&mut self, namespace: &str, records: &[AssembledRecord]) -> Result<(), BoxError> {
        (**self).put_metric_data(namespace, records)
    }
}

/// Submit the batch to `sink` under the configured namespace
///
/// Callers are expected to have checked skip_publish and the confirmation already
pub fn publish(records: &[AssembledRecord], settings: &Settings, mut sink: impl Sink) -> Result<()> {
    info!(
        "Publishing {} metrics to namespace {}",
        records.len(),
        settings.cloudwatch_namespace
    );

    sink.put_metric_data(&settings.cloudwatch_namespace, records)
        .map_err(Error::Publish)
}
