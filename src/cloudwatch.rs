//! # CloudWatch
//!
//! [Sink] submitting the batch with a single `PutMetricData` call through the AWS SDK
//!
//! *this module requires the `cloudwatch` feature flag*

use super::assembler::AssembledRecord;
use super::emf;
use super::publisher::Sink;
use super::settings::Settings;
use super::{BoxError, Error, Result};
use aws_sdk_cloudwatch::config::Region;
use aws_sdk_cloudwatch::error::{BuildError, DisplayErrorContext};
use aws_sdk_cloudwatch::primitives::DateTime;
use aws_sdk_cloudwatch::types::{Dimension, MetricDatum, StandardUnit};
use tracing::{debug, info};

/// Sends metrics to CloudWatch using the profile and region from [Settings]
///
/// The pipeline is synchronous, so the sink owns a current thread tokio runtime and blocks on
/// each SDK call. Retries and backoff are left to the SDK's defaults.
pub struct CloudWatchSink {
    runtime: tokio::runtime::Runtime,
    client: aws_sdk_cloudwatch::Client,
}

impl CloudWatchSink {
    /// Load the shared AWS config for the settings' profile and region and build a client
    pub fn new(settings: &Settings) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Publish(e.into()))?;

        let sdk_config = runtime.block_on(
            aws_config::defaults(aws_config::BehaviorVersion::latest())
                .profile_name(&settings.profile)
                .region(Region::new(settings.region.clone()))
                .load(),
        );
        debug!(
            "Loaded AWS config for profile {} in {}",
            settings.profile, settings.region
        );

        Ok(Self {
            runtime,
            client: aws_sdk_cloudwatch::Client::new(&sdk_config),
        })
    }
}

/// Convert an [AssembledRecord] into the SDK's MetricDatum
/// * Dimensions are forwarded in declaration order, duplicates included
pub fn metric_datum(record: &AssembledRecord) -> Result<MetricDatum, BuildError> {
    let dimensions = record
        .dimensions
        .iter()
        .map(|d| Dimension::builder().name(&d.name).value(&d.value).build())
        .collect::<Vec<_>>();

    Ok(MetricDatum::builder()
        .metric_name(&record.name)
        .value(record.value)
        .timestamp(DateTime::from(record.timestamp))
        .unit(StandardUnit::from(emf::unit_to_str(&record.unit)))
        .set_dimensions(Some(dimensions))
        .build())
}

impl Sink for CloudWatchSink {
    fn put_metric_data(&mut self, namespace: &str, records: &[AssembledRecord]) -> Result<(), BoxError> {
        let metric_data = records.iter().map(metric_datum).collect::<Result<Vec<_>, _>>()?;
        let request = self
            .client
            .put_metric_data()
            .namespace(namespace)
            .set_metric_data(Some(metric_data));

        self.runtime
            .block_on(request.send())
            .map_err(|e| DisplayErrorContext(e).to_string())?;
        info!("PutMetricData accepted {} metrics", records.len());
        Ok(())
    }
}
