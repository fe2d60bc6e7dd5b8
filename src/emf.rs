//! # EMF
//!
//! Helpers for serializing CloudWatch Embedded Metrics via serde_json, plus a [Sink] that writes
//! one document per record instead of calling PutMetricData
//!
//! <https://docs.aws.amazon.com/AmazonCloudWatch/latest/monitoring/CloudWatch_Embedded_Metric_Format_Specification.html>

use super::assembler::AssembledRecord;
use super::publisher::Sink;
use super::BoxError;
use serde::Serialize;
use serde_json::value::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;

/// The Embedded Metric Format supports a maximum of 30 dimensions per metric
const MAX_DIMENSIONS: usize = 30;

#[derive(Serialize)]
pub struct EmbeddedMetrics<'a> {
    #[serde(rename = "_aws")]
    pub aws: EmbeddedMetricsAws<'a>,
    #[serde(flatten)]
    pub dimensions: BTreeMap<&'a str, &'a str>,
    #[serde(flatten)]
    pub values: BTreeMap<&'a str, Value>,
}

#[derive(Serialize)]
pub struct EmbeddedMetricsAws<'a> {
    #[serde(rename = "Timestamp")]
    pub timestamp: u64,
    // Every document carries exactly one namespace
    #[serde(rename = "CloudWatchMetrics")]
    pub cloudwatch_metrics: [EmbeddedNamespace<'a>; 1],
}

#[derive(Serialize)]
pub struct EmbeddedNamespace<'a> {
    #[serde(rename = "Namespace")]
    pub namespace: &'a str,
    // A single dimension set holding all of the record's dimensions
    #[serde(rename = "Dimensions")]
    pub dimensions: [Vec<&'a str>; 1],
    #[serde(rename = "Metrics")]
    pub metrics: Vec<EmbeddedMetric<'a>>,
}

#[derive(Serialize)]
pub struct EmbeddedMetric<'a> {
    #[serde(rename = "Name")]
    pub name: &'a str,
    #[serde(rename = "Unit")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<&'a str>,
}

/// Convert a metrics::Unit into the cloudwatch string
///
/// <https://docs.aws.amazon.com/AmazonCloudWatch/latest/APIReference/API_MetricDatum.html>
pub fn unit_to_str(unit: &metrics::Unit) -> &'static str {
    match unit {
        metrics::Unit::Count => "Count",
        metrics::Unit::Percent => "Percent",
        metrics::Unit::Seconds => "Seconds",
        metrics::Unit::Milliseconds => "Milliseconds",
        metrics::Unit::Microseconds => "Microseconds",
        metrics::Unit::Nanoseconds => "Nanoseconds",
        metrics::Unit::Tebibytes => "Terabytes",
        metrics::Unit::Gibibytes => "Gigabytes",
        metrics::Unit::Mebibytes => "Megabytes",
        metrics::Unit::Kibibytes => "Kilobytes",
        metrics::Unit::Bytes => "Bytes",
        metrics::Unit::TerabitsPerSecond => "Terabits/Second",
        metrics::Unit::GigabitsPerSecond => "Gigabits/Second",
        metrics::Unit::MegabitsPerSecond => "Megabits/Second",
        metrics::Unit::KilobitsPerSecond => "Kilobits/Second",
        metrics::Unit::BitsPerSecond => "Bits/Second",
        metrics::Unit::CountPerSecond => "Count/Second",
    }
}

/// Milliseconds since the epoch, clamped to 0 for clocks set before 1970
pub fn epoch_millis(timestamp: SystemTime) -> u64 {
    timestamp
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// [Sink] writing newline delimited Embedded Metric Format documents to an implementation of
/// [std::io::Write], ready for the CloudWatch agent or a Lambda log stream
///
/// A document can hold one value per dimension name, so when a mapping repeats a dimension name
/// the last declaration wins. Dimensions named `_aws` or after the metric itself would collide
/// with those keys and are left out with a warning.
///
/// A batch where any record has more than [MAX_DIMENSIONS] distinct dimension names is rejected
/// before anything is written.
pub struct EmfSink<W> {
    writer: W,
}

impl<W: std::io::Write> EmfSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_record(&mut self, namespace: &str, record: &AssembledRecord) -> std::io::Result<()> {
        let mut emf = EmbeddedMetrics {
            aws: EmbeddedMetricsAws {
                timestamp: epoch_millis(record.timestamp),
                cloudwatch_metrics: [EmbeddedNamespace {
                    namespace,
                    dimensions: [Vec::with_capacity(MAX_DIMENSIONS)],
                    metrics: Vec::with_capacity(1),
                }],
            },
            dimensions: BTreeMap::new(),
            values: BTreeMap::new(),
        };

        for dimension in &record.dimensions {
            if dimension.name == "_aws" || dimension.name == record.name {
                warn!(
                    "Leaving dimension {} out of {}, it collides with an EMF key",
                    dimension.name, record.name
                );
                continue;
            }
            if emf.dimensions.insert(&dimension.name, &dimension.value).is_none() {
                emf.aws.cloudwatch_metrics[0].dimensions[0].push(&dimension.name);
            }
        }

        emf.aws.cloudwatch_metrics[0].metrics.push(EmbeddedMetric {
            name: &record.name,
            unit: Some(unit_to_str(&record.unit)),
        });
        emf.values.insert(&record.name, record.value.into());

        serde_json::to_writer(&mut self.writer, &emf)?;
        writeln!(self.writer)
    }
}

impl<W: std::io::Write> Sink for EmfSink<W> {
    fn put_metric_data(&mut self, namespace: &str, records: &[AssembledRecord]) -> Result<(), BoxError> {
        for record in records {
            let names: BTreeSet<&str> = record.dimensions.iter().map(|d| d.name.as_str()).collect();
            if names.len() > MAX_DIMENSIONS {
                return Err(format!(
                    "{} has {} dimensions, EMF allows at most {MAX_DIMENSIONS}",
                    record.name,
                    names.len()
                )
                .into());
            }
        }

        for record in records {
            self.write_record(namespace, record)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Dimension;
    use std::time::Duration;

    #[test]
    fn embedded_metrics() {
        let timestamp = UNIX_EPOCH + Duration::from_millis(1687394207903);
        let records = vec![
            AssembledRecord {
                name: "Steps".to_string(),
                value: 10432.0,
                timestamp,
                unit: metrics::Unit::Count,
                dimensions: vec![Dimension::new("Goal", "Fitness"), Dimension::new("Device", "Watch")],
            },
            AssembledRecord {
                name: "Sleep".to_string(),
                value: 7.25,
                timestamp,
                unit: metrics::Unit::Count,
                dimensions: vec![],
            },
        ];

        let mut sink = EmfSink::new(Vec::new());
        sink.put_metric_data("Personal", &records).unwrap();
        let output = sink.into_inner();
        assert_eq!(
            std::str::from_utf8(&output).unwrap(),
            r#"{"_aws":{"Timestamp":1687394207903,"CloudWatchMetrics":[{"Namespace":"Personal","Dimensions":[["Goal","Device"]],"Metrics":[{"Name":"Steps","Unit":"Count"}]}]},"Device":"Watch","Goal":"Fitness","Steps":10432.0}
{"_aws":{"Timestamp":1687394207903,"CloudWatchMetrics":[{"Namespace":"Personal","Dimensions":[[]],"Metrics":[{"Name":"Sleep","Unit":"Count"}]}]},"Sleep":7.25}
"#
        );
    }

    #[test]
    fn repeated_dimension_name_keeps_last_value() {
        let record = AssembledRecord {
            name: "Steps".to_string(),
            value: 1.0,
            timestamp: UNIX_EPOCH,
            unit: metrics::Unit::Count,
            dimensions: vec![Dimension::new("Goal", "Fitness"), Dimension::new("Goal", "Health")],
        };

        let mut sink = EmfSink::new(Vec::new());
        sink.put_metric_data("Personal", &[record]).unwrap();
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.contains(r#""Dimensions":[["Goal"]]"#), "{output}");
        assert!(output.contains(r#""Goal":"Health""#), "{output}");
    }

    #[test]
    fn colliding_dimension_names_are_left_out() {
        let record = AssembledRecord {
            name: "Steps".to_string(),
            value: 3.0,
            timestamp: UNIX_EPOCH,
            unit: metrics::Unit::Count,
            dimensions: vec![
                Dimension::new("_aws", "oops"),
                Dimension::new("Steps", "oops"),
                Dimension::new("Goal", "Fitness"),
            ],
        };

        let mut sink = EmfSink::new(Vec::new());
        sink.put_metric_data("Personal", &[record]).unwrap();
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(!output.contains("oops"), "{output}");

        let document: Value = serde_json::from_str(output.trim_end()).unwrap();
        assert_eq!(document["Steps"], 3.0);
        assert_eq!(document["Goal"], "Fitness");
        assert_eq!(document["_aws"]["CloudWatchMetrics"][0]["Dimensions"], serde_json::json!([["Goal"]]));
    }

    #[test]
    fn too_many_dimensions_writes_nothing() {
        let ok = AssembledRecord {
            name: "Steps".to_string(),
            value: 1.0,
            timestamp: UNIX_EPOCH,
            unit: metrics::Unit::Count,
            dimensions: vec![],
        };
        let wide = AssembledRecord {
            name: "Wide".to_string(),
            dimensions: (0..=MAX_DIMENSIONS).map(|i| Dimension::new(format!("D{i}"), "x")).collect(),
            ..ok.clone()
        };

        let mut sink = EmfSink::new(Vec::new());
        let err = sink.put_metric_data("Personal", &[ok.clone(), wide]).unwrap_err();
        assert!(err.to_string().contains("Wide has 31 dimensions"), "{err}");
        assert!(sink.into_inner().is_empty());

        // Repeats of one name count once
        let repeated = AssembledRecord {
            dimensions: (0..=MAX_DIMENSIONS).map(|_| Dimension::new("Goal", "Fitness")).collect(),
            ..ok
        };
        assert!(EmfSink::new(Vec::new()).put_metric_data("Personal", &[repeated]).is_ok());
    }

    #[test]
    fn unit_is_written() {
        let record = AssembledRecord {
            name: "SleepTime".to_string(),
            value: 27000.0,
            timestamp: UNIX_EPOCH,
            unit: metrics::Unit::Seconds,
            dimensions: vec![],
        };

        let mut sink = EmfSink::new(Vec::new());
        sink.put_metric_data("Personal", &[record]).unwrap();
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.contains(r#""Metrics":[{"Name":"SleepTime","Unit":"Seconds"}]"#), "{output}");
    }

    #[test]
    fn write_failure_is_reported() {
        struct Full;
        impl std::io::Write for Full {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::WriteZero, "disk full"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let record = AssembledRecord {
            name: "Steps".to_string(),
            value: 1.0,
            timestamp: UNIX_EPOCH,
            unit: metrics::Unit::Count,
            dimensions: vec![],
        };
        assert!(EmfSink::new(Full).put_metric_data("Personal", &[record]).is_err());
    }
}
