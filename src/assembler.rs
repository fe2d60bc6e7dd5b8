//! # Assembler
//!
//! Joins the observed [PerformanceData] against the configured [MetricMapping]s to build the
//! batch of records that is previewed and published

use super::config::{Dimension, MetricMapping};
use super::data::PerformanceData;
use super::Error;
use std::collections::HashMap;
use std::time::SystemTime;
use tracing::{debug, warn};

/// Number of decimal places every value in a batch is rounded to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Precision(u32);

impl Precision {
    /// One decimal place, used by the original data format
    pub const LEGACY: Precision = Precision(1);
    /// Two decimal places
    pub const CURRENT: Precision = Precision(2);

    pub fn decimal_places(self) -> usize {
        self.0 as usize
    }

    /// Round half away from zero at this precision
    /// * Values too large to scale have no fractional digits left and come back unchanged
    pub fn round(self, value: f64) -> f64 {
        let scale = 10f64.powi(self.0 as i32);
        let scaled = value * scale;
        if scaled.is_finite() {
            scaled.round() / scale
        } else {
            value
        }
    }
}

impl Default for Precision {
    fn default() -> Self {
        Precision::CURRENT
    }
}

impl TryFrom<u32> for Precision {
    type Error = Error;

    fn try_from(decimal_places: u32) -> Result<Self, Self::Error> {
        match decimal_places {
            1 => Ok(Precision::LEGACY),
            2 => Ok(Precision::CURRENT),
            other => Err(Error::Configuration(format!(
                "precision must be 1 or 2 decimal places, got {other}"
            ))),
        }
    }
}

/// A fully formed metric datum, ready to preview or publish
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledRecord {
    pub name: String,
    /// Already rounded, this is both displayed and sent
    pub value: f64,
    pub timestamp: SystemTime,
    pub unit: metrics::Unit,
    pub dimensions: Vec<Dimension>,
}

impl AssembledRecord {
    /// `name=value` pairs space joined in declaration order
    pub fn dimension_summary(&self) -> String {
        self.dimensions
            .iter()
            .map(|d| format!("{}={}", d.name, d.value))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Build one record per observed key that has a mapping, stamped with the current time
pub fn assemble(
    data: &PerformanceData,
    mappings: &HashMap<String, MetricMapping>,
    precision: Precision,
) -> Vec<AssembledRecord> {
    assemble_at(data, mappings, precision, SystemTime::now())
}

/// [assemble] with an explicit timestamp shared by the whole batch
pub fn assemble_at(
    data: &PerformanceData,
    mappings: &HashMap<String, MetricMapping>,
    precision: Precision,
    timestamp: SystemTime,
) -> Vec<AssembledRecord> {
    let mut records = Vec::with_capacity(data.len());

    // PerformanceData iterates sorted by key which keeps previews reproducible
    for (key, value) in data.iter() {
        let Some(mapping) = mappings.get(key) else {
            debug!("Skipping {key} as it has no metric mapping");
            continue;
        };

        let rounded = precision.round(value);
        if !rounded.is_finite() {
            warn!("Skipping {key} as {value} can not be published");
            continue;
        }

        records.push(AssembledRecord {
            name: mapping.name.clone(),
            value: rounded,
            timestamp,
            unit: mapping.unit,
            // Duplicate dimension names are forwarded, CloudWatch decides what to do with them
            dimensions: mapping.dimensions.clone(),
        });
    }

    records
}
