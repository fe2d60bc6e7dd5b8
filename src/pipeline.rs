//! # Pipeline
//!
//! One run, start to finish: assemble, preview, confirm, publish
//!
//! ```plaintext
//! Assembled -> Previewed -> SkippedByConfig
//!                        -> AwaitingConfirmation -> Approved -> Published | PublishFailed
//!                                                -> Declined -> Cancelled
//!            -> Empty
//! ```

use super::assembler::assemble;
use super::config::MetricMapping;
use super::confirm::{Confirmation, Decision};
use super::data::PerformanceData;
use super::preview;
use super::publisher::{publish, Sink};
use super::settings::Settings;
use super::Result;
use std::collections::HashMap;
use std::io::{BufRead, Write};
use tracing::info;

/// How a run that didn't fail ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Published { count: usize },
    /// skip_publish was set, nothing was sent
    Skipped,
    /// The confirmation was declined, or the input closed before it was answered
    Cancelled,
    /// No observed key had a mapping
    ///
    /// Ends the run straight after the preview, without prompting or calling the sink, since
    /// PutMetricData rejects an empty batch. Prompting first would only lead to that failure.
    Empty,
}

/// Drives a single run against the given input (for the confirmation) and output (for the
/// preview and status messages)
pub struct Pipeline<'a, R, W> {
    settings: &'a Settings,
    input: R,
    output: W,
}

impl<'a> Pipeline<'a, std::io::StdinLock<'static>, std::io::Stdout> {
    /// Pipeline prompting on the process' stdin/stdout
    pub fn stdio(settings: &'a Settings) -> Self {
        Self::new(settings, std::io::stdin().lock(), std::io::stdout())
    }
}

impl<'a, R: BufRead, W: Write> Pipeline<'a, R, W> {
    pub fn new(settings: &'a Settings, input: R, output: W) -> Self {
        Self {
            settings,
            input,
            output,
        }
    }

    /// Run the pipeline once
    ///
    /// `connect` is only called once the batch has been approved, so skipped and cancelled runs
    /// never touch the remote service
    pub fn run<S: Sink>(
        mut self,
        data: &PerformanceData,
        mappings: &HashMap<String, MetricMapping>,
        connect: impl FnOnce(&Settings) -> Result<S>,
    ) -> Result<Outcome> {
        let records = assemble(data, mappings, self.settings.precision);
        info!("Assembled {} of {} observed values", records.len(), data.len());

        preview::render(&records, self.settings.precision, &mut self.output)?;

        if self.settings.skip_publish {
            writeln!(self.output, "You have elected to not publish these metrics, exiting...")?;
            return Ok(Outcome::Skipped);
        }

        if records.is_empty() {
            writeln!(self.output, "No metrics to publish.")?;
            return Ok(Outcome::Empty);
        }

        let decision = Confirmation::new(self.settings.non_interactive).run(&mut self.input, &mut self.output)?;
        if decision == Decision::Declined {
            writeln!(self.output, "Operation cancelled.")?;
            return Ok(Outcome::Cancelled);
        }

        let sink = connect(self.settings)?;
        publish(&records, self.settings, sink)?;
        writeln!(self.output, "Metrics published successfully!")?;

        Ok(Outcome::Published { count: records.len() })
    }
}
