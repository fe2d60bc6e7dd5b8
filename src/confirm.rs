//! # Confirmation
//!
//! Interactive yes/no gate in front of the publish step, modelled as a small state machine so
//! each transition can be exercised without a terminal

use std::io::{BufRead, Write};
use tracing::warn;

const PROMPT: &str = "Do you want to proceed? [y/n]: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approved,
    Declined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    AwaitingInput,
    Decided(Decision),
}

impl Confirmation {
    /// Initial state, non-interactive runs are approved up front
    pub fn new(non_interactive: bool) -> Self {
        if non_interactive {
            Confirmation::Decided(Decision::Approved)
        } else {
            Confirmation::AwaitingInput
        }
    }

    /// Apply one line of user input
    /// * Unrecognised input leaves the gate waiting
    /// * Once decided, further input is ignored
    pub fn feed(self, line: &str) -> Self {
        match self {
            Confirmation::AwaitingInput => match line.trim().to_lowercase().as_str() {
                "y" | "yes" => Confirmation::Decided(Decision::Approved),
                "n" | "no" => Confirmation::Decided(Decision::Declined),
                _ => Confirmation::AwaitingInput,
            },
            decided => decided,
        }
    }

    /// The input stream ended or failed before a decision, treated as a decline
    pub fn input_closed(self) -> Self {
        match self {
            Confirmation::AwaitingInput => Confirmation::Decided(Decision::Declined),
            decided => decided,
        }
    }

    pub fn decision(self) -> Option<Decision> {
        match self {
            Confirmation::Decided(decision) => Some(decision),
            Confirmation::AwaitingInput => None,
        }
    }

    /// Prompt on `output` and read `input` line by line until decided
    ///
    /// Blocks for as long as the input does, there is no timeout. Only failures writing the
    /// prompt are returned as errors, read failures decline.
    pub fn run(self, mut input: impl BufRead, mut output: impl Write) -> std::io::Result<Decision> {
        let mut state = self;
        let mut line = Vec::new();

        loop {
            if let Some(decision) = state.decision() {
                return Ok(decision);
            }

            write!(output, "{PROMPT}")?;
            output.flush()?;

            line.clear();
            // Bytes that aren't UTF-8 are just another unrecognised answer
            state = match input.read_until(b'\n', &mut line) {
                Ok(0) => {
                    warn!("Input closed before a decision was made, not publishing");
                    state.input_closed()
                }
                Ok(_) => {
                    let next = state.feed(&String::from_utf8_lossy(&line));
                    if next == Confirmation::AwaitingInput {
                        writeln!(output, "Invalid input. Please enter 'y' or 'n'.")?;
                    }
                    next
                }
                Err(err) => {
                    warn!("Error reading input, not publishing: {err}");
                    state.input_closed()
                }
            };
        }
    }
}
