use super::assembler::Precision;

/// Session settings resolved once at startup, use [Builder](super::Builder) to construct
///
/// Immutable for the rest of the run and handed to each stage by reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub region: String,
    pub profile: String,
    pub cloudwatch_namespace: String,
    /// Run everything up to and including the preview, but never submit
    pub skip_publish: bool,
    /// Approve the submission without prompting
    pub non_interactive: bool,
    pub precision: Precision,
}
