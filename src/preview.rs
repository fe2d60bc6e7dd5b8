//! # Preview
//!
//! Boxed table of everything that is about to be published
//!
//! ```plaintext
//! Metrics to be published:
//! ┌─────────────┬───────┬──────────────┐
//! │ Metric name │ Value │ Dimensions   │
//! ├─────────────┼───────┼──────────────┤
//! │ A           │ 1.25  │              │
//! │ B           │ 2.00  │ Goal=Fitness │
//! └─────────────┴───────┴──────────────┘
//! ```

use super::assembler::{AssembledRecord, Precision};

const HEADER: [&str; 3] = ["Metric name", "Value", "Dimensions"];

/// Write the preview table to an implementation of [std::io::Write]
/// * An empty batch renders the header only
pub fn render(
    records: &[AssembledRecord],
    precision: Precision,
    mut writer: impl std::io::Write,
) -> std::io::Result<()> {
    let rows: Vec<[String; 3]> = records
        .iter()
        .map(|record| {
            [
                record.name.clone(),
                format!("{:.*}", precision.decimal_places(), record.value),
                record.dimension_summary(),
            ]
        })
        .collect();

    let mut widths = HEADER.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    writeln!(writer, "Metrics to be published:")?;
    write_rule(&mut writer, &widths, ('┌', '┬', '┐'))?;
    write_row(&mut writer, &widths, &HEADER)?;
    write_rule(&mut writer, &widths, ('├', '┼', '┤'))?;
    for row in &rows {
        write_row(&mut writer, &widths, row)?;
    }
    write_rule(&mut writer, &widths, ('└', '┴', '┘'))?;
    writer.flush()
}

fn write_rule(
    writer: &mut impl std::io::Write,
    widths: &[usize; 3],
    (left, middle, right): (char, char, char),
) -> std::io::Result<()> {
    let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    writeln!(writer, "{left}{}{right}", segments.join(&middle.to_string()))
}

fn write_row(
    writer: &mut impl std::io::Write,
    widths: &[usize; 3],
    cells: &[impl AsRef<str>; 3],
) -> std::io::Result<()> {
    write!(writer, "│")?;
    for (cell, &width) in cells.iter().zip(widths) {
        write!(writer, " {:<width$} │", cell.as_ref())?;
    }
    writeln!(writer)
}
