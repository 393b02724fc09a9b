use csv::WriterBuilder;
use std::io::Write;

use crate::error::Result;
use crate::lineup::Assignment;

/// Writes the lineup as a two-row CSV: slot labels, then players.
///
/// Only assigned slots become columns. Pair names are joined with ", ".
pub fn export_lineup_csv<W: Write>(assignment: &Assignment, writer: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);

    let header: Vec<&str> = assignment.iter().map(|(slot, _)| slot.label()).collect();
    let row: Vec<String> = assignment
        .iter()
        .map(|(_, candidate)| candidate.names().join(", "))
        .collect();

    wtr.write_record(&header)?;
    wtr.write_record(&row)?;
    wtr.flush()?;
    Ok(())
}
