//! CSV export of the workout log.
//!
//! Every strength set becomes its own row; cardio records get a single row
//! with the numeric columns left blank.

use crate::{Result, WorkoutRecord};
use std::io::Write;

/// Column header, always written first
pub const CSV_HEADER: [&str; 5] = ["date", "exercise", "reps", "weight", "volume"];

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    date: &'a str,
    exercise: &'a str,
    reps: Option<i32>,
    weight: Option<f64>,
    volume: Option<f64>,
}

impl<'a> CsvRow<'a> {
    fn rows_for(record: &'a WorkoutRecord) -> Vec<CsvRow<'a>> {
        let sets = record.strength_sets();
        if sets.is_empty() {
            return vec![CsvRow {
                date: &record.date,
                exercise: &record.exercise,
                reps: None,
                weight: None,
                volume: None,
            }];
        }

        sets.iter()
            .map(|set| CsvRow {
                date: &record.date,
                exercise: &record.exercise,
                reps: Some(set.reps),
                weight: Some(set.weight),
                volume: Some(set.volume()),
            })
            .collect()
    }
}

/// Write `records` as CSV to `out`
///
/// Fields containing a quote, comma, or line break are quoted and embedded
/// quotes doubled.
pub fn write_csv<W: Write>(records: &[WorkoutRecord], out: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(out);

    writer.write_record(CSV_HEADER)?;

    let mut rows = 0;
    for record in records {
        for row in CsvRow::rows_for(record) {
            writer.serialize(row)?;
            rows += 1;
        }
    }
    writer.flush()?;

    tracing::debug!("Exported {} records as {} CSV rows", records.len(), rows);
    Ok(())
}

/// Format `records` as a CSV document
pub fn format_csv(records: &[WorkoutRecord]) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(records, &mut buf)?;
    String::from_utf8(buf)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e).into())
}
