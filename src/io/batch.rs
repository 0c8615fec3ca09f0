//! CSV batch prediction: one form submission per input row.

use std::fmt;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use crate::dispatch::{Dispatcher, PredictionResult};
use crate::features::RawFields;

/// Column header for batch output.
const HEADER: &str = "row,energy_type,prediction,co2_mitigated,carbon_credits,error";

/// Outcome of one input row.
#[derive(Debug)]
pub struct BatchRow {
    /// 1-based data row index (header excluded).
    pub row: usize,
    /// Energy type as submitted.
    pub energy_type: String,
    /// Prediction, or the user-facing error message.
    pub outcome: Result<PredictionResult, String>,
}

/// Totals for a completed batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub failed: usize,
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows predicted, {} failed",
            self.total - self.failed,
            self.failed
        )
    }
}

/// Reads form submissions from CSV. The header row names the fields.
///
/// Surrounding whitespace is trimmed from every header and cell.
///
/// # Errors
///
/// Returns a `csv::Error` on malformed CSV or ragged rows.
pub fn read_submissions(reader: impl Read) -> csv::Result<Vec<RawFields>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let mut submissions = Vec::new();
    for record in rdr.records() {
        let record = record?;
        submissions.push(headers.iter().zip(record.iter()).collect());
    }
    Ok(submissions)
}

/// Runs every submission through the dispatcher. Failures are kept per row
/// and never abort the batch.
pub fn predict_all(dispatcher: &Dispatcher, submissions: &[RawFields]) -> Vec<BatchRow> {
    submissions
        .iter()
        .enumerate()
        .map(|(i, fields)| {
            let energy_type = fields.get("energy_type").unwrap_or_default().to_string();
            let outcome = fields
                .require_str("energy_type")
                .and_then(|ty| dispatcher.predict(ty, fields))
                .map_err(|e| e.user_message());
            BatchRow {
                row: i + 1,
                energy_type,
                outcome,
            }
        })
        .collect()
}

/// Writes batch results as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_results(rows: &[BatchRow], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;

    for r in rows {
        let record = match &r.outcome {
            Ok(p) => [
                r.row.to_string(),
                p.energy_type.label().to_string(),
                format!("{:.2}", p.prediction),
                format!("{:.2}", p.co2_mitigated),
                format!("{:.2}", p.carbon_credits),
                String::new(),
            ],
            Err(message) => [
                r.row.to_string(),
                r.energy_type.clone(),
                String::new(),
                String::new(),
                String::new(),
                message.clone(),
            ],
        };
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Predicts every row of `input` and writes results to `output`, or to
/// stdout when `output` is `None`.
///
/// # Errors
///
/// Returns an `io::Error` if the input cannot be read or parsed, or the
/// output cannot be written.
pub fn run_batch(
    dispatcher: &Dispatcher,
    input: &Path,
    output: Option<&Path>,
) -> io::Result<BatchSummary> {
    let submissions = read_submissions(File::open(input)?)?;
    tracing::info!(rows = submissions.len(), input = %input.display(), "batch loaded");

    let rows = predict_all(dispatcher, &submissions);
    match output {
        Some(path) => write_results(&rows, io::BufWriter::new(File::create(path)?))?,
        None => write_results(&rows, io::stdout().lock())?,
    }

    let failed = rows.iter().filter(|r| r.outcome.is_err()).count();
    Ok(BatchSummary {
        total: rows.len(),
        failed,
    })
}
