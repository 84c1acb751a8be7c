//! Exporting transactions as CSV.
//!
//! The export mirrors the transactions table: one row per transaction with
//! the same name, date, signed amount and status shown on screen.

use crate::{
    Error,
    transaction::{TransactionRecord, short_date},
};

/// The file name offered when downloading the export.
pub const CSV_FILE_NAME: &str = "transactions.csv";

/// The MIME type of the export.
pub const CSV_CONTENT_TYPE: &str = "text/csv;charset=utf-8";

/// The header row of the export.
pub const CSV_HEADER: [&str; 4] = ["Name", "Date", "Amount", "Status"];

/// Write `records` as CSV text, in the order given.
///
/// Rows are separated by `\n` and the text does not end with a newline, so
/// the text has exactly one line per transaction plus the header. Fields that
/// contain a comma, a double quote or a newline are quoted.
///
/// # Errors
/// Returns [Error::CsvError] if the CSV writer fails.
pub fn export_csv(records: &[TransactionRecord]) -> Result<String, Error> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer
        .write_record(CSV_HEADER)
        .map_err(|error| Error::CsvError(error.to_string()))?;

    for record in records {
        let name = record.display_name();
        let date = short_date(record.date);
        let amount = record.signed_amount();

        writer
            .write_record([
                name.as_str(),
                date.as_str(),
                amount.as_str(),
                record.display_status(),
            ])
            .map_err(|error| Error::CsvError(error.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| Error::CsvError(error.to_string()))?;
    let text = String::from_utf8(bytes).map_err(|error| Error::CsvError(error.to_string()))?;

    Ok(text.strip_suffix('\n').unwrap_or(&text).to_owned())
}
