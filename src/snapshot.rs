//! Decoding a snapshot of transactions from JSON.
//!
//! A snapshot is the full set of transactions for the current session. It is
//! decoded once, never modified afterwards, and replaced as a whole when the
//! source is read again. Records with a missing or malformed `id`, `date` or
//! `category` are left out of the snapshot and kept as [RejectedRecord]s so
//! the problem can be reported.

use std::{collections::HashSet, fmt::Debug, path::PathBuf};

use serde_json::{Map, Value};
use time::{
    Date, OffsetDateTime, PrimitiveDateTime,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

use crate::{
    Error,
    transaction::{Category, TransactionId, TransactionRecord},
};

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");
const DATE_TIME_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
const DATE_TIME_SUBSECOND_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]");

/// Somewhere a snapshot can be read from.
///
/// Implementations return the raw JSON text, an array of transaction objects.
/// How the text is retrieved (a file, an authenticated HTTP request) is up to
/// the implementation.
pub trait SnapshotSource: Debug + Send + Sync {
    /// Read the current snapshot as JSON text.
    ///
    /// # Errors
    /// Returns [Error::SnapshotReadError] if the snapshot could not be read.
    fn fetch(&self) -> Result<String, Error>;
}

/// Reads snapshots from a JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    /// Create a source that reads the file at `path` each time it is fetched.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotSource for JsonFileSource {
    fn fetch(&self) -> Result<String, Error> {
        std::fs::read_to_string(&self.path).map_err(|error| {
            Error::SnapshotReadError(format!("{}: {error}", self.path.display()))
        })
    }
}

/// Why a record was left out of a snapshot.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordError {
    /// The array element is not a JSON object.
    #[error("the record is not a JSON object")]
    NotAnObject,

    /// `id` is missing or is not an integer.
    #[error("the record has no integer id")]
    MissingId,

    /// Another record in the snapshot already has this ID.
    #[error("the id {0} is used by an earlier record")]
    DuplicateId(TransactionId),

    /// `date` is missing or is not a string.
    #[error("the record has no date")]
    MissingDate,

    /// `date` is not in a recognised date format.
    #[error("\"{0}\" is not a valid date")]
    InvalidDate(String),

    /// `category` is missing, empty or not a string.
    #[error("the record has no category")]
    MissingCategory,

    /// `amount` is present but is not a finite number.
    #[error("the amount {0} is not a number")]
    InvalidAmount(String),
}

/// A record that could not be decoded and was left out of the snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRecord {
    /// The position of the record in the JSON array.
    pub index: usize,
    /// The record's ID, if it had a readable one.
    pub id: Option<TransactionId>,
    /// What was wrong with the record.
    pub reason: RecordError,
}

/// An immutable set of transactions loaded for the current session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    records: Vec<TransactionRecord>,
    rejected: Vec<RejectedRecord>,
}

impl Snapshot {
    /// Create a snapshot from records that have already been decoded.
    pub fn from_records(records: Vec<TransactionRecord>) -> Self {
        Self {
            records,
            rejected: Vec::new(),
        }
    }

    /// Decode a snapshot from a JSON array of transaction objects.
    ///
    /// Each element is decoded on its own. An element that is missing a
    /// mandatory field, or has one that cannot be read, is rejected and the
    /// rest of the array is still loaded.
    ///
    /// # Errors
    /// Returns [Error::InvalidSnapshot] if `json` is not a JSON array.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let elements: Vec<Value> = serde_json::from_str(json)
            .inspect_err(|error| tracing::error!("could not decode transaction snapshot: {error}"))
            .map_err(|error| Error::InvalidSnapshot(error.to_string()))?;

        let mut records = Vec::with_capacity(elements.len());
        let mut rejected = Vec::new();
        let mut seen_ids = HashSet::new();

        for (index, element) in elements.iter().enumerate() {
            let id = element.get("id").and_then(Value::as_i64);

            let result = decode_record(element).and_then(|record| {
                if seen_ids.insert(record.id) {
                    Ok(record)
                } else {
                    Err(RecordError::DuplicateId(record.id))
                }
            });

            match result {
                Ok(record) => records.push(record),
                Err(reason) => {
                    tracing::warn!("rejected transaction at index {index} (id {id:?}): {reason}");
                    rejected.push(RejectedRecord { index, id, reason });
                }
            }
        }

        Ok(Self { records, rejected })
    }

    /// Fetch and decode a snapshot from `source`.
    ///
    /// # Errors
    /// Returns an error if the source could not be read or did not contain a JSON array.
    pub fn load(source: &dyn SnapshotSource) -> Result<Self, Error> {
        let json = source
            .fetch()
            .inspect_err(|error| tracing::error!("could not fetch transaction snapshot: {error}"))?;
        let snapshot = Self::from_json(&json)?;

        tracing::info!(
            "loaded {} transactions ({} rejected) from {source:?}",
            snapshot.records.len(),
            snapshot.rejected.len()
        );

        Ok(snapshot)
    }

    /// The transactions in the snapshot, in the order they were supplied.
    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    /// The records that were left out of the snapshot.
    pub fn rejected(&self) -> &[RejectedRecord] {
        &self.rejected
    }

    /// Whether the snapshot has no transactions.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn decode_record(element: &Value) -> Result<TransactionRecord, RecordError> {
    let object = element.as_object().ok_or(RecordError::NotAnObject)?;

    let id = object
        .get("id")
        .and_then(Value::as_i64)
        .ok_or(RecordError::MissingId)?;

    let date_text = object
        .get("date")
        .and_then(Value::as_str)
        .ok_or(RecordError::MissingDate)?;
    let date =
        parse_date(date_text).ok_or_else(|| RecordError::InvalidDate(date_text.to_owned()))?;

    let category = match object.get("category").and_then(Value::as_str) {
        Some(category) if !category.trim().is_empty() => Category::new(category),
        _ => return Err(RecordError::MissingCategory),
    };

    let amount = match object.get("amount") {
        None | Some(Value::Null) => None,
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => {
            let amount = text
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|amount| amount.is_finite())
                .ok_or_else(|| RecordError::InvalidAmount(format!("\"{text}\"")))?;

            Some(amount)
        }
        Some(other) => return Err(RecordError::InvalidAmount(other.to_string())),
    };

    Ok(TransactionRecord {
        id,
        date,
        amount,
        category,
        status: optional_text(object, "status"),
        user_name: optional_text(object, "user_name"),
        user_profile: optional_text(object, "user_profile"),
    })
}

fn optional_text(object: &Map<String, Value>, field: &str) -> Option<String> {
    object
        .get(field)
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
}

/// Parse the calendar date from an ISO 8601 date or date-time string.
///
/// Accepts `2024-01-05`, RFC 3339 date-times such as `2024-01-05T10:00:00Z`
/// (the date in the given offset is used) and date-times without an offset
/// such as `2024-01-05T10:00:00` or `2024-01-05T10:00:00.123`.
pub fn parse_date(text: &str) -> Option<Date> {
    let text = text.trim();

    if let Ok(date) = Date::parse(text, DATE_FORMAT) {
        return Some(date);
    }

    if let Ok(date_time) = OffsetDateTime::parse(text, &Rfc3339) {
        return Some(date_time.date());
    }

    PrimitiveDateTime::parse(text, DATE_TIME_FORMAT)
        .or_else(|_| PrimitiveDateTime::parse(text, DATE_TIME_SUBSECOND_FORMAT))
        .ok()
        .map(|date_time| date_time.date())
}
