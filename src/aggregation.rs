//! Grouping transactions into time buckets for the income and expenses chart.
//!
//! Each transaction is put into a bucket labelled by its date:
//! - **Monthly**: the month's short name, e.g. "Jan".
//! - **Weekly**: the month's short name and week of the month, e.g. "Jun W4",
//!   where the week is the day of the month divided by seven, rounded up.
//! - **Daily**: the date written as `DD/MM/YYYY`.
//!
//! Revenue is added to a bucket's income and every other category to its
//! expenses. Labels do not include the year, so January 2023 and January 2024
//! share the "Jan" bucket.

use std::{collections::HashMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use time::Date;

use crate::transaction::{TransactionRecord, month_abbreviation};

/// The size of the time buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum Granularity {
    /// One bucket per day.
    Daily,
    /// One bucket per week of the month.
    Weekly,
    /// One bucket per month.
    #[default]
    Monthly,
}

impl Granularity {
    /// Every granularity, in the order they are listed in the chart menu.
    pub const ALL: [Self; 3] = [Self::Daily, Self::Weekly, Self::Monthly];

    /// The value used for this granularity in URL query strings.
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
        }
    }
}

/// The order in which buckets are returned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BucketOrder {
    /// Sorted by label as plain strings, so "Apr" comes before "Jan".
    #[default]
    Label,
    /// Sorted by the earliest date in each bucket, then by label.
    Chronological,
}

impl FromStr for BucketOrder {
    type Err = UnknownBucketOrder;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text.to_ascii_lowercase().as_str() {
            "label" => Ok(Self::Label),
            "chronological" => Ok(Self::Chronological),
            _ => Err(UnknownBucketOrder(text.to_owned())),
        }
    }
}

impl fmt::Display for BucketOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Label => write!(f, "label"),
            Self::Chronological => write!(f, "chronological"),
        }
    }
}

/// A bucket order name that is not "label" or "chronological".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown bucket order \"{0}\", expected \"label\" or \"chronological\"")]
pub struct UnknownBucketOrder(String);

/// The income and expenses in one time bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketTotals {
    /// The bucket label, e.g. "Jan", "Jun W4" or "26/06/2025".
    pub label: String,
    /// The sum of revenue amounts.
    pub income: f64,
    /// The sum of amounts in every other category.
    pub expenses: f64,
}

/// Get the label of the bucket that `date` falls in.
pub fn bucket_label(date: Date, granularity: Granularity) -> String {
    match granularity {
        Granularity::Monthly => month_abbreviation(date.month()).to_owned(),
        Granularity::Weekly => format!(
            "{} W{}",
            month_abbreviation(date.month()),
            date.day().div_ceil(7)
        ),
        Granularity::Daily => format!(
            "{:02}/{:02}/{}",
            date.day(),
            u8::from(date.month()),
            date.year()
        ),
    }
}

/// Sum the income and expenses of `records` per time bucket.
///
/// Buckets without transactions are not included, so an empty `records`
/// gives an empty series.
pub fn aggregate(
    records: &[TransactionRecord],
    granularity: Granularity,
    order: BucketOrder,
) -> Vec<BucketTotals> {
    let mut buckets: HashMap<String, (BucketTotals, Date)> = HashMap::new();

    for record in records {
        let label = bucket_label(record.date, granularity);
        let (totals, earliest) = buckets.entry(label.clone()).or_insert_with(|| {
            (
                BucketTotals {
                    label,
                    income: 0.0,
                    expenses: 0.0,
                },
                record.date,
            )
        });

        if record.is_revenue() {
            totals.income += record.amount_or_zero();
        } else {
            totals.expenses += record.amount_or_zero();
        }

        *earliest = (*earliest).min(record.date);
    }

    let mut buckets: Vec<_> = buckets.into_values().collect();

    match order {
        BucketOrder::Label => buckets.sort_by(|(a, _), (b, _)| a.label.cmp(&b.label)),
        BucketOrder::Chronological => buckets.sort_by(|(a, a_earliest), (b, b_earliest)| {
            a_earliest.cmp(b_earliest).then_with(|| a.label.cmp(&b.label))
        }),
    }

    buckets.into_iter().map(|(totals, _)| totals).collect()
}
