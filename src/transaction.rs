//! The transaction record shared by every stage of the analytics pipeline,
//! plus the display rules used wherever a record is shown or exported.

use serde::{Serialize, Serializer};
use time::{Date, Month, Weekday};
use unicode_segmentation::UnicodeSegmentation;

/// The identifier of a transaction, unique within a snapshot.
pub type TransactionId = i64;

/// The status shown when a transaction has no status.
pub const DEFAULT_STATUS: &str = "Pending";

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Whether a transaction brings money in or takes it out.
///
/// Only `revenue` counts as money coming in. `expense` and every other
/// category are treated as money going out when displaying amounts or
/// bucketing them for the chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Category {
    /// Money coming in.
    Revenue,
    /// Money going out.
    Expense,
    /// Any other category, kept as it was given.
    Other(String),
}

impl Category {
    /// Parse a category name, ignoring case for `revenue` and `expense`.
    pub fn new(name: &str) -> Self {
        if name.eq_ignore_ascii_case("revenue") {
            Self::Revenue
        } else if name.eq_ignore_ascii_case("expense") {
            Self::Expense
        } else {
            Self::Other(name.to_owned())
        }
    }

    /// The category name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Revenue => "revenue",
            Self::Expense => "expense",
            Self::Other(name) => name,
        }
    }

    /// Whether the category is `revenue`.
    pub fn is_revenue(&self) -> bool {
        matches!(self, Self::Revenue)
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A single financial transaction from a snapshot.
///
/// Only `id`, `date` and `category` are mandatory. The optional fields have
/// display defaults, see [TransactionRecord::display_name] and
/// [TransactionRecord::display_status].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRecord {
    /// Stable identity of the transaction.
    pub id: TransactionId,
    /// The calendar date the transaction happened on.
    #[serde(serialize_with = "iso_date::serialize")]
    pub date: Date,
    /// The amount as stored. The direction of the money is carried by `category`.
    pub amount: Option<f64>,
    /// Revenue, expense or something else.
    pub category: Category,
    /// Free text such as "paid" or "pending".
    pub status: Option<String>,
    /// The name of the person involved in the transaction.
    pub user_name: Option<String>,
    /// A URL to the person's avatar image.
    pub user_profile: Option<String>,
}

impl TransactionRecord {
    /// Create a record with only the mandatory fields set.
    pub fn new(id: TransactionId, date: Date, category: Category) -> Self {
        Self {
            id,
            date,
            amount: None,
            category,
            status: None,
            user_name: None,
            user_profile: None,
        }
    }

    /// Set the amount.
    pub fn amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Set the status.
    pub fn status(mut self, status: &str) -> Self {
        self.status = Some(status.to_owned());
        self
    }

    /// Set the user name.
    pub fn user_name(mut self, user_name: &str) -> Self {
        self.user_name = Some(user_name.to_owned());
        self
    }

    /// Set the avatar URL.
    pub fn user_profile(mut self, user_profile: &str) -> Self {
        self.user_profile = Some(user_profile.to_owned());
        self
    }

    /// The amount, with a missing amount counted as zero.
    pub fn amount_or_zero(&self) -> f64 {
        self.amount.unwrap_or(0.0)
    }

    /// Whether the transaction is revenue.
    pub fn is_revenue(&self) -> bool {
        self.category.is_revenue()
    }

    /// The user name, or `User {id}` if there is none.
    pub fn display_name(&self) -> String {
        match &self.user_name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("User {}", self.id),
        }
    }

    /// The status, or [DEFAULT_STATUS] if there is none.
    pub fn display_status(&self) -> &str {
        match &self.status {
            Some(status) if !status.is_empty() => status,
            _ => DEFAULT_STATUS,
        }
    }

    /// Whether the transaction has been paid, which decides the colour of the status badge.
    pub fn is_paid(&self) -> bool {
        self.display_status().eq_ignore_ascii_case("paid")
    }

    /// The amount as a dollar string prefixed with `+` for revenue and `-` otherwise,
    /// e.g. "+$100.00" or "-$40.50".
    ///
    /// The sign comes from the category, so the magnitude of the stored amount is used.
    pub fn signed_amount(&self) -> String {
        let sign = if self.is_revenue() { '+' } else { '-' };

        format!("{sign}${:.2}", self.amount_or_zero().abs())
    }

    /// The amount as a plain decimal string without a currency symbol, e.g.
    /// "100" or "40.5". Empty if there is no amount.
    ///
    /// Very large and very small amounts are written out in full rather than
    /// in exponent notation, e.g. `1e21` is "1000000000000000000000".
    pub fn plain_amount(&self) -> String {
        self.amount.map(|amount| amount.to_string()).unwrap_or_default()
    }

    /// The avatar to display for the transaction's user.
    pub fn avatar(&self) -> Avatar {
        match &self.user_profile {
            Some(url) if !url.is_empty() => Avatar::Image(url.clone()),
            _ => Avatar::placeholder(&self.display_name()),
        }
    }
}

/// A user avatar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Avatar {
    /// An image URL.
    Image(String),
    /// Initials on a coloured background, generated from the display name.
    Placeholder {
        /// Up to two upper-case initials.
        initials: String,
        /// A CSS hex colour such as `#a1b2c3`.
        color: String,
    },
}

impl Avatar {
    /// Generate a placeholder from a display name.
    ///
    /// The colour is derived from the name so the same name always gets the
    /// same colour.
    pub fn placeholder(name: &str) -> Self {
        let initials: String = name
            .split_whitespace()
            .take(2)
            .filter_map(|word| word.graphemes(true).next())
            .collect::<String>()
            .to_uppercase();

        let digest = md5::compute(name);
        let color = format!("#{:02x}{:02x}{:02x}", digest[0], digest[1], digest[2]);

        Self::Placeholder { initials, color }
    }
}

/// Format a date the way short dates are written in the US, e.g. "1/5/2024".
///
/// This is the date shown in CSV exports and matched by text search.
pub fn short_date(date: Date) -> String {
    format!("{}/{}/{}", u8::from(date.month()), date.day(), date.year())
}

/// Format a date for the transactions table, e.g. "Fri, Jan 05, 2024".
pub fn table_date(date: Date) -> String {
    format!(
        "{}, {} {:02}, {}",
        weekday_abbreviation(date.weekday()),
        month_abbreviation(date.month()),
        date.day(),
        date.year()
    )
}

/// The three-letter name of a month, e.g. "Jan".
pub fn month_abbreviation(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}

fn weekday_abbreviation(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Monday => "Mon",
        Weekday::Tuesday => "Tue",
        Weekday::Wednesday => "Wed",
        Weekday::Thursday => "Thu",
        Weekday::Friday => "Fri",
        Weekday::Saturday => "Sat",
        Weekday::Sunday => "Sun",
    }
}
