use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;

// ---------------------------------------------------------------------------
// CellValue – a single decoded cell before it becomes a record field
// ---------------------------------------------------------------------------

/// A dynamically-typed cell, the common currency of every file reader.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    /// Native date cell (Excel date, Arrow `Date32`/`Timestamp`).
    Date(NaiveDate),
    Empty,
}

impl CellValue {
    /// Empty cells and whitespace-only text both count as missing.
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(v) => v.is_nan(),
            CellValue::Date(_) => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Number(v) => write!(f, "{v}"),
            CellValue::Date(d) => write!(f, "{d}"),
            CellValue::Empty => write!(f, "<empty>"),
        }
    }
}

// ---------------------------------------------------------------------------
// Calendar labels with a canonical order
// ---------------------------------------------------------------------------

/// Day of the week. `Ord` follows the calendar, Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DayName {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayName {
    pub const ALL: [DayName; 7] = [
        DayName::Monday,
        DayName::Tuesday,
        DayName::Wednesday,
        DayName::Thursday,
        DayName::Friday,
        DayName::Saturday,
        DayName::Sunday,
    ];

    pub fn from_date(date: NaiveDate) -> Self {
        Self::from(date.weekday())
    }

    /// Zero-based position, Monday = 0.
    pub fn ordinal(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            DayName::Monday => "Monday",
            DayName::Tuesday => "Tuesday",
            DayName::Wednesday => "Wednesday",
            DayName::Thursday => "Thursday",
            DayName::Friday => "Friday",
            DayName::Saturday => "Saturday",
            DayName::Sunday => "Sunday",
        }
    }
}

impl From<Weekday> for DayName {
    fn from(w: Weekday) -> Self {
        Self::ALL[w.num_days_from_monday() as usize]
    }
}

impl fmt::Display for DayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Calendar month. `Ord` follows the calendar, January first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MonthName {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl MonthName {
    pub const ALL: [MonthName; 12] = [
        MonthName::January,
        MonthName::February,
        MonthName::March,
        MonthName::April,
        MonthName::May,
        MonthName::June,
        MonthName::July,
        MonthName::August,
        MonthName::September,
        MonthName::October,
        MonthName::November,
        MonthName::December,
    ];

    pub fn from_date(date: NaiveDate) -> Self {
        Self::ALL[date.month0() as usize]
    }

    /// Zero-based position, January = 0.
    pub fn ordinal(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            MonthName::January => "January",
            MonthName::February => "February",
            MonthName::March => "March",
            MonthName::April => "April",
            MonthName::May => "May",
            MonthName::June => "June",
            MonthName::July => "July",
            MonthName::August => "August",
            MonthName::September => "September",
            MonthName::October => "October",
            MonthName::November => "November",
            MonthName::December => "December",
        }
    }
}

impl fmt::Display for MonthName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// TransactionRecord – one row of the source table
// ---------------------------------------------------------------------------

/// A single transaction. Calendar fields are derived from `date` once, in
/// [`TransactionRecord::new`], and the struct exposes no setters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    date: NaiveDate,
    amount: Decimal,
    customer_segment: Arc<str>,
    industry_type: Arc<str>,
    year: i32,
    month: MonthName,
    day: DayName,
}

impl TransactionRecord {
    pub fn new(
        date: NaiveDate,
        amount: Decimal,
        customer_segment: impl Into<Arc<str>>,
        industry_type: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            date,
            amount,
            customer_segment: customer_segment.into(),
            industry_type: industry_type.into(),
            year: date.year(),
            month: MonthName::from_date(date),
            day: DayName::from_date(date),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn customer_segment(&self) -> &Arc<str> {
        &self.customer_segment
    }

    pub fn industry_type(&self) -> &Arc<str> {
        &self.industry_type
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> MonthName {
        self.month
    }

    pub fn day(&self) -> DayName {
        self.day
    }
}

// ---------------------------------------------------------------------------
// RecordSet – an ordered collection of records
// ---------------------------------------------------------------------------

/// Records in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSet {
    records: Vec<TransactionRecord>,
}

impl RecordSet {
    pub fn new(records: Vec<TransactionRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TransactionRecord> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[TransactionRecord] {
        &self.records
    }

    /// Distinct years, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.records
            .iter()
            .map(|r| r.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct segments in first-seen order.
    pub fn segments(&self) -> Vec<Arc<str>> {
        first_seen(self.records.iter().map(|r| &r.customer_segment))
    }

    /// Distinct industries in first-seen order.
    pub fn industries(&self) -> Vec<Arc<str>> {
        first_seen(self.records.iter().map(|r| &r.industry_type))
    }
}

fn first_seen<'a>(labels: impl Iterator<Item = &'a Arc<str>>) -> Vec<Arc<str>> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::new();
    for label in labels {
        if seen.insert(label.as_ref()) {
            out.push(Arc::clone(label));
        }
    }
    out
}

impl From<Vec<TransactionRecord>> for RecordSet {
    fn from(records: Vec<TransactionRecord>) -> Self {
        Self::new(records)
    }
}

impl FromIterator<TransactionRecord> for RecordSet {
    fn from_iter<I: IntoIterator<Item = TransactionRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a TransactionRecord;
    type IntoIter = std::slice::Iter<'a, TransactionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
