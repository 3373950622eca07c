use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::model::{DayName, MonthName, RecordSet, TransactionRecord};

// ---------------------------------------------------------------------------
// Aggregation – ordered (key, total) pairs
// ---------------------------------------------------------------------------

/// Summed amounts per key, ordered by `K`'s `Ord`.
///
/// For text labels that is ascending order; for [`DayName`] and
/// [`MonthName`] it is calendar order. Keys with no records are absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation<K> {
    entries: Vec<(K, Decimal)>,
}

impl<K> Default for Aggregation<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K> Aggregation<K> {
    pub fn entries(&self) -> &[(K, Decimal)] {
        &self.entries
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all group totals.
    pub fn grand_total(&self) -> Decimal {
        self.entries
            .iter()
            .fold(Decimal::ZERO, |acc, (_, v)| acc.saturating_add(*v))
    }

    /// Totals as `f64` for plotting.
    pub fn series(&self) -> impl Iterator<Item = (&K, f64)> {
        self.entries
            .iter()
            .map(|(k, v)| (k, v.to_f64().unwrap_or_default()))
    }
}

impl<K: PartialEq> Aggregation<K> {
    pub fn get(&self, key: &K) -> Option<Decimal> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| *v)
    }
}

// ---------------------------------------------------------------------------
// Group-by and scalar reductions
// ---------------------------------------------------------------------------

/// Group records by `key_fn` and sum `amount` per group.
///
/// Sums saturate at `Decimal::MAX`/`MIN`. Loaded record sets never reach
/// that bound: the loader rejects rows past it.
pub fn sum_by<K, F>(records: &RecordSet, key_fn: F) -> Aggregation<K>
where
    K: Ord,
    F: Fn(&TransactionRecord) -> K,
{
    let mut groups: BTreeMap<K, Decimal> = BTreeMap::new();
    for r in records {
        let total = groups.entry(key_fn(r)).or_insert(Decimal::ZERO);
        *total = total.saturating_add(r.amount());
    }
    Aggregation {
        entries: groups.into_iter().collect(),
    }
}

pub fn by_segment(records: &RecordSet) -> Aggregation<Arc<str>> {
    sum_by(records, |r| Arc::clone(r.customer_segment()))
}

pub fn by_industry(records: &RecordSet) -> Aggregation<Arc<str>> {
    sum_by(records, |r| Arc::clone(r.industry_type()))
}

/// Monday → Sunday.
pub fn by_weekday(records: &RecordSet) -> Aggregation<DayName> {
    sum_by(records, TransactionRecord::day)
}

/// January → December.
pub fn by_month(records: &RecordSet) -> Aggregation<MonthName> {
    sum_by(records, TransactionRecord::month)
}

/// Saturating, like [`sum_by`].
pub fn total_amount(records: &RecordSet) -> Decimal {
    records
        .iter()
        .fold(Decimal::ZERO, |acc, r| acc.saturating_add(r.amount()))
}

pub fn distinct_segment_count(records: &RecordSet) -> usize {
    records
        .iter()
        .map(|r| r.customer_segment().as_ref())
        .collect::<HashSet<&str>>()
        .len()
}

/// Arithmetic mean, `None` for an empty set.
pub fn mean_amount(records: &RecordSet) -> Option<Decimal> {
    if records.is_empty() {
        return None;
    }
    total_amount(records).checked_div(Decimal::from(records.len()))
}

/// Key with the largest total. Ties go to the earliest key in iteration order.
pub fn top_key<K>(aggregation: &Aggregation<K>) -> Option<&K> {
    let mut best: Option<&(K, Decimal)> = None;
    for entry in &aggregation.entries {
        match best {
            Some((_, top)) if entry.1 <= *top => {}
            _ => best = Some(entry),
        }
    }
    best.map(|(k, _)| k)
}
