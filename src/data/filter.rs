use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Deserialize;

use super::model::{RecordSet, TransactionRecord};

// ---------------------------------------------------------------------------
// Selection: which values are allowed per dimension
// ---------------------------------------------------------------------------

/// The three filter dimensions shown in the side panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Year,
    Segment,
    Industry,
}

/// Allowed values per dimension. An empty set allows nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub years: BTreeSet<i32>,
    pub segments: BTreeSet<Arc<str>>,
    pub industries: BTreeSet<Arc<str>>,
}

/// How many leading segments / industries start out selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DefaultSelection {
    pub segments: usize,
    pub industries: usize,
}

impl Default for DefaultSelection {
    fn default() -> Self {
        Self {
            segments: 3,
            industries: 5,
        }
    }
}

impl Selection {
    /// All years, plus the first N segments and industries in source order.
    pub fn defaults(records: &RecordSet, counts: &DefaultSelection) -> Self {
        Self {
            years: records.years().into_iter().collect(),
            segments: records.segments().into_iter().take(counts.segments).collect(),
            industries: records
                .industries()
                .into_iter()
                .take(counts.industries)
                .collect(),
        }
    }

    /// Every value present in `records`.
    pub fn all(records: &RecordSet) -> Self {
        Self {
            years: records.years().into_iter().collect(),
            segments: records.segments().into_iter().collect(),
            industries: records.industries().into_iter().collect(),
        }
    }

    pub fn matches(&self, record: &TransactionRecord) -> bool {
        self.years.contains(&record.year())
            && self.segments.contains(record.customer_segment())
            && self.industries.contains(record.industry_type())
    }

    /// Clear one dimension, which empties any filter result.
    pub fn clear(&mut self, dimension: Dimension) {
        match dimension {
            Dimension::Year => self.years.clear(),
            Dimension::Segment => self.segments.clear(),
            Dimension::Industry => self.industries.clear(),
        }
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Records matching every dimension of `selection`, in input order.
///
/// A record passes when its year, segment and industry are each in the
/// corresponding selected set, so any empty set yields an empty result.
pub fn filter(records: &RecordSet, selection: &Selection) -> RecordSet {
    if selection.years.is_empty()
        || selection.segments.is_empty()
        || selection.industries.is_empty()
    {
        return RecordSet::default();
    }
    records
        .iter()
        .filter(|r| selection.matches(r))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn record(y: i32, m: u32, d: u32, amount: i64, seg: &str, ind: &str) -> TransactionRecord {
        TransactionRecord::new(
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            Decimal::from(amount),
            seg,
            ind,
        )
    }

    fn sample() -> RecordSet {
        vec![
            record(2023, 1, 2, 100, "SegA", "Tech"),
            record(2023, 1, 3, 50, "SegB", "Tech"),
            record(2023, 6, 5, 200, "SegA", "Retail"),
            record(2024, 2, 1, 75, "SegB", "Retail"),
            record(2022, 9, 9, 10, "SegC", "Food"),
            record(2024, 3, 3, 20, "SegD", "Auto"),
        ]
        .into()
    }

    fn labels(items: &[&str]) -> BTreeSet<Arc<str>> {
        items.iter().map(|s| Arc::from(*s)).collect()
    }

    #[test]
    fn and_across_or_within() {
        let sel = Selection {
            years: [2023, 2024].into_iter().collect(),
            segments: labels(&["SegA", "SegB"]),
            industries: labels(&["Retail"]),
        };
        let out = filter(&sample(), &sel);
        let amounts: Vec<Decimal> = out.iter().map(|r| r.amount()).collect();
        assert_eq!(amounts, vec![Decimal::from(200), Decimal::from(75)]);
    }

    #[test]
    fn preserves_input_order() {
        let records = sample();
        let out = filter(&records, &Selection::all(&records));
        assert_eq!(out, records);
    }

    #[test]
    fn empty_dimension_yields_nothing() {
        let records = sample();
        for dim in [Dimension::Year, Dimension::Segment, Dimension::Industry] {
            let mut sel = Selection::all(&records);
            sel.clear(dim);
            assert!(filter(&records, &sel).is_empty(), "{dim:?}");
        }
    }

    #[test]
    fn filtering_twice_changes_nothing() {
        let records = sample();
        let sel = Selection {
            years: [2023].into_iter().collect(),
            segments: labels(&["SegA", "SegB", "SegC"]),
            industries: labels(&["Tech", "Retail"]),
        };
        let once = filter(&records, &sel);
        assert_eq!(filter(&once, &sel), once);
    }

    #[test]
    fn defaults_take_leading_labels_in_source_order() {
        let records = sample();
        let sel = Selection::defaults(
            &records,
            &DefaultSelection {
                segments: 3,
                industries: 2,
            },
        );
        assert_eq!(sel.years, [2022, 2023, 2024].into_iter().collect());
        assert_eq!(sel.segments, labels(&["SegA", "SegB", "SegC"]));
        assert_eq!(sel.industries, labels(&["Tech", "Retail"]));
    }
}
