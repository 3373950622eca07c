use std::sync::Arc;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::data::aggregate::{
    by_industry, by_month, by_segment, by_weekday, distinct_segment_count, mean_amount, top_key,
    total_amount, Aggregation,
};
use crate::data::filter::{filter, Selection};
use crate::data::model::{DayName, MonthName, RecordSet, TransactionRecord};

/// Shown wherever a value is undefined (no matching records).
pub const PLACEHOLDER: &str = "—";

/// Column headers of the data table, matching [`table_cells`].
pub const TABLE_COLUMNS: [&str; 6] = [
    "Date",
    "customer_segment",
    "businessindustrytype",
    "Amount",
    "Year",
    "Month",
];

// ---------------------------------------------------------------------------
// KPIs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kpis {
    pub total: Decimal,
    pub active_segments: usize,
    /// `None` when no records match.
    pub mean: Option<Decimal>,
}

impl Kpis {
    pub fn compute(records: &RecordSet) -> Self {
        Self {
            total: total_amount(records),
            active_segments: distinct_segment_count(records),
            mean: mean_amount(records),
        }
    }
}

/// Display strings for the three metric widgets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricStrings {
    pub total_revenue: String,
    pub active_segments: String,
    pub avg_transaction: String,
}

// ---------------------------------------------------------------------------
// DashboardView – everything the UI draws for one selection
// ---------------------------------------------------------------------------

/// The result of running the whole pipeline for one selection.
///
/// Built by [`DashboardView::build`], a pure function of the record set and
/// selection; the UI only reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    pub filtered: RecordSet,
    pub kpis: Kpis,
    pub by_segment: Aggregation<Arc<str>>,
    pub by_weekday: Aggregation<DayName>,
    pub by_industry: Aggregation<Arc<str>>,
    pub by_month: Aggregation<MonthName>,
    pub top_segment: Option<Arc<str>>,
    pub top_day: Option<DayName>,
    pub top_industry: Option<Arc<str>>,
    /// Number of years ticked in the selection (not years with data).
    pub selected_years: usize,
}

impl DashboardView {
    pub fn build(records: &RecordSet, selection: &Selection) -> Self {
        let filtered = filter(records, selection);
        let kpis = Kpis::compute(&filtered);
        let by_segment = by_segment(&filtered);
        let by_weekday = by_weekday(&filtered);
        let by_industry = by_industry(&filtered);
        let by_month = by_month(&filtered);

        let top_segment = top_key(&by_segment).cloned();
        let top_day = top_key(&by_weekday).copied();
        let top_industry = top_key(&by_industry).cloned();

        log::debug!(
            "Rebuilt view: {} of {} records match",
            filtered.len(),
            records.len()
        );

        Self {
            filtered,
            kpis,
            by_segment,
            by_weekday,
            by_industry,
            by_month,
            top_segment,
            top_day,
            top_industry,
            selected_years: selection.years.len(),
        }
    }

    pub fn metric_strings(&self) -> MetricStrings {
        MetricStrings {
            total_revenue: format_currency(self.kpis.total, 0),
            active_segments: self.kpis.active_segments.to_string(),
            avg_transaction: self
                .kpis
                .mean
                .map(|m| format_currency(m, 2))
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
        }
    }

    /// The insight paragraph, one bullet per line.
    pub fn insight_lines(&self) -> Vec<String> {
        vec![
            format!(
                "Total revenue: {} across {} year(s).",
                format_currency(self.kpis.total, 0),
                self.selected_years
            ),
            format!(
                "Top-performing segment: {}.",
                or_placeholder(self.top_segment.as_deref())
            ),
            format!(
                "Most active day: {}.",
                or_placeholder(self.top_day.map(DayName::name))
            ),
            format!(
                "Leading industry: {}.",
                or_placeholder(self.top_industry.as_deref())
            ),
        ]
    }
}

fn or_placeholder(value: Option<&str>) -> &str {
    value.unwrap_or(PLACEHOLDER)
}

/// One table row as display strings, in [`TABLE_COLUMNS`] order.
pub fn table_cells(record: &TransactionRecord) -> [String; 6] {
    [
        record.date().format("%Y-%m-%d").to_string(),
        record.customer_segment().to_string(),
        record.industry_type().to_string(),
        format_currency(record.amount(), 2),
        record.year().to_string(),
        record.month().to_string(),
    ]
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// `$1,234` / `$1,234.57` / `-$12.00`. Halves round away from zero.
pub fn format_currency(amount: Decimal, decimals: u32) -> String {
    let rounded = amount
        .abs()
        .round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.*}", decimals as usize, rounded);
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut out = String::with_capacity(text.len() + int_part.len() / 3 + 2);
    if amount.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    out.push('$');
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::BTreeSet;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn record(y: i32, m: u32, d: u32, amount: i64, seg: &str, ind: &str) -> TransactionRecord {
        TransactionRecord::new(
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            Decimal::from(amount),
            seg,
            ind,
        )
    }

    #[test]
    fn currency_formatting() {
        assert_eq!(format_currency(dec("0"), 0), "$0");
        assert_eq!(format_currency(dec("999"), 0), "$999");
        assert_eq!(format_currency(dec("1234567.891"), 0), "$1,234,568");
        assert_eq!(format_currency(dec("1234.5"), 2), "$1,234.50");
        assert_eq!(format_currency(dec("0.125"), 2), "$0.13");
        assert_eq!(format_currency(dec("-1000"), 2), "-$1,000.00");
        assert_eq!(format_currency(dec("-0.001"), 2), "$0.00");
    }

    #[test]
    fn empty_view_uses_placeholders() {
        let records: RecordSet = vec![record(2023, 1, 2, 100, "SegA", "Tech")].into();
        let view = DashboardView::build(&records, &Selection::default());

        assert!(view.filtered.is_empty());
        assert_eq!(view.kpis.mean, None);
        let metrics = view.metric_strings();
        assert_eq!(metrics.total_revenue, "$0");
        assert_eq!(metrics.active_segments, "0");
        assert_eq!(metrics.avg_transaction, PLACEHOLDER);
        assert_eq!(
            view.insight_lines(),
            vec![
                "Total revenue: $0 across 0 year(s).".to_string(),
                "Top-performing segment: —.".to_string(),
                "Most active day: —.".to_string(),
                "Leading industry: —.".to_string(),
            ]
        );
    }

    #[test]
    fn insight_reports_leaders() {
        let records: RecordSet = vec![
            record(2023, 1, 2, 1000, "SegA", "Tech"),
            record(2023, 1, 3, 2500, "SegB", "Retail"),
            record(2024, 1, 3, 10, "SegB", "Retail"),
        ]
        .into();
        let view = DashboardView::build(&records, &Selection::all(&records));
        let lines = view.insight_lines();
        assert_eq!(lines[0], "Total revenue: $3,510 across 2 year(s).");
        assert_eq!(lines[1], "Top-performing segment: SegB.");
        assert_eq!(lines[2], "Most active day: Tuesday.");
        assert_eq!(lines[3], "Leading industry: Retail.");
        assert_eq!(view.metric_strings().avg_transaction, "$1,170.00");
    }

    #[test]
    fn selected_years_counts_the_selection() {
        let records: RecordSet = vec![record(2023, 1, 2, 5, "A", "X")].into();
        let mut sel = Selection::all(&records);
        sel.years = BTreeSet::from([2021, 2022, 2023]);
        let view = DashboardView::build(&records, &sel);
        assert_eq!(view.selected_years, 3);
        assert_eq!(view.filtered.len(), 1);
    }

    #[test]
    fn table_cells_layout() {
        let cells = table_cells(&record(2023, 6, 5, 200, "SegA", "Retail"));
        assert_eq!(
            cells,
            [
                "2023-06-05".to_string(),
                "SegA".to_string(),
                "Retail".to_string(),
                "$200.00".to_string(),
                "2023".to_string(),
                "June".to_string(),
            ]
        );
    }
}
