use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{
    DataType, Date32Type, Date64Type, Float32Type, Float64Type, Int32Type, Int64Type, TimeUnit,
    TimestampMicrosecondType, TimestampMillisecondType, TimestampNanosecondType,
    TimestampSecondType,
};
use calamine::{open_workbook_auto, Data, Reader};
use chrono::{DateTime, Days, NaiveDate, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::model::{CellValue, RecordSet, TransactionRecord};
use crate::error::{LoadError, ParseError, SkippedRow};

// ---------------------------------------------------------------------------
// Options and result
// ---------------------------------------------------------------------------

/// Header names of the four columns the dashboard needs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub date: String,
    pub amount: String,
    pub segment: String,
    pub industry: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            date: "Date".to_string(),
            amount: "Amount".to_string(),
            segment: "customer_segment".to_string(),
            industry: "businessindustrytype".to_string(),
        }
    }
}

impl ColumnNames {
    fn as_array(&self) -> [&str; 4] {
        [&self.date, &self.amount, &self.segment, &self.industry]
    }
}

/// How to read a source file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SourceOptions {
    /// Worksheet to read; the first sheet when `None`. Ignored for non-spreadsheets.
    pub sheet: Option<String>,
    pub columns: ColumnNames,
}

/// Output of a successful load: the records plus every row that was rejected.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub source: PathBuf,
    pub records: RecordSet,
    pub skipped: Vec<SkippedRow>,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load transactions from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xlsb` / `.xls` / `.ods` – first row is the header
/// * `.csv`     – header row, one transaction per line
/// * `.parquet` – flat columns (strings, numbers, dates, timestamps)
/// * `.json`    – `[{ "Date": "...", "Amount": 12.5, ... }, ...]`
///
/// Rows whose date, amount or labels cannot be parsed are skipped and
/// reported in [`LoadedDataset::skipped`]; structural problems fail the load.
pub fn load_file(path: &Path, options: &SourceOptions) -> Result<LoadedDataset, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let mut sink = RecordSink::default();
    match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => load_workbook(path, options, &mut sink)?,
        "csv" => load_csv(path, &options.columns, &mut sink)?,
        "parquet" | "pq" => load_parquet(path, &options.columns, &mut sink)?,
        "json" => load_json(path, &options.columns, &mut sink)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    }

    let dataset = sink.finish(path);
    log::info!(
        "Loaded {} transactions from {} ({} rows skipped)",
        dataset.records.len(),
        path.display(),
        dataset.skipped.len()
    );
    for skipped in dataset.skipped.iter().take(5) {
        log::warn!("Skipped {skipped}");
    }
    if dataset.skipped.len() > 5 {
        log::warn!("... and {} more skipped rows", dataset.skipped.len() - 5);
    }
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Row sink: cells → records, shared by every format
// ---------------------------------------------------------------------------

#[derive(Default)]
struct RecordSink {
    records: Vec<TransactionRecord>,
    skipped: Vec<SkippedRow>,
    labels: HashMap<String, Arc<str>>,
    /// Sum of |amount| over accepted rows. Bounds every subset sum.
    magnitude: Decimal,
    row: usize,
}

impl RecordSink {
    /// `cells` are date, amount, segment, industry in that order.
    fn push(&mut self, cells: [CellValue; 4], columns: &ColumnNames) {
        self.row += 1;
        match self.build(cells, columns) {
            Ok(record) => self.records.push(record),
            Err(reason) => self.skipped.push(SkippedRow {
                row: self.row,
                reason,
            }),
        }
    }

    fn build(
        &mut self,
        cells: [CellValue; 4],
        columns: &ColumnNames,
    ) -> Result<TransactionRecord, ParseError> {
        let [date, amount, segment, industry] = cells;
        let date = parse_date_cell(&date, &columns.date)?;
        let amount = parse_amount_cell(&amount, &columns.amount)?;
        let segment = self.label(&segment, &columns.segment)?;
        let industry = self.label(&industry, &columns.industry)?;
        self.magnitude = self
            .magnitude
            .checked_add(amount.abs())
            .ok_or_else(|| ParseError::AmountOutOfRange {
                value: amount.to_string(),
            })?;
        Ok(TransactionRecord::new(date, amount, segment, industry))
    }

    /// Labels are interned so repeated segment/industry names share one allocation.
    fn label(&mut self, cell: &CellValue, column: &str) -> Result<Arc<str>, ParseError> {
        if cell.is_missing() {
            return Err(ParseError::MissingField {
                column: column.to_string(),
            });
        }
        let text = match cell {
            CellValue::Text(s) => s.trim().to_string(),
            other => other.to_string(),
        };
        Ok(Arc::clone(
            self.labels
                .entry(text)
                .or_insert_with_key(|k| Arc::from(k.as_str())),
        ))
    }

    fn finish(self, path: &Path) -> LoadedDataset {
        LoadedDataset {
            source: path.to_path_buf(),
            records: RecordSet::new(self.records),
            skipped: self.skipped,
        }
    }
}

/// Positions of the required columns within a header row.
fn resolve_columns<S: AsRef<str>>(
    headers: &[S],
    columns: &ColumnNames,
) -> Result<[usize; 4], LoadError> {
    let mut out = [0usize; 4];
    for (slot, name) in out.iter_mut().zip(columns.as_array()) {
        *slot = headers
            .iter()
            .position(|h| h.as_ref().trim() == name)
            .ok_or_else(|| LoadError::MissingColumn {
                column: name.to_string(),
            })?;
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

fn load_workbook(path: &Path, options: &SourceOptions, sink: &mut RecordSink) -> Result<(), LoadError> {
    let mut workbook = open_workbook_auto(path)?;

    let range = match &options.sheet {
        Some(name) => {
            if !workbook.sheet_names().iter().any(|s| s == name) {
                return Err(LoadError::NoSheet(name.clone()));
            }
            workbook.worksheet_range(name)?
        }
        None => workbook
            .worksheet_range_at(0)
            .ok_or_else(|| LoadError::NotTabular("workbook contains no sheets".to_string()))??,
    };

    let mut rows = range.rows();
    let header: Vec<String> = rows
        .next()
        .ok_or_else(|| LoadError::NotTabular("sheet is empty".to_string()))?
        .iter()
        .map(|c| c.to_string())
        .collect();
    let idx = resolve_columns(&header, &options.columns)?;

    for row in rows {
        let cells = idx.map(|i| row.get(i).map(excel_cell).unwrap_or(CellValue::Empty));
        sink.push(cells, &options.columns);
    }
    Ok(())
}

fn excel_cell(cell: &Data) -> CellValue {
    match cell {
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Float(v) => CellValue::Number(*v),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(d) => CellValue::Date(d.date()),
            None => CellValue::Number(dt.as_f64()),
        },
        Data::Error(_) | Data::Empty => CellValue::Empty,
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Every CSV cell is read as text; typing happens in the row sink.
fn load_csv(path: &Path, columns: &ColumnNames, sink: &mut RecordSink) -> Result<(), LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    let idx = resolve_columns(&headers, columns)?;

    for result in reader.records() {
        let record = result?;
        let cells = idx.map(|i| match record.get(i) {
            Some(s) if !s.is_empty() => CellValue::Text(s.to_string()),
            _ => CellValue::Empty,
        });
        sink.push(cells, columns);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Works with files written by Pandas (`df.to_parquet()`), Polars and the
/// bundled `generate_sample` binary.
fn load_parquet(path: &Path, columns: &ColumnNames, sink: &mut RecordSink) -> Result<(), LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

    let field_names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let idx = resolve_columns(&field_names, columns)?;

    let reader = builder.build()?;
    for batch_result in reader {
        let batch = batch_result?;
        let arrays = idx.map(|i| batch.column(i).clone());
        for row in 0..batch.num_rows() {
            let cells = [
                arrow_cell(&arrays[0], row),
                arrow_cell(&arrays[1], row),
                arrow_cell(&arrays[2], row),
                arrow_cell(&arrays[3], row),
            ];
            sink.push(cells, columns);
        }
    }
    Ok(())
}

/// Extract a single cell from an Arrow column at a given row.
fn arrow_cell(col: &ArrayRef, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Empty;
    }
    let date = |d: Option<NaiveDate>| d.map(CellValue::Date).unwrap_or(CellValue::Empty);
    let timestamp = |d: Option<NaiveDateTime>| date(d.map(|dt| dt.date()));

    match col.data_type() {
        DataType::Utf8 => CellValue::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Float64 => CellValue::Number(col.as_primitive::<Float64Type>().value(row)),
        DataType::Float32 => CellValue::Number(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Int64 => CellValue::Number(col.as_primitive::<Int64Type>().value(row) as f64),
        DataType::Int32 => CellValue::Number(col.as_primitive::<Int32Type>().value(row) as f64),
        DataType::Date32 => date(col.as_primitive::<Date32Type>().value_as_date(row)),
        DataType::Date64 => date(col.as_primitive::<Date64Type>().value_as_date(row)),
        DataType::Timestamp(TimeUnit::Second, _) => {
            timestamp(col.as_primitive::<TimestampSecondType>().value_as_datetime(row))
        }
        DataType::Timestamp(TimeUnit::Millisecond, _) => {
            timestamp(col.as_primitive::<TimestampMillisecondType>().value_as_datetime(row))
        }
        DataType::Timestamp(TimeUnit::Microsecond, _) => {
            timestamp(col.as_primitive::<TimestampMicrosecondType>().value_as_datetime(row))
        }
        DataType::Timestamp(TimeUnit::Nanosecond, _) => {
            timestamp(col.as_primitive::<TimestampNanosecondType>().value_as_datetime(row))
        }
        // Decimals, dictionaries, etc.: fall back to Arrow's own formatting.
        _ => arrow::util::display::array_value_to_string(col.as_ref(), row)
            .map(CellValue::Text)
            .unwrap_or(CellValue::Empty),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON as written by `df.to_json(orient='records')`.
/// Required columns are checked against the first record. Numeric dates are
/// epoch milliseconds, the pandas default.
fn load_json(path: &Path, columns: &ColumnNames, sink: &mut RecordSink) -> Result<(), LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root: JsonValue = serde_json::from_str(&text)?;

    let records = root
        .as_array()
        .ok_or_else(|| LoadError::NotTabular("expected a top-level JSON array".to_string()))?;

    let first = records
        .first()
        .ok_or_else(|| LoadError::NotTabular("JSON array has no records".to_string()))?
        .as_object()
        .ok_or_else(|| LoadError::NotTabular("record 0 is not a JSON object".to_string()))?;
    let keys: Vec<&String> = first.keys().collect();
    resolve_columns(&keys, columns)?;

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| LoadError::NotTabular(format!("record {i} is not a JSON object")))?;
        let [date, amount, segment, industry] = columns
            .as_array()
            .map(|name| obj.get(name).map(json_cell).unwrap_or(CellValue::Empty));
        sink.push([from_epoch_millis(date), amount, segment, industry], columns);
    }
    Ok(())
}

fn json_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::Text(s.clone()),
        JsonValue::Number(n) => n.as_f64().map(CellValue::Number).unwrap_or(CellValue::Empty),
        JsonValue::Null => CellValue::Empty,
        other => CellValue::Text(other.to_string()),
    }
}

fn from_epoch_millis(cell: CellValue) -> CellValue {
    match cell {
        CellValue::Number(ms) if ms.is_finite() => {
            match DateTime::from_timestamp_millis(ms as i64) {
                Some(dt) => CellValue::Date(dt.date_naive()),
                None => CellValue::Number(ms),
            }
        }
        other => other,
    }
}

// ---------------------------------------------------------------------------
// Cell parsing
// ---------------------------------------------------------------------------

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%d-%b-%Y"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

fn parse_date_cell(cell: &CellValue, column: &str) -> Result<NaiveDate, ParseError> {
    let invalid = || ParseError::InvalidDate {
        value: cell.to_string(),
    };
    match cell {
        _ if cell.is_missing() => Err(ParseError::MissingField {
            column: column.to_string(),
        }),
        CellValue::Date(d) => Ok(*d),
        CellValue::Number(serial) => from_serial(*serial).ok_or_else(invalid),
        CellValue::Text(s) => parse_date_text(s).ok_or_else(invalid),
        CellValue::Empty => Err(invalid()),
    }
}

/// Accepts ISO dates and date-times, RFC 3339, and common US layouts.
pub fn parse_date_text(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

/// Spreadsheet serial day number (days since 1899-12-30).
fn from_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(0.0..2_958_466.0).contains(&serial) {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(serial.floor() as u64))
}

fn parse_amount_cell(cell: &CellValue, column: &str) -> Result<Decimal, ParseError> {
    let invalid = || ParseError::InvalidAmount {
        value: cell.to_string(),
    };
    match cell {
        _ if cell.is_missing() => Err(ParseError::MissingField {
            column: column.to_string(),
        }),
        CellValue::Number(v) => Decimal::from_f64(*v).ok_or_else(invalid),
        CellValue::Text(s) => parse_amount_text(s).ok_or_else(invalid),
        CellValue::Date(_) | CellValue::Empty => Err(invalid()),
    }
}

const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£', '¥'];

/// Accepts an optional sign, a leading or trailing currency symbol and
/// thousands separators; `(12.50)` is negative. Anything else around the
/// number rejects the whole cell.
pub fn parse_amount_text(s: &str) -> Option<Decimal> {
    let s = s.trim();
    let (paren, s) = match s.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
        Some(inner) => (true, inner.trim()),
        None => (false, s),
    };
    let (minus, s) = match s.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, s),
    };

    let s = s
        .strip_prefix(CURRENCY_SYMBOLS)
        .or_else(|| s.strip_suffix(CURRENCY_SYMBOLS))
        .unwrap_or(s)
        .trim();
    let token = s.replace(',', "");
    if token.is_empty() || token.contains(char::is_whitespace) {
        return None;
    }

    let amount = Decimal::from_str(&token)
        .ok()
        .or_else(|| Decimal::from_scientific(&token).ok())?;
    Some(if paren || minus { -amount.abs() } else { amount })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn temp_with(suffix: &str, contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    #[test]
    fn date_text_formats() {
        assert_eq!(parse_date_text("2023-01-02"), Some(d(2023, 1, 2)));
        assert_eq!(parse_date_text("2023-01-02 13:45:00"), Some(d(2023, 1, 2)));
        assert_eq!(parse_date_text("2023-01-02T13:45:00.250"), Some(d(2023, 1, 2)));
        assert_eq!(parse_date_text("2023-01-02T23:30:00+02:00"), Some(d(2023, 1, 2)));
        assert_eq!(parse_date_text("06/05/2023"), Some(d(2023, 6, 5)));
        assert_eq!(parse_date_text("not a date"), None);
        assert_eq!(parse_date_text("2023-02-30"), None);
    }

    #[test]
    fn serial_dates() {
        assert_eq!(from_serial(44928.0), Some(d(2023, 1, 2)));
        assert_eq!(from_serial(44928.75), Some(d(2023, 1, 2)));
        assert_eq!(from_serial(-1.0), None);
        assert_eq!(from_serial(f64::NAN), None);
    }

    #[test]
    fn amount_text_formats() {
        let dec = |s: &str| Decimal::from_str(s).unwrap();
        assert_eq!(parse_amount_text("1,234.50"), Some(dec("1234.50")));
        assert_eq!(parse_amount_text("$75"), Some(dec("75")));
        assert_eq!(parse_amount_text("-12.5"), Some(dec("-12.5")));
        assert_eq!(parse_amount_text("(40.00)"), Some(dec("-40.00")));
        assert_eq!(parse_amount_text("-$1,234.50"), Some(dec("-1234.50")));
        assert_eq!(parse_amount_text("12.5 €"), Some(dec("12.5")));
        assert_eq!(parse_amount_text("1.5e3"), Some(dec("1500")));
        assert_eq!(parse_amount_text("n/a"), None);
    }

    #[test]
    fn amount_text_with_extra_words_is_rejected() {
        assert_eq!(parse_amount_text("10 to 20"), None);
        assert_eq!(parse_amount_text("12 apples 3"), None);
        assert_eq!(parse_amount_text("about 5"), None);
        assert_eq!(parse_amount_text("e"), None);
        assert_eq!(parse_amount_text("1.2.3"), None);

        let file = temp_with(
            ".csv",
            "Date,Amount,customer_segment,businessindustrytype\n\
             2023-01-02,10 to 20,SegA,Tech\n\
             2023-01-03,$20,SegA,Tech\n",
        );
        let loaded = load_file(file.path(), &SourceOptions::default()).unwrap();
        assert_eq!(loaded.records.len(), 1);
        assert_eq!(
            loaded.skipped,
            vec![SkippedRow {
                row: 1,
                reason: ParseError::InvalidAmount {
                    value: "10 to 20".to_string()
                },
            }]
        );
    }

    #[test]
    fn amounts_past_the_decimal_range_are_skipped() {
        let file = temp_with(
            ".csv",
            "Date,Amount,customer_segment,businessindustrytype\n\
             2023-01-02,79228162514264337593543950335,SegA,Tech\n\
             2023-01-03,79228162514264337593543950335,SegB,Tech\n\
             2023-01-04,-1,SegB,Tech\n",
        );
        let loaded = load_file(file.path(), &SourceOptions::default()).unwrap();
        assert_eq!(loaded.records.len(), 1);
        assert_eq!(loaded.skipped.len(), 2);
        assert!(loaded
            .skipped
            .iter()
            .all(|s| matches!(s.reason, ParseError::AmountOutOfRange { .. })));
        assert_eq!(
            crate::data::aggregate::total_amount(&loaded.records),
            Decimal::MAX
        );
    }

    #[test]
    fn number_cells_become_exact_decimals() {
        let amount = parse_amount_cell(&CellValue::Number(0.1), "Amount").unwrap();
        assert_eq!(amount, Decimal::from_str("0.1").unwrap());
    }

    #[test]
    fn csv_rows_with_bad_cells_are_skipped() {
        let file = temp_with(
            ".csv",
            "Date,Amount,customer_segment,businessindustrytype\n\
             2023-01-02,100,SegA,Tech\n\
             yesterday,50,SegB,Tech\n\
             2023-06-05,,SegA,Retail\n\
             2023-06-06,abc,SegA,Retail\n\
             2023-06-07,10,,Retail\n\
             2024-02-01,75.25,SegB,Retail\n",
        );

        let loaded = load_file(file.path(), &SourceOptions::default()).unwrap();
        assert_eq!(loaded.records.len(), 2);
        assert_eq!(loaded.skipped.len(), 4);
        assert_eq!(
            loaded.skipped[0],
            SkippedRow {
                row: 2,
                reason: ParseError::InvalidDate {
                    value: "yesterday".to_string()
                },
            }
        );
        assert!(matches!(loaded.skipped[1].reason, ParseError::MissingField { .. }));
        assert!(matches!(loaded.skipped[2].reason, ParseError::InvalidAmount { .. }));
        assert_eq!(
            loaded.skipped[3].reason,
            ParseError::MissingField {
                column: "customer_segment".to_string()
            }
        );
    }

    #[test]
    fn missing_column_fails_the_load() {
        let file = temp_with(".csv", "Date,Amount,customer_segment\n2023-01-02,100,SegA\n");
        let err = load_file(file.path(), &SourceOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::MissingColumn { ref column } if column == "businessindustrytype"
        ));
    }

    #[test]
    fn custom_column_names() {
        let file = temp_with(".csv", "when,value,seg,ind\n2023-01-02,9,A,B\n");
        let options = SourceOptions {
            sheet: None,
            columns: ColumnNames {
                date: "when".into(),
                amount: "value".into(),
                segment: "seg".into(),
                industry: "ind".into(),
            },
        };
        let loaded = load_file(file.path(), &options).unwrap();
        assert_eq!(loaded.records.len(), 1);
    }

    #[test]
    fn json_records() {
        let file = temp_with(
            ".json",
            r#"[
                {"Date": "2023-01-02", "Amount": 100.5, "customer_segment": "SegA", "businessindustrytype": "Tech"},
                {"Date": null, "Amount": 1, "customer_segment": "SegA", "businessindustrytype": "Tech"}
            ]"#,
        );
        let loaded = load_file(file.path(), &SourceOptions::default()).unwrap();
        assert_eq!(loaded.records.len(), 1);
        assert_eq!(loaded.skipped.len(), 1);
        let first = &loaded.records.as_slice()[0];
        assert_eq!(first.amount(), Decimal::from_str("100.5").unwrap());
        assert_eq!(first.industry_type().as_ref(), "Tech");
    }

    #[test]
    fn json_numeric_dates_are_epoch_millis() {
        let file = temp_with(
            ".json",
            r#"[{"Date": 1672617600000, "Amount": 100, "customer_segment": "SegA", "businessindustrytype": "Tech"}]"#,
        );
        let loaded = load_file(file.path(), &SourceOptions::default()).unwrap();
        assert!(loaded.skipped.is_empty());
        assert_eq!(loaded.records.as_slice()[0].date(), d(2023, 1, 2));
    }

    #[test]
    fn empty_json_array_is_not_tabular() {
        let file = temp_with(".json", "[]");
        let err = load_file(file.path(), &SourceOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::NotTabular(_)));
    }

    #[test]
    fn missing_file_and_unknown_extension() {
        let err = load_file(Path::new("/definitely/not/here.xlsx"), &SourceOptions::default())
            .unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));

        let file = temp_with(".txt", "whatever");
        let err = load_file(file.path(), &SourceOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(ref ext) if ext == "txt"));
    }

    #[test]
    fn labels_are_interned() {
        let file = temp_with(
            ".csv",
            "Date,Amount,customer_segment,businessindustrytype\n\
             2023-01-02,1,SegA,Tech\n\
             2023-01-03,2,SegA,Tech\n",
        );
        let loaded = load_file(file.path(), &SourceOptions::default()).unwrap();
        let rows = loaded.records.as_slice();
        assert!(Arc::ptr_eq(rows[0].customer_segment(), rows[1].customer_segment()));
    }
}
