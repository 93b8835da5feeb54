//! CSV ingest and daily aggregation.
//!
//! This module turns the three raw tables into the daily table every view reads:
//!
//! - `train.csv`: one row per (date, store, product family) with `sales` and `onpromotion`
//! - `stores.csv`: store dimension keyed by `store_nbr`
//! - `holidays_events.csv`: calendar of holiday/event dates
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic output** (dates ascending, one row per date)

use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::StringRecord;
use serde::Deserialize;

use crate::domain::DailySalesRecord;
use crate::error::AppError;

pub const TRANSACTIONS_FILE: &str = "train.csv";
pub const STORES_FILE: &str = "stores.csv";
pub const HOLIDAYS_FILE: &str = "holidays_events.csv";

/// Locations of the three input tables.
#[derive(Debug, Clone, PartialEq)]
pub struct InputPaths {
    pub transactions: PathBuf,
    pub stores: PathBuf,
    pub holidays: PathBuf,
}

impl InputPaths {
    /// Standard file names inside one data directory.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            transactions: dir.join(TRANSACTIONS_FILE),
            stores: dir.join(STORES_FILE),
            holidays: dir.join(HOLIDAYS_FILE),
        }
    }
}

/// A row-level problem encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub file: &'static str,
    pub line: usize,
    pub message: String,
}

/// Summary of what the loader read and kept.
#[derive(Debug, Clone, Default)]
pub struct LoadStats {
    /// Transaction rows read (excluding the header).
    pub rows_read: usize,
    /// Transaction rows that contributed to the daily table.
    pub rows_used: usize,
    /// Transaction rows with an empty `sales` cell (counted as 0).
    pub blank_sales_rows: usize,
    /// Transaction rows whose `store_nbr` is absent from the store table.
    pub unmatched_store_rows: usize,
    /// Distinct stores in the store table.
    pub stores_loaded: usize,
    /// Distinct dates in the holiday calendar.
    pub holiday_dates: usize,
    pub row_errors: Vec<RowError>,
}

/// Loader output: the daily table plus load stats.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub daily: Vec<DailySalesRecord>,
    pub stats: LoadStats,
}

impl Dataset {
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.daily.first().map(|r| r.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.daily.last().map(|r| r.date)
    }
}

#[derive(Debug, Deserialize)]
struct TransactionRow {
    date: String,
    store_nbr: u32,
    sales: Option<f64>,
    onpromotion: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct StoreRow {
    store_nbr: u32,
}

#[derive(Debug, Deserialize)]
struct HolidayRow {
    date: String,
}

#[derive(Debug, Default, Clone, Copy)]
struct DayAccum {
    sales: f64,
    promotions: u64,
}

/// Load the three tables from `dir` and aggregate them to one row per date.
pub fn load_dataset(dir: &Path) -> Result<Dataset, AppError> {
    let paths = InputPaths::in_dir(dir);
    let transactions = open_input(&paths.transactions)?;
    let stores = open_input(&paths.stores)?;
    let holidays = open_input(&paths.holidays)?;
    load_from_readers(transactions, stores, holidays)
}

/// Same as [`load_dataset`], over arbitrary readers.
pub fn load_from_readers<T: Read, S: Read, H: Read>(
    transactions: T,
    stores: S,
    holidays: H,
) -> Result<Dataset, AppError> {
    let mut row_errors = Vec::new();

    let stores = read_stores(stores, &mut row_errors)?;
    let holidays = read_holidays(holidays, &mut row_errors)?;

    let mut reader = csv_reader(transactions);
    prepare_headers(&mut reader, TRANSACTIONS_FILE, &["date", "store_nbr", "sales"])?;

    let mut days: BTreeMap<NaiveDate, DayAccum> = BTreeMap::new();
    let mut rows_read = 0usize;
    let mut rows_used = 0usize;
    let mut unmatched_store_rows = 0usize;
    let mut blank_sales_rows = 0usize;

    for (idx, result) in reader.deserialize::<TransactionRow>().enumerate() {
        // +2: header is line 1 and records are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let row = match result {
            Ok(row) => row,
            Err(e) => {
                let message = format!("CSV parse error: {e}");
                row_errors.push(row_error(TRANSACTIONS_FILE, line, message));
                continue;
            }
        };

        let date = match parse_date(&row.date) {
            Ok(d) => d,
            Err(msg) => {
                row_errors.push(row_error(TRANSACTIONS_FILE, line, msg));
                continue;
            }
        };

        // An empty cell sums as zero; the row still carries its date and promotions.
        let sales = match row.sales {
            Some(v) if !v.is_finite() || v < 0.0 => {
                row_errors.push(row_error(
                    TRANSACTIONS_FILE,
                    line,
                    format!("Invalid `sales` {v} (must be finite and >= 0)."),
                ));
                continue;
            }
            Some(v) => v,
            None => {
                blank_sales_rows += 1;
                0.0
            }
        };

        if !stores.contains(&row.store_nbr) {
            unmatched_store_rows += 1;
        }

        let acc = days.entry(date).or_default();
        acc.sales += sales;
        acc.promotions += row.onpromotion.unwrap_or(0);
        rows_used += 1;
    }

    if days.is_empty() {
        return Err(AppError::new(
            3,
            format!("No valid rows remain in {TRANSACTIONS_FILE} after validation."),
        ));
    }

    let daily: Vec<DailySalesRecord> = days
        .into_iter()
        .map(|(date, acc)| DailySalesRecord {
            date,
            total_sales: acc.sales,
            promotion_count: acc.promotions,
            is_holiday: holidays.contains(&date),
        })
        .collect();

    tracing::info!(
        days = daily.len(),
        rows_read,
        rows_used,
        skipped = row_errors.len(),
        blank_sales_rows,
        unmatched_store_rows,
        "aggregated transactions to daily table"
    );

    Ok(Dataset {
        daily,
        stats: LoadStats {
            rows_read,
            rows_used,
            blank_sales_rows,
            unmatched_store_rows,
            stores_loaded: stores.len(),
            holiday_dates: holidays.len(),
            row_errors,
        },
    })
}

fn open_input(path: &Path) -> Result<File, AppError> {
    File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open '{}': {e}", path.display())))
}

fn csv_reader<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input)
}

/// Store numbers present in the store table; other columns are not used.
fn read_stores<R: Read>(
    input: R,
    row_errors: &mut Vec<RowError>,
) -> Result<HashSet<u32>, AppError> {
    let mut reader = csv_reader(input);
    prepare_headers(&mut reader, STORES_FILE, &["store_nbr"])?;

    let mut stores = HashSet::new();
    for (idx, result) in reader.deserialize::<StoreRow>().enumerate() {
        match result {
            Ok(row) => {
                stores.insert(row.store_nbr);
            }
            Err(e) => {
                let message = format!("CSV parse error: {e}");
                row_errors.push(row_error(STORES_FILE, idx + 2, message));
            }
        }
    }
    tracing::debug!(stores = stores.len(), "loaded store table");
    Ok(stores)
}

fn read_holidays<R: Read>(
    input: R,
    row_errors: &mut Vec<RowError>,
) -> Result<HashSet<NaiveDate>, AppError> {
    let mut reader = csv_reader(input);
    prepare_headers(&mut reader, HOLIDAYS_FILE, &["date"])?;

    let mut dates = HashSet::new();
    for (idx, result) in reader.deserialize::<HolidayRow>().enumerate() {
        let line = idx + 2;
        let parsed = result
            .map_err(|e| format!("CSV parse error: {e}"))
            .and_then(|r| parse_date(&r.date));
        match parsed {
            Ok(date) => {
                dates.insert(date);
            }
            Err(msg) => row_errors.push(row_error(HOLIDAYS_FILE, line, msg)),
        }
    }
    tracing::debug!(holiday_dates = dates.len(), "loaded holiday calendar");
    Ok(dates)
}

/// Normalize header names in place and check the required columns exist.
fn prepare_headers<R: Read>(
    reader: &mut csv::Reader<R>,
    file: &str,
    required: &[&str],
) -> Result<(), AppError> {
    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read {file} headers: {e}")))?;
    let normalized: StringRecord = headers.iter().map(normalize_header_name).collect();

    for &name in required {
        if !normalized.iter().any(|col| col == name) {
            return Err(AppError::new(2, format!("{file}: missing required column `{name}`")));
        }
    }

    reader.set_headers(normalized);
    Ok(())
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn row_error(file: &'static str, line: usize, message: String) -> RowError {
    RowError { file, line, message }
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    // ISO is the expected format; a couple of common export variants are accepted.
    const FMTS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];
    let s = s.trim();
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    Err(format!(
        "Invalid date '{s}'. Expected one of: YYYY-MM-DD, YYYY/MM/DD, DD/MM/YYYY."
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const STORES: &str = "store_nbr,city,state,type,cluster\n\
        1,Quito,Pichincha,D,13\n\
        2,Quito,Pichincha,D,13\n";
    const HOLIDAYS: &str = "date,type,locale,locale_name,description,transferred\n\
        2017-01-02,Holiday,National,Ecuador,Primer dia del ano,False\n\
        2017-01-02,Event,Local,Quito,Duplicate,False\n";

    fn load(train: &str) -> Result<Dataset, AppError> {
        load_from_readers(train.as_bytes(), STORES.as_bytes(), HOLIDAYS.as_bytes())
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn aggregates_stores_and_families_per_day() {
        let train = "id,date,store_nbr,family,sales,onpromotion\n\
            0,2017-01-01,1,GROCERY,10.0,0\n\
            1,2017-01-01,2,GROCERY,20.0,3\n\
            2,2017-01-02,1,BEVERAGES,30.5,1\n\
            3,2017-01-02,2,BEVERAGES,0,\n";

        let ds = load(train).unwrap();
        assert_eq!(ds.daily.len(), 2);

        assert_eq!(ds.daily[0].date, day(2017, 1, 1));
        assert!((ds.daily[0].total_sales - 30.0).abs() < 1e-9);
        assert_eq!(ds.daily[0].promotion_count, 3);
        assert!(!ds.daily[0].is_holiday);

        assert_eq!(ds.daily[1].date, day(2017, 1, 2));
        assert!((ds.daily[1].total_sales - 30.5).abs() < 1e-9);
        assert_eq!(ds.daily[1].promotion_count, 1);
        assert!(ds.daily[1].is_holiday);

        assert_eq!(ds.stats.rows_read, 4);
        assert_eq!(ds.stats.rows_used, 4);
        assert_eq!(ds.stats.holiday_dates, 1);
        assert_eq!(ds.stats.stores_loaded, 2);
    }

    #[test]
    fn blank_sales_sum_as_zero_and_keep_promotions() {
        let train = "date,store_nbr,sales,onpromotion\n\
            2017-01-01,1,10,0\n\
            2017-01-02,1,,5\n\
            2017-01-03,2,4,1\n";
        let ds = load(train).unwrap();

        assert_eq!(ds.daily.len(), 3);
        assert_eq!(ds.daily[1].date, day(2017, 1, 2));
        assert_eq!(ds.daily[1].total_sales, 0.0);
        assert_eq!(ds.daily[1].promotion_count, 5);
        assert!(ds.stats.row_errors.is_empty());
        assert_eq!(ds.stats.rows_used, 3);
        assert_eq!(ds.stats.blank_sales_rows, 1);
    }

    #[test]
    fn three_single_day_rows_sum_per_day() {
        let train = "date,store_nbr,sales,onpromotion\n\
            2017-03-01,1,10,0\n2017-03-02,1,20,0\n2017-03-03,1,30,0\n";
        let ds = load(train).unwrap();
        let total: f64 = ds.daily.iter().map(|r| r.total_sales).sum();
        assert!((total - 60.0).abs() < 1e-9);
        assert!((total / ds.daily.len() as f64 - 20.0).abs() < 1e-9);
    }

    #[test]
    fn bad_rows_are_collected_not_fatal() {
        let train = "date,store_nbr,sales,onpromotion\n\
            2017-01-05,1,12.5,0\n\
            not-a-date,1,1.0,0\n\
            2017-01-05,1,-4.0,0\n\
            2017-01-05,1,abc,0\n\
            2017-01-06,99,7.0,2\n";
        let ds = load(train).unwrap();

        assert_eq!(ds.stats.rows_read, 5);
        assert_eq!(ds.stats.rows_used, 2);
        assert_eq!(ds.stats.row_errors.len(), 3);
        assert_eq!(ds.stats.row_errors[0].line, 3);
        assert_eq!(ds.stats.row_errors[0].file, TRANSACTIONS_FILE);
        // Unknown stores still count toward the daily total (left join).
        assert_eq!(ds.stats.unmatched_store_rows, 1);
        assert_eq!(ds.daily.len(), 2);
    }

    #[test]
    fn headers_are_case_and_bom_insensitive() {
        let train = "\u{feff}Date,Store_Nbr,SALES,OnPromotion\n2017-01-01,1,5,1\n";
        let ds = load(train).unwrap();
        assert_eq!(ds.daily.len(), 1);
        assert_eq!(ds.daily[0].promotion_count, 1);
    }

    #[test]
    fn missing_column_is_a_schema_error() {
        let train = "date,store_nbr,onpromotion\n2017-01-01,1,0\n";
        let err = load(train).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("`sales`"));
    }

    #[test]
    fn no_usable_rows_is_exit_code_3() {
        let train = "date,store_nbr,sales,onpromotion\nbad,1,1,0\n";
        let err = load(train).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn load_dataset_reads_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(TRANSACTIONS_FILE),
            "date,store_nbr,sales,onpromotion\n2017-01-02,1,8,0\n",
        )
        .unwrap();
        std::fs::write(dir.path().join(STORES_FILE), STORES).unwrap();
        std::fs::write(dir.path().join(HOLIDAYS_FILE), HOLIDAYS).unwrap();

        let ds = load_dataset(dir.path()).unwrap();
        assert_eq!(ds.daily.len(), 1);
        assert!(ds.daily[0].is_holiday);
    }

    #[test]
    fn missing_file_is_exit_code_2() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_dataset(dir.path()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains(TRANSACTIONS_FILE));
    }
}
