use crate::error::{Result, SpendingError};
use crate::schema::Record;
use crate::utils::parse_ledger_date;
use log::{debug, info};
use rust_decimal::Decimal;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

pub const DATE_COLUMN: &str = "Date";
pub const WHO_COLUMN: &str = "Who";
pub const WHAT_COLUMN: &str = "What";
pub const CATEGORY_COLUMN: &str = "Category";
pub const PRICE_COLUMN: &str = "Price";

/// A record set exactly as read from its source: labelled string cells.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let columns = reader
            .headers()?
            .iter()
            .map(|h| h.to_string())
            .collect::<Vec<_>>();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(|cell| cell.to_string()).collect());
        }

        debug!(
            "Read {} rows with columns {:?} from CSV",
            rows.len(),
            columns
        );
        Ok(Self { columns, rows })
    }

    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(file)
    }

    /// Trims every column label. Cell values are left alone.
    pub fn normalize_columns(mut self) -> Self {
        for column in &mut self.columns {
            let trimmed = column.trim();
            if trimmed.len() != column.len() {
                *column = trimmed.to_string();
            }
        }
        self
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| SpendingError::MissingColumn(name.to_string()))
    }
}

/// The immutable set of spending records every report reads from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ledger {
    records: Vec<Record>,
}

impl Ledger {
    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Normalizes the column labels, then converts every row into a typed record.
    pub fn from_table(table: RawTable) -> Result<Self> {
        let table = table.normalize_columns();

        let date_idx = table.require_column(DATE_COLUMN)?;
        let who_idx = table.require_column(WHO_COLUMN)?;
        let category_idx = table.require_column(CATEGORY_COLUMN)?;
        let price_idx = table.require_column(PRICE_COLUMN)?;
        let what_idx = table.column_index(WHAT_COLUMN);

        let mut records = Vec::with_capacity(table.rows.len());

        for (row_idx, row) in table.rows.iter().enumerate() {
            let cell = |idx: usize| row.get(idx).map(String::as_str).unwrap_or("");

            let raw_date = cell(date_idx);
            let date = parse_ledger_date(raw_date).ok_or_else(|| SpendingError::InvalidValue {
                row: row_idx,
                column: DATE_COLUMN.to_string(),
                value: raw_date.to_string(),
            })?;

            let raw_price = cell(price_idx);
            let price = parse_price(raw_price).ok_or_else(|| SpendingError::InvalidValue {
                row: row_idx,
                column: PRICE_COLUMN.to_string(),
                value: raw_price.to_string(),
            })?;

            records.push(Record {
                date,
                who: cell(who_idx).trim().to_string(),
                what: what_idx.map(|idx| cell(idx).trim().to_string()).unwrap_or_default(),
                category: cell(category_idx).trim().to_string(),
                price,
            });
        }

        info!("Loaded ledger with {} records", records.len());
        Ok(Self { records })
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_table(RawTable::from_csv_reader(reader)?)
    }

    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_table(RawTable::from_csv_path(path)?)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn parse_price(value: &str) -> Option<Decimal> {
    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }
    let cleaned = strip_thousands_separators(&compact)?;
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()
}

/// Drops `,` only where it groups the integer part in threes (`1,200.00`).
/// A comma used as the decimal mark (`12,50`) makes the cell unreadable.
fn strip_thousands_separators(value: &str) -> Option<String> {
    if !value.contains(',') {
        return Some(value.to_string());
    }

    let (integer, fraction) = value.split_at(value.find('.').unwrap_or(value.len()));
    if fraction.contains(',') {
        return None;
    }

    let mut groups = integer.split(',');
    let lead = groups
        .next()
        .unwrap_or("")
        .trim_start_matches(|c: char| c == '-' || c == '+');
    if lead.is_empty() || lead.len() > 3 {
        return None;
    }
    if !groups.all(|group| group.len() == 3 && group.bytes().all(|b| b.is_ascii_digit())) {
        return None;
    }

    Some(format!("{}{}", integer.replace(',', ""), fraction))
}
