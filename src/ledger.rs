//! The ledger store: parses the semicolon-delimited CSV export into an
//! immutable, date-sorted sequence of transactions.

use crate::error::LoadError;
use crate::model::transaction::{AMOUNT_STR, DATE_FORMAT, DATE_STR, HEADERS};
use crate::model::{Amount, Transaction};
use chrono::NaiveDate;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

/// The complete sequence of transactions from one CSV export, sorted
/// ascending by date. Immutable after construction.
#[derive(Debug, Clone)]
pub struct Ledger {
    rows: Vec<Transaction>,
    first_date: NaiveDate,
    last_date: NaiveDate,
}

impl Ledger {
    /// Builds a ledger from already-parsed transactions. The rows are sorted
    /// by date; their relative order within a day is preserved.
    pub fn new(mut rows: Vec<Transaction>) -> Result<Self, LoadError> {
        if rows.is_empty() {
            return Err(LoadError::Empty);
        }
        rows.sort_by_key(|t| t.date());
        let first_date = rows[0].date();
        let last_date = rows[rows.len() - 1].date();
        Ok(Self {
            rows,
            first_date,
            last_date,
        })
    }

    /// Reads and parses the CSV export at `path`.
    ///
    /// The header row must match the expected nine-column layout. Fields may
    /// be quoted to embed literal semicolons. Any row with an unparsable date
    /// or amount fails the whole load.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(LoadError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .from_path(path)
            .map_err(|e| match e.into_kind() {
                csv::ErrorKind::Io(source) => LoadError::Io {
                    path: path.to_path_buf(),
                    source,
                },
                other => LoadError::Header {
                    reason: format!("{other:?}"),
                },
            })?;

        let headers = reader.headers().map_err(|e| LoadError::Header {
            reason: e.to_string(),
        })?;
        validate_headers(headers)?;

        let mut rows = Vec::new();
        for (ix, result) in reader.records().enumerate() {
            // The header occupies line 1.
            let fallback_line = (ix + 2) as u64;
            let record = result.map_err(|e| LoadError::Row {
                line: e.position().map(|p| p.line()).unwrap_or(fallback_line),
                reason: e.to_string(),
            })?;
            let line = record
                .position()
                .map(|p| p.line())
                .unwrap_or(fallback_line);
            rows.push(parse_record(&record, line)?);
        }

        let ledger = Self::new(rows)?;
        info!(
            "{} transactions loaded and sorted from [{}], spanning {} to {}",
            ledger.len(),
            path.display(),
            ledger.first_date(),
            ledger.last_date()
        );
        Ok(ledger)
    }

    /// All transactions, sorted ascending by date.
    pub fn transactions(&self) -> &[Transaction] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The date of the earliest transaction.
    pub fn first_date(&self) -> NaiveDate {
        self.first_date
    }

    /// The date of the latest transaction.
    pub fn last_date(&self) -> NaiveDate {
        self.last_date
    }
}

fn validate_headers(headers: &csv::StringRecord) -> Result<(), LoadError> {
    if headers.len() != HEADERS.len() {
        return Err(LoadError::Header {
            reason: format!(
                "expected {} columns, found {}",
                HEADERS.len(),
                headers.len()
            ),
        });
    }
    for (ix, expected) in HEADERS.iter().enumerate() {
        let found = headers.get(ix).unwrap_or_default();
        if found != *expected {
            return Err(LoadError::Header {
                reason: format!("expected column {} to be '{expected}', found '{found}'", ix + 1),
            });
        }
    }
    Ok(())
}

fn parse_record(record: &csv::StringRecord, line: u64) -> Result<Transaction, LoadError> {
    if record.len() != HEADERS.len() {
        return Err(LoadError::Row {
            line,
            reason: format!(
                "expected {} fields, found {}",
                HEADERS.len(),
                record.len()
            ),
        });
    }
    let field = |ix: usize| record.get(ix).unwrap_or_default();

    let date = NaiveDate::parse_from_str(field(0), DATE_FORMAT).map_err(|e| LoadError::Row {
        line,
        reason: format!("invalid {DATE_STR} '{}': {e}", field(0)),
    })?;
    let amount = Amount::from_str(field(3)).map_err(|e| LoadError::Row {
        line,
        reason: format!("invalid {AMOUNT_STR} '{}': {e}", field(3)),
    })?;

    Ok(Transaction::new(
        date,
        field(1),
        field(2),
        amount,
        field(4),
        field(5),
        field(6),
        field(7),
        field(8),
    ))
}
