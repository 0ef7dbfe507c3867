//! Shared test utilities for building ledgers and services from fixture data.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::model::{Amount, Transaction};
use crate::{DataService, Ledger};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;
use tempfile::TempDir;

/// The header row every fixture CSV starts with.
pub(crate) const HEADER_LINE: &str = "Date;Recipient / Order issuer;Currency;Amount;Main category;Account name;Account no.;Booking text;Subcategory";

/// The three-row fixture: two Health expenses in January 2016 and one
/// Household expense in February 2016.
pub(crate) const SAMPLE_CSV: &str = "\
Date;Recipient / Order issuer;Currency;Amount;Main category;Account name;Account no.;Booking text;Subcategory
01.01.2016;A;CHF;-10.00;Health;Main account;CH00 1234;Pharmacy;Medication
15.01.2016;B;CHF;-5.00;Health;Main account;CH00 1234;Doctor;Checkup
01.02.2016;C;CHF;-20.00;Household;Main account;CH00 1234;Groceries;Food
";

/// Writes `content` to a CSV file in a fresh temp directory. The `TempDir`
/// must be kept alive for as long as the path is used.
pub(crate) fn write_csv(content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("transactions.csv");
    std::fs::write(&path, content).unwrap();
    (dir, path)
}

/// A transaction with the given date, amount and main category; the other
/// fields carry fixed filler values.
pub(crate) fn tx(year: i32, month: u32, day: u32, amount: &str, category: &str) -> Transaction {
    Transaction::new(
        NaiveDate::from_ymd_opt(year, month, day).unwrap(),
        "Someone",
        "CHF",
        Amount::from_str(amount).unwrap(),
        category,
        "Main account",
        "CH00 1234",
        "Booking",
        "Sub",
    )
}

pub(crate) fn ledger_from_rows(rows: Vec<Transaction>) -> Ledger {
    Ledger::new(rows).unwrap()
}

/// The ledger parsed from [`SAMPLE_CSV`].
pub(crate) fn sample_ledger() -> Ledger {
    let (dir, path) = write_csv(SAMPLE_CSV);
    let ledger = Ledger::load(&path).unwrap();
    drop(dir);
    ledger
}

/// A service over the sample ledger, with nothing selected or filtered yet.
pub(crate) fn sample_service() -> DataService {
    DataService::new(sample_ledger()).unwrap()
}

pub(crate) fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}
