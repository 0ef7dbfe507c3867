//! Period partitions: precomputed slices of the ledger for every year and
//! every (year, month) within the ledger's date span.

use crate::model::Transaction;
use crate::Ledger;
use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use tracing::{debug, warn};

/// Identifies one partition: a whole year (`month == 0`) or a single month.
///
/// Renders as `"{year}-{month}"`, e.g. `2016-0` for the year 2016 and
/// `2016-9` for September 2016.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeriodKey {
    year: i32,
    month: u32,
}

impl PeriodKey {
    pub fn year(year: i32) -> Self {
        Self { year, month: 0 }
    }

    pub fn month(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// The first day of the period.
    pub fn start(&self) -> Option<NaiveDate> {
        let month = if self.month == 0 { 1 } else { self.month };
        NaiveDate::from_ymd_opt(self.year, month, 1)
    }

    /// The last day of the period.
    pub fn end(&self) -> Option<NaiveDate> {
        let month = if self.month == 0 { 12 } else { self.month };
        NaiveDate::from_ymd_opt(self.year, month, days_in_month(self.year, month))
    }
}

impl Display for PeriodKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.year, self.month)
    }
}

/// The number of days in a calendar month, honoring leap years.
pub(crate) fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(0)
}

/// The transactions belonging to one contiguous date range. Owns its rows, so
/// it shares no mutable state with the ledger it was built from.
#[derive(Debug, Clone)]
pub struct Partition {
    key: PeriodKey,
    rows: Vec<Transaction>,
}

impl Partition {
    pub fn key(&self) -> PeriodKey {
        self.key
    }

    /// The matching rows, in ledger (chronological) order.
    pub fn rows(&self) -> &[Transaction] {
        &self.rows
    }
}

/// All partitions for one ledger, built eagerly at startup and never
/// invalidated afterwards.
#[derive(Debug, Clone, Default)]
pub struct PartitionSet {
    map: HashMap<PeriodKey, Partition>,
}

impl PartitionSet {
    /// Builds one partition per year between the ledger's first and last
    /// dates, and one per month within the ledger's actual span. Months with
    /// no matching rows still get a (possibly empty) partition.
    pub fn build(ledger: &Ledger) -> Self {
        let mut set = Self::default();
        let first = ledger.first_date();
        let last = ledger.last_date();

        for year in first.year()..=last.year() {
            let start_month = if year == first.year() { first.month() } else { 1 };
            let end_month = if year == last.year() { last.month() } else { 12 };
            for month in start_month..=end_month {
                set.insert(PeriodKey::month(year, month), ledger);
            }
            set.insert(PeriodKey::year(year), ledger);
        }

        debug!("{} period partitions built", set.len());
        set
    }

    /// Inserts the partition for `key`. When an entry for the key already
    /// exists, the original is kept and a warning is logged.
    fn insert(&mut self, key: PeriodKey, ledger: &Ledger) {
        if self.map.contains_key(&key) {
            warn!("a partition for key [{key}] already exists, keeping the original");
            return;
        }
        let (Some(start), Some(end)) = (key.start(), key.end()) else {
            warn!("key [{key}] does not describe a valid period, skipping");
            return;
        };
        let rows = ledger
            .transactions()
            .iter()
            .filter(|t| t.date() >= start && t.date() <= end)
            .cloned()
            .collect();
        self.map.insert(key, Partition { key, rows });
    }

    /// The partition for a year (`month == 0`) or a (year, month) pair.
    pub fn get(&self, year: i32, month: u32) -> Option<&Partition> {
        self.map.get(&PeriodKey { year, month })
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
