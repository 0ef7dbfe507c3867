//! The aggregation cache: memoized chart series and table rows keyed by
//! (period, day, category bitmask).
//!
//! A key fully determines its value — the ledger and its partitions never
//! change, and the bitmask captures the whole filter state — so entries are
//! append-only for the process lifetime and never invalidated.

use crate::filter::CategoryFilter;
use crate::model::Transaction;
use crate::partition::{days_in_month, PartitionSet};
use chrono::Datelike;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

/// English month names, indexed by `month - 1`. These are the labels of the
/// year-overview chart and the vocabulary of [`month_no_from_string`].
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Resolves an English month name (case-insensitive) to 1..=12.
pub fn month_no_from_string(name: &str) -> Option<u32> {
    MONTH_NAMES
        .iter()
        .position(|m| m.eq_ignore_ascii_case(name))
        .map(|ix| ix as u32 + 1)
}

/// Labels and values for one bar chart.
///
/// For a year view the values are per-month sums; for a month view they are
/// the running spend-to-date within the month. Both sequences are empty when
/// the period has no matching data at all (the explicit "no data" signal).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChartSeries {
    labels: Vec<String>,
    values: Vec<Decimal>,
}

impl ChartSeries {
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &[Decimal] {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// One formatted table row, field for field what the detail table displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TableRow {
    pub date: String,
    pub recipient: String,
    pub currency: String,
    pub amount: String,
    pub category: String,
    pub account_name: String,
    pub account_no: String,
    pub booking_text: String,
    pub subcategory: String,
}

impl TableRow {
    fn from_transaction(t: &Transaction) -> Self {
        Self {
            date: t.formatted_date(),
            recipient: t.recipient().to_string(),
            currency: t.currency().to_string(),
            amount: t.amount().to_string(),
            category: t.main_category().to_string(),
            account_name: t.account_name().to_string(),
            account_no: t.account_no().to_string(),
            booking_text: t.booking_text().to_string(),
            subcategory: t.subcategory().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ChartKey {
    year: i32,
    month: u32,
    bitmask: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TableKey {
    year: i32,
    month: u32,
    day: u32,
    bitmask: String,
}

/// Hit/miss counters for both caches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Memoizes chart series and table rows over the immutable partition set.
///
/// Recomputation only ever happens on a cache miss; there is no explicit
/// invalidation. The category/period key space is small and finite (years x
/// 13 x 2^11), which is why unbounded append-only caching is acceptable here.
#[derive(Debug)]
pub struct ViewCache {
    partitions: PartitionSet,
    chart: HashMap<ChartKey, ChartSeries>,
    table: HashMap<TableKey, Vec<TableRow>>,
    stats: CacheStats,
}

impl ViewCache {
    pub fn new(partitions: PartitionSet) -> Self {
        Self {
            partitions,
            chart: HashMap::new(),
            table: HashMap::new(),
            stats: CacheStats::default(),
        }
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }

    /// The chart series for a whole year (`month == 0`) or one month, under
    /// the given filter. Computed on first request per (period, bitmask) key,
    /// returned from the cache unchanged afterwards.
    pub fn chart_series(&mut self, filter: &CategoryFilter, year: i32, month: u32) -> ChartSeries {
        let key = ChartKey {
            year,
            month,
            bitmask: filter.bitmask(),
        };
        if let Some(series) = self.chart.get(&key) {
            self.stats.hits += 1;
            debug!(
                "chart series for key [{year}-{month}-{}] served from cache",
                key.bitmask
            );
            return series.clone();
        }

        self.stats.misses += 1;
        let series = self.compute_chart_series(filter, year, month);
        debug!(
            "chart series for key [{year}-{month}-{}] computed, {} points",
            key.bitmask,
            series.values().len()
        );
        self.chart.insert(key, series.clone());
        series
    }

    fn compute_chart_series(
        &self,
        filter: &CategoryFilter,
        year: i32,
        month: u32,
    ) -> ChartSeries {
        if month > 12 {
            warn!("[{month}] is not a month, returning an empty series");
            return ChartSeries::default();
        }
        let Some(partition) = self.partitions.get(year, month) else {
            warn!("no partition for key [{year}-{month}], returning an empty series");
            return ChartSeries::default();
        };

        if month > 0 {
            // Month view: running spend-to-date per day, not per-day deltas.
            let days = days_in_month(year, month) as usize;
            let mut daily = vec![Decimal::ZERO; days];
            for t in partition.rows().iter().filter(|t| filter.matches(t)) {
                daily[t.date().day0() as usize] += t.amount().value();
            }

            let mut running = Decimal::ZERO;
            let mut labels = Vec::with_capacity(days);
            let mut values = Vec::with_capacity(days);
            for (day0, delta) in daily.into_iter().enumerate() {
                running += delta;
                labels.push((day0 + 1).to_string());
                values.push(running);
            }
            ChartSeries { labels, values }
        } else {
            // Year view: one sum per calendar month.
            let mut values = vec![Decimal::ZERO; 12];
            for t in partition.rows().iter().filter(|t| filter.matches(t)) {
                values[t.date().month0() as usize] += t.amount().value();
            }

            let total: Decimal = values.iter().fold(Decimal::ZERO, |acc, v| acc + v);
            if total.is_zero() {
                // No data at all: both sequences reset to empty so the caller
                // can tell "all zero" apart from "not yet computed".
                return ChartSeries::default();
            }
            let labels = MONTH_NAMES.iter().map(|m| m.to_string()).collect();
            ChartSeries { labels, values }
        }
    }

    /// The formatted table rows for one month, or for a single day when
    /// `day` is 1..=days-in-month. Rows come back in ledger (chronological)
    /// order. Cached per (year, month, day, bitmask) key.
    pub fn table_rows(
        &mut self,
        filter: &CategoryFilter,
        year: i32,
        month: u32,
        day: u32,
    ) -> Vec<TableRow> {
        let key = TableKey {
            year,
            month,
            day,
            bitmask: filter.bitmask(),
        };
        if let Some(rows) = self.table.get(&key) {
            self.stats.hits += 1;
            debug!(
                "table rows for key [{year}-{month}-{day}-{}] served from cache",
                key.bitmask
            );
            return rows.clone();
        }

        self.stats.misses += 1;
        let rows = self.compute_table_rows(filter, year, month, day);
        debug!(
            "table rows for key [{year}-{month}-{day}-{}] computed, {} rows",
            key.bitmask,
            rows.len()
        );
        self.table.insert(key, rows.clone());
        rows
    }

    fn compute_table_rows(
        &self,
        filter: &CategoryFilter,
        year: i32,
        month: u32,
        day: u32,
    ) -> Vec<TableRow> {
        if !(1..=12).contains(&month) {
            warn!("[{month}] is not a month, returning no table rows");
            return Vec::new();
        }
        let Some(partition) = self.partitions.get(year, month) else {
            warn!("no partition for key [{year}-{month}], returning no table rows");
            return Vec::new();
        };

        // A day outside the month falls back to the whole month.
        let single_day = day > 0 && day <= days_in_month(year, month);
        partition
            .rows()
            .iter()
            .filter(|t| filter.matches(t))
            .filter(|t| !single_day || t.date().day() == day)
            .map(TableRow::from_transaction)
            .collect()
    }
}
