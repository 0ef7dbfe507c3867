pub mod args;
pub mod commands;
mod coordinator;
mod error;
mod filter;
mod fs;
mod ledger;
pub mod model;
mod partition;
mod selection;
#[cfg(test)]
pub(crate) mod test;
mod views;

pub use coordinator::{AggregateView, DataService, Outcome, Request};
pub use error::{Error, LoadError, Result};
pub use filter::CategoryFilter;
pub use fs::discover_csv;
pub use ledger::Ledger;
pub use partition::{Partition, PartitionSet, PeriodKey};
pub use selection::Selection;
pub use views::{month_no_from_string, CacheStats, ChartSeries, TableRow, ViewCache, MONTH_NAMES};
