//! These structs provide the CLI interface for the ledgerlens CLI.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

/// ledgerlens: explore a personal-finance CSV export from the command line.
///
/// The program loads a semicolon-delimited transaction export (the kind most
/// banks produce), partitions it by year and month, and serves cached chart
/// series and table rows filtered by spending category — the same aggregation
/// core a visualization front end would sit on top of.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show the loaded ledger's date span, row count and partition count.
    Info,
    /// List the fixed category enumeration, bit positions and icon names.
    Categories,
    /// Print a chart series: per-month sums for a year, or the cumulative
    /// spend-to-date per day for a single month.
    Chart(ChartArgs),
    /// Print the transaction table for a month or a single day.
    Table(TableArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The transaction CSV export to load. When omitted, the current
    /// directory is scanned for a *.csv file.
    #[arg(long, short = 'f', env = "LEDGERLENS_CSV")]
    csv: Option<PathBuf>,
}

impl Common {
    pub fn new(log_level: LevelFilter, csv: Option<PathBuf>) -> Self {
        Self { log_level, csv }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn csv(&self) -> Option<&PathBuf> {
        self.csv.as_ref()
    }
}

/// Args for the `ledgerlens chart` command.
#[derive(Debug, Parser, Clone)]
pub struct ChartArgs {
    /// The year to chart.
    #[arg(long, short = 'y')]
    year: i32,

    /// The month to chart (1-12). When omitted, the whole year is charted.
    #[arg(long, short = 'm')]
    month: Option<u32>,

    /// A category to activate, by its CSV name. May be repeated.
    #[arg(long = "category", short = 'c')]
    categories: Vec<String>,

    /// Activate every category.
    #[arg(long, conflicts_with = "categories")]
    all: bool,
}

impl ChartArgs {
    pub fn new(year: i32, month: Option<u32>, categories: Vec<String>, all: bool) -> Self {
        Self {
            year,
            month,
            categories,
            all,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> Option<u32> {
        self.month
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn all(&self) -> bool {
        self.all
    }
}

/// Args for the `ledgerlens table` command.
#[derive(Debug, Parser, Clone)]
pub struct TableArgs {
    /// The year to list.
    #[arg(long, short = 'y')]
    year: i32,

    /// The month to list (1-12).
    #[arg(long, short = 'm')]
    month: u32,

    /// A single day of the month. When omitted, the whole month is listed.
    #[arg(long, short = 'd')]
    day: Option<u32>,

    /// A category to activate, by its CSV name. May be repeated.
    #[arg(long = "category", short = 'c')]
    categories: Vec<String>,

    /// Activate every category.
    #[arg(long, conflicts_with = "categories")]
    all: bool,
}

impl TableArgs {
    pub fn new(year: i32, month: u32, day: Option<u32>, categories: Vec<String>, all: bool) -> Self {
        Self {
            year,
            month,
            day,
            categories,
            all,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> Option<u32> {
        self.day
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn all(&self) -> bool {
        self.all
    }
}
