use crate::args::ChartArgs;
use crate::commands::{activate, Out};
use crate::coordinator::DataService;
use crate::views::{ChartSeries, MONTH_NAMES};
use crate::Result;
use anyhow::bail;
use serde::Serialize;
use std::fmt::Write;

/// Structured output of the `chart` command.
#[derive(Debug, Clone, Serialize)]
pub struct Chart {
    year: i32,
    /// 0 for the whole-year view.
    month: u32,
    bitmask: String,
    series: ChartSeries,
}

/// Prints a chart series: per-month sums for a year, or the cumulative
/// spend-to-date per day for a single month.
pub async fn chart(service: &DataService, args: &ChartArgs) -> Result<Out<Chart>> {
    if let Some(month) = args.month() {
        if !(1..=12).contains(&month) {
            bail!("[{month}] is not a month, expected 1-12");
        }
    }
    activate(service, args.categories(), args.all()).await?;

    let month = args.month().unwrap_or(0);
    let series = service.chart_series(args.year(), month);
    let chart = Chart {
        year: args.year(),
        month,
        bitmask: service.bitmask(),
        series,
    };

    let period = match args.month() {
        Some(m) => format!("{} {}", MONTH_NAMES[m as usize - 1], chart.year),
        None => chart.year.to_string(),
    };
    if chart.series.is_empty() {
        let message = format!("no matching transactions for {period} [{}]", chart.bitmask);
        return Ok(Out::new(message, chart));
    }

    let mut message = format!("{period} [{}]", chart.bitmask);
    for (label, value) in chart.series.labels().iter().zip(chart.series.values()) {
        write!(message, "\n{label:<10}  {value:>12}")?;
    }
    Ok(Out::new(message, chart))
}
