use crate::args::TableArgs;
use crate::commands::{activate, Out};
use crate::coordinator::DataService;
use crate::partition::days_in_month;
use crate::views::{TableRow, MONTH_NAMES};
use crate::Result;
use anyhow::bail;
use serde::Serialize;
use std::fmt::Write;

/// Structured output of the `table` command.
#[derive(Debug, Clone, Serialize)]
pub struct Table {
    year: i32,
    month: u32,
    /// 0 for the whole-month view.
    day: u32,
    bitmask: String,
    rows: Vec<TableRow>,
}

/// Prints the matching transactions of a month or a single day, in
/// chronological order.
pub async fn table(service: &DataService, args: &TableArgs) -> Result<Out<Table>> {
    if !(1..=12).contains(&args.month()) {
        bail!("[{}] is not a month, expected 1-12", args.month());
    }
    if let Some(day) = args.day() {
        let last = days_in_month(args.year(), args.month());
        if day == 0 || day > last {
            bail!(
                "[{day}] is not a day of {} {}, expected 1-{last}",
                MONTH_NAMES[args.month() as usize - 1],
                args.year()
            );
        }
    }
    activate(service, args.categories(), args.all()).await?;

    let day = args.day().unwrap_or(0);
    let rows = service.table_rows(args.year(), args.month(), day);
    let table = Table {
        year: args.year(),
        month: args.month(),
        day,
        bitmask: service.bitmask(),
        rows,
    };

    let period = match args.day() {
        Some(d) => format!("{d}. {} {}", MONTH_NAMES[args.month() as usize - 1], table.year),
        None => format!("{} {}", MONTH_NAMES[args.month() as usize - 1], table.year),
    };
    if table.rows.is_empty() {
        let message = format!("no matching transactions for {period} [{}]", table.bitmask);
        return Ok(Out::new(message, table));
    }

    let mut message = format!("{period} [{}]", table.bitmask);
    for row in &table.rows {
        write!(
            message,
            "\n{}  {:>12} {}  {:<30}  {}  {}",
            row.date, row.amount, row.currency, row.category, row.recipient, row.booking_text
        )?;
    }
    Ok(Out::new(message, table))
}
