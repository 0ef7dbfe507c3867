//! Command handlers for the ledgerlens CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod categories;
mod chart;
mod info;
mod table;

use crate::coordinator::{DataService, Outcome, Request};
use crate::Result;
use anyhow::bail;
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

pub use categories::categories;
pub use chart::chart;
pub use info::info;
pub use table::table;

/// The output type for a command. This allows the command to return a
/// consistent message and, optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the
    /// command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as
    /// JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

/// Activates the requested categories through the coordinator, one accepted
/// request per toggle. The CLI is strict about unknown names where the
/// library would log and move on.
pub(crate) async fn activate(
    service: &DataService,
    categories: &[String],
    all: bool,
) -> Result<()> {
    if all {
        service.apply(Request::ShowAll).await?;
        return Ok(());
    }
    for name in categories {
        match service.apply(Request::ToggleName(name.clone())).await? {
            Outcome::Updated => {}
            Outcome::Ignored => bail!("'{name}' is not a known category, see 'categories'"),
            Outcome::Dropped => bail!("the filter update for '{name}' was dropped"),
        }
    }
    Ok(())
}
