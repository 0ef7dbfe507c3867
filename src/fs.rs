use crate::Result;
use anyhow::{bail, Context};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Finds the transaction CSV in `dir` when no explicit path was given.
///
/// Exactly one `*.csv` file is expected; with more than one, a warning is
/// logged and the first (in name order) is used. No file at all is fatal,
/// there is nothing to display without a ledger.
pub async fn discover_csv(dir: impl AsRef<Path>) -> Result<PathBuf> {
    let dir = dir.as_ref();
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .with_context(|| format!("Unable to read directory {}", dir.display()))?;

    let mut found = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_csv = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if is_csv && entry.file_type().await?.is_file() {
            found.push(path);
        }
    }
    found.sort();

    if found.is_empty() {
        bail!(
            "no CSV file found under [{}], provide one with --csv",
            dir.display()
        );
    }
    if found.len() > 1 {
        warn!(
            "{} CSV files found under [{}], using the first one",
            found.len(),
            dir.display()
        );
    }
    let path = found.remove(0);
    info!("using CSV file [{}]", path.display());
    Ok(path)
}
