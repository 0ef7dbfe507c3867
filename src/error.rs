use std::path::PathBuf;
use thiserror::Error;

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading the transaction CSV into a ledger.
///
/// Any malformed row fails the whole load; a partial ledger would silently
/// corrupt every aggregate computed from it.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no CSV file found at [{}]", path.display())]
    FileNotFound { path: PathBuf },

    #[error("failed to read [{}]: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV header: {reason}")]
    Header { reason: String },

    #[error("malformed CSV row at line {line}: {reason}")]
    Row { line: u64, reason: String },

    #[error("the CSV contains no transaction rows")]
    Empty,
}
