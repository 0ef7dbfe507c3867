use crate::commands::Out;
use crate::coordinator::DataService;
use crate::model::transaction::DATE_FORMAT;
use crate::Result;
use serde::Serialize;
use std::path::Path;

/// Structured output of the `info` command.
#[derive(Debug, Clone, Serialize)]
pub struct Info {
    csv: String,
    first_date: String,
    last_date: String,
    transactions: usize,
    partitions: usize,
}

/// Describes the loaded ledger: where it came from, the date span it covers,
/// and how it was partitioned.
pub async fn info(service: &DataService, path: &Path) -> Result<Out<Info>> {
    let info = Info {
        csv: path.display().to_string(),
        first_date: service.first_date().format(DATE_FORMAT).to_string(),
        last_date: service.last_date().format(DATE_FORMAT).to_string(),
        transactions: service.transaction_count(),
        partitions: service.partition_count(),
    };
    let message = format!(
        "{}: {} transactions from {} to {}, {} period partitions",
        info.csv, info.transactions, info.first_date, info.last_date, info.partitions
    );
    Ok(Out::new(message, info))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::sample_service;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_info_reports_span_and_counts() {
        let service = sample_service();
        let out = info(&service, &PathBuf::from("transactions.csv"))
            .await
            .unwrap();
        let structure = out.structure().unwrap();
        assert_eq!(structure.first_date, "01.01.2016");
        assert_eq!(structure.last_date, "01.02.2016");
        assert_eq!(structure.transactions, 3);
        // January 2016, February 2016, and the 2016 year partition.
        assert_eq!(structure.partitions, 3);
        assert!(out.message().contains("3 transactions"));
    }
}
