use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::AggregateError;

pub const REPORT_FILE_NAME: &str = "report.txt";
pub const REPORT_HEADER_LINES: usize = 3;

/// QUAST `report.txt` metrics, in file order.
pub const METRIC_LABELS: [&str; 21] = [
    "# CONTIGS(>=0bp)",
    "# CONTIGS(>=1000bp)",
    "# CONTIGS(>=5000bp)",
    "# CONTIGS(>=10000bp)",
    "# CONTIGS(>=25000bp)",
    "# CONTIGS(>=50000bp)",
    "TOTAL LEN(>=0bp)",
    "TOTAL LEN(>=1000bp)",
    "TOTAL LEN(>=5000bp)",
    "TOTAL LEN(>=10000bp)",
    "TOTAL LEN(>=25000bp)",
    "TOTAL LEN(>=50000bp)",
    "# CONTIGS",
    "LARGEST CONTIG",
    "TOTAL LENGTH",
    "GC %",
    "N50",
    "N75",
    "L50",
    "L75",
    "# N's per 100 kbp",
];

pub fn report_path(quast_dir: &Path, job: &str) -> PathBuf {
    quast_dir.join(format!("result_{job}")).join(REPORT_FILE_NAME)
}

/// Reads one job's report; `Ok(None)` when the file does not exist.
pub fn read_report(path: &Path) -> Result<Option<Vec<String>>, AggregateError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(AggregateError::ReportRead {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    parse_report(&raw, path).map(Some)
}

/// Last whitespace token of every line after the header, first `METRIC_LABELS.len()` kept.
pub fn parse_report(raw: &str, path: &Path) -> Result<Vec<String>, AggregateError> {
    let mut values: Vec<String> = raw
        .lines()
        .skip(REPORT_HEADER_LINES)
        .filter_map(|line| line.split_whitespace().last())
        .map(ToOwned::to_owned)
        .collect();

    let expected = METRIC_LABELS.len();
    if values.len() < expected {
        return Err(AggregateError::ReportMalformed {
            path: path.to_path_buf(),
            found: values.len(),
            expected,
        });
    }
    if values.len() > expected {
        debug!(
            path = %path.display(),
            extra = values.len() - expected,
            "ignoring trailing report lines"
        );
        values.truncate(expected);
    }

    Ok(values)
}
