use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file: {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("line {line_no}: missing '=' separator in {line:?}")]
    MalformedLine { line_no: usize, line: String },

    #[error("line {line_no}: reversed range {token:?} (start is greater than end)")]
    ReversedRange { line_no: usize, token: String },

    #[error("line {line_no}: range {token:?} expands to more than {limit} values")]
    RangeTooLarge {
        line_no: usize,
        token: String,
        limit: u64,
    },

    #[error("line {line_no}: range bound out of bounds in {token:?}")]
    InvalidRangeBound { line_no: usize, token: String },

    #[error("missing required key `{0}`")]
    MissingKey(&'static str),

    #[error("invalid value {value:?} for `{key}`: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: &'static str,
    },

    #[error("`{key}` lists an empty value")]
    EmptyAxisValue { key: &'static str },

    #[error("sweep expands to more than {limit} jobs")]
    SweepTooLarge { limit: usize },

    #[error("job name `{name}` is generated by more than one combination")]
    DuplicateJobName { name: String },
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to create working directory: {}", .path.display())]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(
        "no free working directory name for prefix `{prefix}` in {} after {attempts} attempts",
        .root.display()
    )]
    WorkDirExhausted {
        root: PathBuf,
        prefix: String,
        attempts: u32,
    },

    #[error("{} job submission(s) failed: {}", .failed.len(), .failed.join(", "))]
    JobSubmission { failed: Vec<String> },
}

#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("failed to read manifest: {}", .path.display())]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("manifest has no report directory line: {}", .path.display())]
    ManifestEmpty { path: PathBuf },

    #[error("report for job `{job}` is missing: {}", .path.display())]
    ReportMissing { job: String, path: PathBuf },

    #[error("failed to read report: {}", .path.display())]
    ReportRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("report {} has {found} metric lines, expected {expected}", .path.display())]
    ReportMalformed {
        path: PathBuf,
        found: usize,
        expected: usize,
    },
}
