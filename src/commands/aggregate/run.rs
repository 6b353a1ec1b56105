use std::path::Path;

use anyhow::Result;
use tracing::{info, warn};

use super::report::{read_report, report_path};
use super::table::{SUMMARY_FILE_NAME, SummaryMatrix};
use crate::cli::AggregateArgs;
use crate::error::AggregateError;
use crate::manifest::Manifest;
use crate::util::write_text;

pub fn run(args: AggregateArgs) -> Result<()> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.work_dir.join(SUMMARY_FILE_NAME));

    info!(work_dir = %args.work_dir.display(), "aggregating QUAST reports");
    let matrix = collect_reports(&args.work_dir, args.allow_missing)?;
    write_summary(&matrix, &output)?;

    info!(
        path = %output.display(),
        assemblies = matrix.job_count(),
        "wrote assembly summary"
    );
    Ok(())
}

/// Loads every report named by the manifest, in manifest order.
///
/// A missing report aborts unless `allow_missing`, in which case its column is filled
/// with placeholders.
pub fn collect_reports(work_dir: &Path, allow_missing: bool) -> Result<SummaryMatrix> {
    let manifest = Manifest::read(work_dir)?;
    let quast_dir = manifest.quast_dir_in(work_dir);

    let mut matrix = SummaryMatrix::default();
    for job in &manifest.job_names {
        let path = report_path(&quast_dir, job);
        match read_report(&path)? {
            Some(values) => matrix.push(job, values),
            None if allow_missing => {
                warn!(job = %job, path = %path.display(), "report missing, using placeholders");
                matrix.push_missing(job);
            }
            None => {
                return Err(AggregateError::ReportMissing {
                    job: job.clone(),
                    path,
                }
                .into());
            }
        }
    }

    Ok(matrix)
}

/// Renders fully in memory first so a failure never leaves a partial summary.
pub fn write_summary(matrix: &SummaryMatrix, output: &Path) -> Result<()> {
    let rendered = matrix.render();
    write_text(output, &rendered)
}
