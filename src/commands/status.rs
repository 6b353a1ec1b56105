use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::StatusArgs;
use crate::commands::aggregate::{SUMMARY_FILE_NAME, report_path};
use crate::manifest::Manifest;
use crate::model::{RUN_RECORD_FILE_NAME, SweepRunRecord};

#[derive(Debug)]
pub struct JobStatus {
    pub name: String,
    pub scheduler_job_id: Option<String>,
    pub submission_error: Option<String>,
    pub report_present: bool,
}

#[derive(Debug)]
pub struct SweepStatus {
    pub record: Option<SweepRunRecord>,
    pub jobs: Vec<JobStatus>,
    pub summary_present: bool,
}

impl SweepStatus {
    pub fn reports_present(&self) -> usize {
        self.jobs.iter().filter(|job| job.report_present).count()
    }
}

pub fn run(args: StatusArgs) -> Result<()> {
    info!(work_dir = %args.work_dir.display(), "status requested");
    let status = collect_status(&args.work_dir)?;

    if let Some(record) = &status.record {
        info!(
            generated_at = %record.generated_at,
            config = %record.config_path,
            dry_run = record.dry_run,
            jobs = record.jobs.len(),
            aggregation_job_id = %record.aggregation.scheduler_job_id.as_deref().unwrap_or("-"),
            failed_submissions = record.failed_submissions().len(),
            "loaded run record"
        );
    }

    for job in &status.jobs {
        info!(
            job = %job.name,
            job_id = %job.scheduler_job_id.as_deref().unwrap_or("-"),
            submission_error = %job.submission_error.as_deref().unwrap_or(""),
            report_present = job.report_present,
            "job status"
        );
    }

    info!(
        reports_present = status.reports_present(),
        reports_expected = status.jobs.len(),
        summary_present = status.summary_present,
        "sweep status"
    );

    Ok(())
}

/// Joins the manifest, the run record (if any) and the reports on disk.
pub fn collect_status(work_dir: &Path) -> Result<SweepStatus> {
    let record_path = work_dir.join(RUN_RECORD_FILE_NAME);
    let record = if record_path.exists() {
        let raw = fs::read(&record_path)
            .with_context(|| format!("failed to read {}", record_path.display()))?;
        let record: SweepRunRecord = serde_json::from_slice(&raw)
            .with_context(|| format!("failed to parse {}", record_path.display()))?;
        Some(record)
    } else {
        warn!(path = %record_path.display(), "run record missing");
        None
    };

    let manifest = Manifest::read(work_dir)?;
    let quast_dir = manifest.quast_dir_in(work_dir);

    let jobs = manifest
        .job_names
        .iter()
        .map(|name| {
            let job = record
                .as_ref()
                .and_then(|record| record.jobs.iter().find(|job| &job.name == name));
            JobStatus {
                name: name.clone(),
                scheduler_job_id: job.and_then(|job| job.scheduler_job_id.clone()),
                submission_error: job.and_then(|job| job.submission_error.clone()),
                report_present: report_path(&quast_dir, name).is_file(),
            }
        })
        .collect();

    Ok(SweepStatus {
        record,
        jobs,
        summary_present: work_dir.join(SUMMARY_FILE_NAME).is_file(),
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::error::AggregateError;
    use crate::model::JobRecord;
    use crate::util::{ensure_directory, write_json_pretty, write_text};

    fn job(name: &str, job_id: Option<&str>, error: Option<&str>) -> JobRecord {
        JobRecord {
            name: name.to_string(),
            script: format!("{name}.slurm"),
            script_sha256: String::new(),
            scheduler_job_id: job_id.map(str::to_string),
            submission_error: error.map(str::to_string),
        }
    }

    fn seed_manifest(work_dir: &Path, jobs: &[&str]) {
        Manifest {
            quast_dir: "quast_results".to_string(),
            job_names: jobs.iter().map(|name| name.to_string()).collect(),
        }
        .write(work_dir)
        .unwrap();
    }

    fn seed_report(work_dir: &Path, job: &str) -> PathBuf {
        let path = report_path(&work_dir.join("quast_results"), job);
        ensure_directory(path.parent().unwrap()).unwrap();
        write_text(&path, "Assembly\tx\n").unwrap();
        path
    }

    #[test]
    fn status_joins_record_manifest_and_reports() {
        let dir = tempfile::tempdir().unwrap();
        seed_manifest(dir.path(), &["run_KM9", "run_KM10"]);
        seed_report(dir.path(), "run_KM10");
        let record = SweepRunRecord {
            manifest_version: 1,
            generated_at: "2026-01-01T00:00:00Z".to_string(),
            config_path: "sweep.conf".to_string(),
            work_dir: dir.path().display().to_string(),
            quast_dir: "quast_results".to_string(),
            dry_run: false,
            jobs: vec![
                job("run_KM9", Some("7"), None),
                job("run_KM10", None, Some("sbatch: error")),
            ],
            aggregation: job("run", Some("9"), None),
        };
        write_json_pretty(&dir.path().join(RUN_RECORD_FILE_NAME), &record).unwrap();

        let status = collect_status(dir.path()).unwrap();
        assert!(status.record.is_some());
        assert!(!status.summary_present);
        assert_eq!(status.reports_present(), 1);

        let names: Vec<&str> = status.jobs.iter().map(|job| job.name.as_str()).collect();
        assert_eq!(names, ["run_KM9", "run_KM10"]);
        assert_eq!(status.jobs[0].scheduler_job_id.as_deref(), Some("7"));
        assert!(!status.jobs[0].report_present);
        assert_eq!(status.jobs[1].submission_error.as_deref(), Some("sbatch: error"));
        assert!(status.jobs[1].report_present);

        run(StatusArgs {
            work_dir: dir.path().to_path_buf(),
        })
        .unwrap();
    }

    #[test]
    fn status_without_run_record_uses_manifest_only() {
        let dir = tempfile::tempdir().unwrap();
        seed_manifest(dir.path(), &["run_KM16"]);
        write_text(&dir.path().join(SUMMARY_FILE_NAME), "\n").unwrap();

        let status = collect_status(dir.path()).unwrap();
        assert!(status.record.is_none());
        assert!(status.summary_present);
        assert_eq!(status.jobs.len(), 1);
        assert!(status.jobs[0].scheduler_job_id.is_none());
        assert_eq!(status.reports_present(), 0);
    }

    #[test]
    fn status_requires_a_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(StatusArgs {
            work_dir: dir.path().to_path_buf(),
        })
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AggregateError>(),
            Some(AggregateError::ManifestRead { .. })
        ));
    }

    #[test]
    fn unreadable_run_record_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        seed_manifest(dir.path(), &["run_KM16"]);
        write_text(&dir.path().join(RUN_RECORD_FILE_NAME), "{not json").unwrap();

        let err = collect_status(dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse"));
    }
}
