use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use super::config_parse::ConfigParser;
use super::job_script::{AGGREGATION_SCRIPT_NAME, build_aggregation_script, build_plan};
use super::scheduler::{Dependency, DryRun, Sbatch, Scheduler};
use super::sweep_config::SweepConfig;
use super::workdir::create_work_dir;
use crate::cli::SweepArgs;
use crate::error::RunError;
use crate::manifest::Manifest;
use crate::model::{JobRecord, RUN_RECORD_FILE_NAME, SweepRunRecord};
use crate::util::{ensure_directory, now_utc_string, sha256_hex, write_json_pretty, write_text};

const RUN_RECORD_VERSION: u32 = 1;

#[derive(Debug, Clone)]
pub struct SweepOptions {
    pub root: PathBuf,
    pub config_path: PathBuf,
    /// Program the aggregation job invokes as `<program> aggregate`.
    pub aggregator_program: String,
    pub max_workdir_attempts: u32,
    pub dry_run: bool,
}

#[derive(Debug)]
pub struct SweepOutcome {
    pub work_dir: PathBuf,
    pub record: SweepRunRecord,
}

pub fn run(args: SweepArgs) -> Result<()> {
    let parser = ConfigParser::new()?;
    let params = parser.parse_file(&args.config)?;
    debug!(keys = params.len(), path = %args.config.display(), "parsed configuration");
    let config = SweepConfig::from_params(&params)?;

    let aggregator_program = std::env::current_exe()
        .context("failed to resolve the smartassess executable path")?
        .display()
        .to_string();

    let options = SweepOptions {
        root: args.root.clone(),
        config_path: args.config.clone(),
        aggregator_program,
        max_workdir_attempts: args.max_workdir_attempts,
        dry_run: args.dry_run,
    };

    let outcome = if args.dry_run {
        execute_sweep(&config, &options, &mut DryRun::default())?
    } else {
        execute_sweep(&config, &options, &mut Sbatch::new(args.sbatch.clone())?)?
    };

    let failed = outcome.record.failed_submissions();
    if !failed.is_empty() {
        return Err(RunError::JobSubmission { failed }.into());
    }

    info!(
        work_dir = %outcome.work_dir.display(),
        jobs = outcome.record.jobs.len(),
        "sweep completed"
    );
    Ok(())
}

/// Writes and submits every job of the sweep plus the dependent aggregation job.
///
/// Configuration and directory errors abort before anything is submitted; submission
/// failures are recorded per job and left for the caller to report.
pub fn execute_sweep(
    config: &SweepConfig,
    options: &SweepOptions,
    scheduler: &mut dyn Scheduler,
) -> Result<SweepOutcome> {
    let jobs = build_plan(config)?;
    info!(
        prefix = %config.prefix,
        combinations = jobs.len(),
        kmer = config.kmer.is_declared(),
        overlapper = config.overlapper.is_declared(),
        min_read_length = config.min_read_length.is_declared(),
        "expanded parameter sweep"
    );

    let work_dir = create_work_dir(&options.root, &config.prefix, options.max_workdir_attempts)?;
    info!(work_dir = %work_dir.display(), "created working directory");
    ensure_directory(&work_dir.join(&config.quast_dir))?;

    let mut records = Vec::with_capacity(jobs.len());
    for job in &jobs {
        write_text(&work_dir.join(&job.script_file), &job.body)?;
        debug!(job = %job.name, report_dir = %job.report_dir, "wrote job script");
        records.push(JobRecord {
            name: job.name.clone(),
            script: job.script_file.clone(),
            script_sha256: sha256_hex(job.body.as_bytes()),
            scheduler_job_id: None,
            submission_error: None,
        });
    }

    let manifest = Manifest {
        quast_dir: config.quast_dir.clone(),
        job_names: jobs.iter().map(|job| job.name.clone()).collect(),
    };
    let manifest_path = manifest.write(&work_dir)?;
    debug!(path = %manifest_path.display(), "wrote manifest");

    let mut job_ids = Vec::with_capacity(records.len());
    for record in &mut records {
        submit_recorded(scheduler, &work_dir, record, &Dependency::None);
        if let Some(id) = &record.scheduler_job_id {
            job_ids.push(id.clone());
        }
    }

    let mut aggregation = JobRecord {
        name: config.prefix.clone(),
        script: AGGREGATION_SCRIPT_NAME.to_string(),
        script_sha256: String::new(),
        scheduler_job_id: None,
        submission_error: None,
    };
    match stage_aggregation(config, options, &work_dir) {
        Ok(body) => {
            aggregation.script_sha256 = sha256_hex(body.as_bytes());
            let dependency = Dependency::after_sweep(&job_ids, records.len());
            if dependency == Dependency::Singleton && !options.dry_run {
                warn!("sweep job ids unknown, aggregation falls back to singleton dependency");
            }
            submit_recorded(scheduler, &work_dir, &mut aggregation, &dependency);
        }
        // Sweep jobs are already queued, so the run record is still written.
        Err(err) => {
            warn!(error = %err, "failed to stage aggregation job");
            aggregation.submission_error = Some(format!("{err:#}"));
        }
    }

    let record = SweepRunRecord {
        manifest_version: RUN_RECORD_VERSION,
        generated_at: now_utc_string(),
        config_path: options.config_path.display().to_string(),
        work_dir: work_dir.display().to_string(),
        quast_dir: config.quast_dir.clone(),
        dry_run: options.dry_run,
        jobs: records,
        aggregation,
    };
    let record_path = work_dir.join(RUN_RECORD_FILE_NAME);
    write_json_pretty(&record_path, &record)?;
    info!(path = %record_path.display(), "wrote run record");

    Ok(SweepOutcome { work_dir, record })
}

/// Writes the aggregation script and returns its body.
fn stage_aggregation(
    config: &SweepConfig,
    options: &SweepOptions,
    work_dir: &Path,
) -> Result<String> {
    // Absolute so `--work-dir` does not depend on the aggregation job's cwd.
    let absolute_work_dir = std::path::absolute(work_dir)
        .with_context(|| format!("failed to resolve {}", work_dir.display()))?;
    let body = build_aggregation_script(config, &options.aggregator_program, &absolute_work_dir);
    write_text(&work_dir.join(AGGREGATION_SCRIPT_NAME), &body)?;
    Ok(body)
}

fn submit_recorded(
    scheduler: &mut dyn Scheduler,
    work_dir: &Path,
    record: &mut JobRecord,
    dependency: &Dependency,
) {
    match scheduler.submit(work_dir, &record.script, dependency) {
        Ok(job_id) => {
            info!(
                job = %record.name,
                script = %record.script,
                job_id = %job_id.as_deref().unwrap_or("-"),
                "submitted job"
            );
            record.scheduler_job_id = job_id;
        }
        Err(err) => {
            warn!(script = %record.script, error = %err, "job submission failed");
            record.submission_error = Some(format!("{err:#}"));
        }
    }
}
