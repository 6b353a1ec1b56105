use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, bail};
use regex::Regex;
use tracing::{debug, info};

/// How a submitted job waits on earlier ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dependency {
    None,
    /// Hold until no other job with the same name is running.
    Singleton,
    /// Hold until every listed job has ended, whatever its exit state.
    AfterAny(Vec<String>),
}

impl Dependency {
    /// Explicit id list when every id is known, singleton otherwise.
    pub fn after_sweep(job_ids: &[String], expected: usize) -> Self {
        if job_ids.is_empty() || job_ids.len() < expected {
            Self::Singleton
        } else {
            Self::AfterAny(job_ids.to_vec())
        }
    }

    pub fn as_arg(&self) -> Option<String> {
        match self {
            Self::None => None,
            Self::Singleton => Some("--dependency=singleton".to_string()),
            Self::AfterAny(ids) => Some(format!("--dependency=afterany:{}", ids.join(":"))),
        }
    }
}

pub trait Scheduler {
    /// Submits `script` (relative to `work_dir`) and returns the scheduler job id if known.
    fn submit(
        &mut self,
        work_dir: &Path,
        script: &str,
        dependency: &Dependency,
    ) -> Result<Option<String>>;
}

/// Submits through the `sbatch` command line.
pub struct Sbatch {
    program: String,
    job_id: Regex,
}

impl Sbatch {
    pub fn new(program: impl Into<String>) -> Result<Self> {
        Ok(Self {
            program: program.into(),
            job_id: Regex::new(r"^\s*(\d+)").context("failed to compile sbatch job id regex")?,
        })
    }

    pub fn parse_job_id(&self, stdout: &str) -> Option<String> {
        self.job_id
            .captures(stdout)
            .and_then(|captures| captures.get(1))
            .map(|id| id.as_str().to_string())
    }
}

impl Scheduler for Sbatch {
    fn submit(
        &mut self,
        work_dir: &Path,
        script: &str,
        dependency: &Dependency,
    ) -> Result<Option<String>> {
        let mut command = Command::new(&self.program);
        command.current_dir(work_dir).arg("--parsable");
        if let Some(arg) = dependency.as_arg() {
            command.arg(arg);
        }
        command.arg(script);

        let output = command
            .output()
            .with_context(|| format!("failed to execute {} for {script}", self.program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "{} returned non-zero exit status for {script}: {}",
                self.program,
                stderr.trim()
            );
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let job_id = self.parse_job_id(&stdout);
        debug!(script = %script, job_id = ?job_id, "sbatch accepted job");
        Ok(job_id)
    }
}

/// Records what would be submitted without touching the cluster.
#[derive(Debug, Default)]
pub struct DryRun {
    pub submitted: Vec<(PathBuf, String, Dependency)>,
}

impl Scheduler for DryRun {
    fn submit(
        &mut self,
        work_dir: &Path,
        script: &str,
        dependency: &Dependency,
    ) -> Result<Option<String>> {
        info!(
            script = %script,
            dependency = %dependency.as_arg().unwrap_or_default(),
            "dry-run: skipping submission"
        );
        self.submitted
            .push((work_dir.to_path_buf(), script.to_string(), dependency.clone()));
        Ok(None)
    }
}
