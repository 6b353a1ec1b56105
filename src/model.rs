use serde::{Deserialize, Serialize};

pub const RUN_RECORD_FILE_NAME: &str = "sweep_run.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepRunRecord {
    pub manifest_version: u32,
    pub generated_at: String,
    pub config_path: String,
    pub work_dir: String,
    pub quast_dir: String,
    pub dry_run: bool,
    pub jobs: Vec<JobRecord>,
    pub aggregation: JobRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub name: String,
    pub script: String,
    pub script_sha256: String,
    pub scheduler_job_id: Option<String>,
    pub submission_error: Option<String>,
}

impl SweepRunRecord {
    pub fn failed_submissions(&self) -> Vec<String> {
        self.jobs
            .iter()
            .chain(std::iter::once(&self.aggregation))
            .filter(|job| job.submission_error.is_some())
            .map(|job| job.script.clone())
            .collect()
    }
}
