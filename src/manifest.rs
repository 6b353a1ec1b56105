use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::error::AggregateError;
use crate::util::write_text;

pub const MANIFEST_FILE_NAME: &str = ".filenames";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub quast_dir: String,
    pub job_names: Vec<String>,
}

impl Manifest {
    pub fn path_in(work_dir: &Path) -> PathBuf {
        work_dir.join(MANIFEST_FILE_NAME)
    }

    pub fn render(&self) -> String {
        let mut out = String::with_capacity(64 + self.job_names.len() * 32);
        out.push_str(&self.quast_dir);
        out.push('\n');
        for name in &self.job_names {
            out.push_str(name);
            out.push('\n');
        }
        out
    }

    pub fn write(&self, work_dir: &Path) -> Result<PathBuf> {
        let path = Self::path_in(work_dir);
        write_text(&path, &self.render())?;
        Ok(path)
    }

    pub fn parse(raw: &str, path: &Path) -> Result<Self, AggregateError> {
        let mut lines = raw.lines();
        let quast_dir = lines
            .next()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .ok_or_else(|| AggregateError::ManifestEmpty {
                path: path.to_path_buf(),
            })?
            .to_string();

        let job_names = lines
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(ToOwned::to_owned)
            .collect();

        Ok(Self {
            quast_dir,
            job_names,
        })
    }

    pub fn read(work_dir: &Path) -> Result<Self, AggregateError> {
        let path = Self::path_in(work_dir);
        let raw = fs::read_to_string(&path).map_err(|source| AggregateError::ManifestRead {
            path: path.clone(),
            source,
        })?;
        Self::parse(&raw, &path)
    }

    /// Report directory resolved against the working directory.
    pub fn quast_dir_in(&self, work_dir: &Path) -> PathBuf {
        work_dir.join(&self.quast_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_writes_quast_dir_then_names_and_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = Manifest {
            quast_dir: "quast_results".to_string(),
            job_names: vec!["run_KM16".to_string(), "run_KM17".to_string()],
        };

        let path = manifest.write(dir.path()).unwrap();
        assert_eq!(path, dir.path().join(".filenames"));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "quast_results\nrun_KM16\nrun_KM17\n"
        );
        assert_eq!(Manifest::read(dir.path()).unwrap(), manifest);
    }

    #[test]
    fn manifest_parse_rejects_missing_report_directory() {
        let err = Manifest::parse("\n", Path::new(".filenames")).unwrap_err();
        assert!(matches!(err, AggregateError::ManifestEmpty { .. }));
    }

    #[test]
    fn manifest_read_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Manifest::read(dir.path()).unwrap_err();
        assert!(matches!(err, AggregateError::ManifestRead { .. }));
    }
}
