use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::RunError;

/// Creates `<root>/<prefix><N>` for the smallest free N below `max_attempts`.
///
/// Uses `create_dir` so that a name taken between attempts is skipped rather than reused.
pub fn create_work_dir(root: &Path, prefix: &str, max_attempts: u32) -> Result<PathBuf, RunError> {
    for attempt in 0..max_attempts {
        let path = root.join(format!("{prefix}{attempt}"));
        match fs::create_dir(&path) {
            Ok(()) => return Ok(path),
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                debug!(path = %path.display(), "working directory taken, probing next");
            }
            Err(source) => return Err(RunError::DirectoryCreation { path, source }),
        }
    }

    Err(RunError::WorkDirExhausted {
        root: root.to_path_buf(),
        prefix: prefix.to_string(),
        attempts: max_attempts,
    })
}
