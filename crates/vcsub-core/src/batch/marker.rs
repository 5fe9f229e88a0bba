//! Resume marker file: one job id per line, written as jobs are submitted.

use std::fs;
use std::io::Write;
use std::path::Path;

use super::{BatchError, JobHandle};

/// Create the marker (truncating when `reset`), creating parent dirs if needed.
pub fn create(path: &Path, reset: bool) -> Result<(), BatchError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| BatchError::marker(path, e))?;
    }
    fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(reset)
        .open(path)
        .map_err(|e| BatchError::marker(path, e))?;
    Ok(())
}

/// Append one job id to the marker.
pub fn append(path: &Path, handle: &JobHandle) -> Result<(), BatchError> {
    let mut f = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| BatchError::marker(path, e))?;
    writeln!(f, "{}", handle).map_err(|e| BatchError::marker(path, e))?;
    Ok(())
}

/// Read job ids from the marker. A missing marker yields an empty list.
pub fn read(path: &Path) -> Result<Vec<JobHandle>, BatchError> {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(BatchError::marker(path, e)),
    };
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(JobHandle::new)
        .collect())
}
