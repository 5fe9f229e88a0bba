//! Grid Engine client: `qsub` for submission, `qstat` for queue membership.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use super::{marker, BatchClient, BatchError, JobCommand, JobHandle, SubmitOptions};

/// Talks to Grid Engine through its command-line tools.
///
/// After [`BatchClient::write_marker`], every submitted job id is appended to
/// that marker so a later run can tell the sample is still in flight.
#[derive(Debug)]
pub struct GridEngineClient {
    qsub_program: String,
    qstat_program: String,
    active_marker: Option<PathBuf>,
}

impl GridEngineClient {
    pub fn new(qsub_program: impl Into<String>, qstat_program: impl Into<String>) -> Self {
        Self {
            qsub_program: qsub_program.into(),
            qstat_program: qstat_program.into(),
            active_marker: None,
        }
    }

    fn run(&self, program: &str, cmd: &mut Command) -> Result<String, BatchError> {
        let out: Output = cmd.output().map_err(|source| BatchError::Spawn {
            program: program.to_string(),
            source,
        })?;
        if !out.status.success() {
            return Err(BatchError::CommandFailed {
                program: program.to_string(),
                status: out.status.to_string(),
                stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&out.stdout).into_owned())
    }
}

impl BatchClient for GridEngineClient {
    fn submit(
        &mut self,
        options: &SubmitOptions,
        command: &JobCommand,
    ) -> Result<JobHandle, BatchError> {
        std::fs::create_dir_all(&options.log_dir).map_err(|source| BatchError::LogDir {
            path: options.log_dir.clone(),
            source,
        })?;

        let mut cmd = Command::new(&self.qsub_program);
        cmd.args(options.to_args())
            .arg(&command.script)
            .args(&command.args);
        let stdout = self.run(&self.qsub_program, &mut cmd)?;
        let handle = parse_qsub_output(&stdout)?;

        if let Some(path) = &self.active_marker {
            marker::append(path, &handle)?;
        }
        tracing::debug!(job = %handle, %command, "qsub accepted job");
        Ok(handle)
    }

    fn count_active(&mut self, marker_path: &Path) -> Result<usize, BatchError> {
        let recorded = marker::read(marker_path)?;
        if recorded.is_empty() {
            return Ok(0);
        }
        let stdout = self.run(&self.qstat_program, &mut Command::new(&self.qstat_program))?;
        let queued = parse_qstat_job_ids(&stdout);
        Ok(recorded
            .iter()
            .filter(|h| queued.contains(h.as_str()))
            .count())
    }

    fn write_marker(&mut self, marker_path: &Path, reset: bool) -> Result<(), BatchError> {
        marker::create(marker_path, reset)?;
        self.active_marker = Some(marker_path.to_path_buf());
        Ok(())
    }
}

/// Extract the job id from `qsub` output.
///
/// Accepts `Your job 123 ("name") has been submitted`, the array form
/// `Your job-array 123.1-4:1 ...` and `-terse` output (`123` or `123.1-4:1`).
pub fn parse_qsub_output(output: &str) -> Result<JobHandle, BatchError> {
    let unparsable = || BatchError::UnparsableOutput(output.trim().to_string());

    let token = {
        let mut words = output.split_whitespace();
        let mut found = None;
        while let Some(w) = words.next() {
            if w == "job" || w == "job-array" {
                found = words.next();
                break;
            }
        }
        match found {
            Some(t) => t,
            None => output.split_whitespace().next().ok_or_else(unparsable)?,
        }
    };

    let id = token.split('.').next().unwrap_or(token);
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(unparsable());
    }
    Ok(JobHandle::new(id))
}

/// Job ids listed by `qstat` (first column of every job row; headers are skipped).
pub fn parse_qstat_job_ids(output: &str) -> HashSet<String> {
    output
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .filter(|first| !first.is_empty() && first.bytes().all(|b| b.is_ascii_digit()))
        .map(str::to_string)
        .collect()
}
