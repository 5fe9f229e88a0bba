//! The seam to the remote batch scheduler.
//!
//! The engine only ever submits commands with a hold list, asks how many
//! jobs a resume marker still has in the queue, and (re)creates markers.
//! [`GridEngineClient`] does this with `qsub`/`qstat`; [`RecordingClient`]
//! keeps everything in memory for dry runs and tests.

mod grid_engine;
pub mod marker;
mod recording;
mod types;

pub use grid_engine::{parse_qstat_job_ids, parse_qsub_output, GridEngineClient};
pub use recording::{FailingClient, RecordingClient, Submission};
pub use types::{Dependency, JobCommand, JobHandle, ResourceOptions, SubmitOptions};

use std::path::{Path, PathBuf};

/// Failure talking to the scheduler or maintaining a resume marker.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("could not run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: String,
        stderr: String,
    },
    #[error("create log directory {path}: {source}")]
    LogDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not find a job id in qsub output: {0:?}")]
    UnparsableOutput(String),
    #[error("resume marker {path}: {source}")]
    Marker {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BatchError {
    pub(crate) fn marker(path: &Path, source: std::io::Error) -> Self {
        BatchError::Marker {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Operations the orchestration engine needs from a batch scheduler.
pub trait BatchClient {
    /// Submit `command`; each call yields a fresh job.
    fn submit(&mut self, options: &SubmitOptions, command: &JobCommand)
        -> Result<JobHandle, BatchError>;

    /// Number of queued or running jobs referenced by the marker at `marker`.
    fn count_active(&mut self, marker: &Path) -> Result<usize, BatchError>;

    /// (Re)create the marker at `marker` and record later submissions in it.
    fn write_marker(&mut self, marker: &Path, reset: bool) -> Result<(), BatchError>;
}

impl<C: BatchClient + ?Sized> BatchClient for &mut C {
    fn submit(
        &mut self,
        options: &SubmitOptions,
        command: &JobCommand,
    ) -> Result<JobHandle, BatchError> {
        (**self).submit(options, command)
    }

    fn count_active(&mut self, marker: &Path) -> Result<usize, BatchError> {
        (**self).count_active(marker)
    }

    fn write_marker(&mut self, marker: &Path, reset: bool) -> Result<(), BatchError> {
        (**self).write_marker(marker, reset)
    }
}
