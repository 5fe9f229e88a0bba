//! In-memory batch client used for `--dry-run` and for asserting dependency graphs.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use super::{BatchClient, BatchError, JobCommand, JobHandle, SubmitOptions};

/// One recorded submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub handle: JobHandle,
    pub options: SubmitOptions,
    pub command: JobCommand,
}

/// Assigns sequential job ids (starting at `first_id`) and remembers every
/// submission. Markers live in memory; a submitted job stays queued until
/// [`RecordingClient::drain_queue`].
#[derive(Debug)]
pub struct RecordingClient {
    next_id: u64,
    submissions: Vec<Submission>,
    markers: HashMap<PathBuf, Vec<JobHandle>>,
    queued: HashSet<JobHandle>,
    active_marker: Option<PathBuf>,
    echo: bool,
}

impl Default for RecordingClient {
    fn default() -> Self {
        Self::new(1)
    }
}

impl RecordingClient {
    pub fn new(first_id: u64) -> Self {
        Self {
            next_id: first_id,
            submissions: Vec::new(),
            markers: HashMap::new(),
            queued: HashSet::new(),
            active_marker: None,
            echo: false,
        }
    }

    /// Print every submission as the `qsub` line it stands for.
    pub fn echoing(mut self) -> Self {
        self.echo = true;
        self
    }

    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    /// Pretend every submitted job has finished.
    pub fn drain_queue(&mut self) {
        self.queued.clear();
    }

    /// Borrow this client so that only the next `successful` submissions are accepted.
    pub fn fail_after(&mut self, successful: usize) -> FailingClient<'_> {
        FailingClient {
            inner: self,
            remaining: successful,
        }
    }
}

impl BatchClient for RecordingClient {
    fn submit(
        &mut self,
        options: &SubmitOptions,
        command: &JobCommand,
    ) -> Result<JobHandle, BatchError> {
        let handle = JobHandle::new(self.next_id.to_string());
        self.next_id += 1;
        self.queued.insert(handle.clone());

        if self.echo {
            println!("qsub {} {}", options.to_args().join(" "), command);
        }
        if let Some(path) = &self.active_marker {
            self.markers
                .entry(path.clone())
                .or_default()
                .push(handle.clone());
        }
        self.submissions.push(Submission {
            handle: handle.clone(),
            options: options.clone(),
            command: command.clone(),
        });
        Ok(handle)
    }

    fn count_active(&mut self, marker: &Path) -> Result<usize, BatchError> {
        Ok(self.markers.get(marker).map_or(0, |handles| {
            handles.iter().filter(|h| self.queued.contains(*h)).count()
        }))
    }

    fn write_marker(&mut self, marker: &Path, reset: bool) -> Result<(), BatchError> {
        let entry = self.markers.entry(marker.to_path_buf()).or_default();
        if reset {
            entry.clear();
        }
        self.active_marker = Some(marker.to_path_buf());
        Ok(())
    }
}

/// Wraps a [`RecordingClient`] and rejects submissions once `remaining` hits zero.
pub struct FailingClient<'a> {
    inner: &'a mut RecordingClient,
    remaining: usize,
}

impl BatchClient for FailingClient<'_> {
    fn submit(
        &mut self,
        options: &SubmitOptions,
        command: &JobCommand,
    ) -> Result<JobHandle, BatchError> {
        if self.remaining == 0 {
            return Err(BatchError::CommandFailed {
                program: "qsub".to_string(),
                status: "exit status: 1".to_string(),
                stderr: "Unable to run job: denied".to_string(),
            });
        }
        self.remaining -= 1;
        self.inner.submit(options, command)
    }

    fn count_active(&mut self, marker: &Path) -> Result<usize, BatchError> {
        self.inner.count_active(marker)
    }

    fn write_marker(&mut self, marker: &Path, reset: bool) -> Result<(), BatchError> {
        self.inner.write_marker(marker, reset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::{Dependency, ResourceOptions};

    fn opts() -> SubmitOptions {
        SubmitOptions::new(Dependency::none(), Path::new("S1/logs"), &ResourceOptions::default())
    }

    #[test]
    fn sequential_ids_and_marker_tracking() {
        let mut client = RecordingClient::new(100);
        let marker = Path::new("S1/run_jid");
        assert_eq!(client.count_active(marker).unwrap(), 0);

        client.write_marker(marker, true).unwrap();
        let a = client.submit(&opts(), &JobCommand::new("a.sh")).unwrap();
        let b = client.submit(&opts(), &JobCommand::new("b.sh")).unwrap();
        assert_eq!(a.as_str(), "100");
        assert_eq!(b.as_str(), "101");
        assert_eq!(client.count_active(marker).unwrap(), 2);

        client.drain_queue();
        assert_eq!(client.count_active(marker).unwrap(), 0);

        client.submit(&opts(), &JobCommand::new("c.sh")).unwrap();
        assert_eq!(client.count_active(marker).unwrap(), 1);

        client.write_marker(marker, true).unwrap();
        assert_eq!(client.count_active(marker).unwrap(), 0);
    }

    #[test]
    fn failing_client_rejects_after_budget() {
        let mut client = RecordingClient::default();
        let mut failing = client.fail_after(1);
        assert!(failing.submit(&opts(), &JobCommand::new("a.sh")).is_ok());
        assert!(failing.submit(&opts(), &JobCommand::new("b.sh")).is_err());
        assert_eq!(client.submissions().len(), 1);
    }
}
