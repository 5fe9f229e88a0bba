//! Job handles, dependency sets and submission options.

use std::fmt;
use std::path::{Path, PathBuf};

/// Scheduler-assigned job identifier. Only ever used as a dependency token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobHandle(String);

impl JobHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Set of predecessor jobs a submission must wait for. Empty means "start immediately".
///
/// Insertion order is kept so the wire form is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dependency(Vec<JobHandle>);

impl Dependency {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn on(handle: JobHandle) -> Self {
        Self(vec![handle])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn handles(&self) -> &[JobHandle] {
        &self.0
    }

    /// Scheduler wire form: comma-joined ids, or None when there is nothing to hold on.
    pub fn to_hold_list(&self) -> Option<String> {
        if self.0.is_empty() {
            return None;
        }
        let ids: Vec<&str> = self.0.iter().map(JobHandle::as_str).collect();
        Some(ids.join(","))
    }
}

impl From<Option<JobHandle>> for Dependency {
    fn from(handle: Option<JobHandle>) -> Self {
        Self(handle.into_iter().collect())
    }
}

impl FromIterator<JobHandle> for Dependency {
    fn from_iter<I: IntoIterator<Item = JobHandle>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A stage script and its arguments. Passed to the scheduler as argv, never through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobCommand {
    pub script: PathBuf,
    pub args: Vec<String>,
}

impl JobCommand {
    pub fn new(script: impl Into<PathBuf>) -> Self {
        Self {
            script: script.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Script file name without directory, e.g. `pre_1.download.sh`.
    pub fn script_name(&self) -> &str {
        self.script
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }
}

impl fmt::Display for JobCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.script.display())?;
        for a in &self.args {
            write!(f, " {}", a)?;
        }
        Ok(())
    }
}

/// Resource and runtime flags shared by every job of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceOptions {
    pub memory: String,
    pub rerunnable: bool,
    pub join_output: bool,
    pub extra_args: Vec<String>,
}

impl Default for ResourceOptions {
    fn default() -> Self {
        Self {
            memory: "4G".to_string(),
            rerunnable: true,
            join_output: true,
            extra_args: Vec::new(),
        }
    }
}

/// Everything `qsub` needs besides the command itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOptions {
    pub hold: Dependency,
    pub log_dir: PathBuf,
    pub resources: ResourceOptions,
}

impl SubmitOptions {
    pub fn new(hold: Dependency, log_dir: &Path, resources: &ResourceOptions) -> Self {
        Self {
            hold,
            log_dir: log_dir.to_path_buf(),
            resources: resources.clone(),
        }
    }

    /// Render as `qsub` arguments: `[-hold_jid a,b] [-r y] [-j y] -o <dir> -l h_vmem=<mem> [extra]`.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(list) = self.hold.to_hold_list() {
            args.push("-hold_jid".to_string());
            args.push(list);
        }
        if self.resources.rerunnable {
            args.extend(["-r".to_string(), "y".to_string()]);
        }
        if self.resources.join_output {
            args.extend(["-j".to_string(), "y".to_string()]);
        }
        args.push("-o".to_string());
        args.push(self.log_dir.to_string_lossy().into_owned());
        args.push("-l".to_string());
        args.push(format!("h_vmem={}", self.resources.memory));
        args.extend(self.resources.extra_args.iter().cloned());
        args
    }
}
