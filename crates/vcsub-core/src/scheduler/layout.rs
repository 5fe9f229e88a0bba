//! Where per-sample files live and where the stage scripts are found.

use std::path::{Path, PathBuf};

use crate::batch::{Dependency, ResourceOptions, SubmitOptions};
use crate::config::VcsubConfig;

const LOG_DIR: &str = "logs";
const MARKER_FILE: &str = "run_jid";
const RUN_INFO_FILE: &str = "run_info";

/// Paths and resource flags shared by every submission of a run.
///
/// Each sample gets a directory `<work_dir>/<sample_id>` holding its scheduler
/// logs, resume marker and run metadata.
#[derive(Debug, Clone)]
pub struct RunLayout {
    pub work_dir: PathBuf,
    pub job_home: PathBuf,
    pub resources: ResourceOptions,
}

impl RunLayout {
    pub fn new(work_dir: impl Into<PathBuf>, job_home: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            job_home: job_home.into(),
            resources: ResourceOptions::default(),
        }
    }

    /// Layout using the resource flags from `cfg`.
    pub fn from_config(cfg: &VcsubConfig, work_dir: &Path, job_home: &Path) -> Self {
        Self {
            work_dir: work_dir.to_path_buf(),
            job_home: job_home.to_path_buf(),
            resources: ResourceOptions {
                memory: cfg.memory.clone(),
                rerunnable: cfg.rerunnable,
                join_output: cfg.join_output,
                extra_args: cfg.extra_qsub_args.clone(),
            },
        }
    }

    pub fn sample_dir(&self, sample_id: &str) -> PathBuf {
        self.work_dir.join(sample_id)
    }

    pub fn log_dir(&self, sample_id: &str) -> PathBuf {
        self.sample_dir(sample_id).join(LOG_DIR)
    }

    pub fn marker_path(&self, sample_id: &str) -> PathBuf {
        self.sample_dir(sample_id).join(MARKER_FILE)
    }

    pub fn run_info_path(&self, sample_id: &str) -> PathBuf {
        self.sample_dir(sample_id).join(RUN_INFO_FILE)
    }

    pub fn script(&self, name: &str) -> PathBuf {
        self.job_home.join(name)
    }

    /// Submission options for one job of `sample_id`, held on `hold`.
    pub fn submit_options(&self, sample_id: &str, hold: Dependency) -> SubmitOptions {
        SubmitOptions::new(hold, &self.log_dir(sample_id), &self.resources)
    }
}
