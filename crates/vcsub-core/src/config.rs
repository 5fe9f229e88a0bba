use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Directory name (next to the executable) searched for stage scripts when
/// `job_home` is not configured.
pub const DEFAULT_JOB_HOME_DIR: &str = "variant_calling";

/// Global configuration loaded from `~/.config/vcsub/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VcsubConfig {
    /// Directory holding the `pre_*.sh` stage scripts. None = `<exe dir>/variant_calling`.
    #[serde(default)]
    pub job_home: Option<PathBuf>,
    /// Program used to submit jobs.
    pub qsub_program: String,
    /// Program used to list queued/running jobs.
    pub qstat_program: String,
    /// Memory reservation per job, passed as `-l h_vmem=<memory>`.
    pub memory: String,
    /// Ask the scheduler to rerun jobs interrupted by a host failure (`-r y`).
    pub rerunnable: bool,
    /// Merge stderr into the stdout log (`-j y`).
    pub join_output: bool,
    /// Appended verbatim to every `qsub` option list (e.g. `["-q", "long.q"]`).
    #[serde(default)]
    pub extra_qsub_args: Vec<String>,
    /// Default maximum number of download jobs in flight without a hold.
    pub con_down_limit: usize,
}

impl Default for VcsubConfig {
    fn default() -> Self {
        Self {
            job_home: None,
            qsub_program: "qsub".to_string(),
            qstat_program: "qstat".to_string(),
            memory: "4G".to_string(),
            rerunnable: true,
            join_output: true,
            extra_qsub_args: Vec::new(),
            con_down_limit: 6,
        }
    }
}

impl VcsubConfig {
    /// Resolve the stage script directory, falling back to `<exe dir>/variant_calling`.
    pub fn resolve_job_home(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.job_home {
            return Ok(dir.clone());
        }
        let exe = std::env::current_exe().context("locate current executable")?;
        let dir = exe
            .parent()
            .context("executable has no parent directory")?
            .join(DEFAULT_JOB_HOME_DIR);
        Ok(dir)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("vcsub")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<VcsubConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = VcsubConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: VcsubConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}
