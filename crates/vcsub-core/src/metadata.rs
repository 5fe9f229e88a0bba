//! Per-sample run metadata (`<sample>/run_info`), sourced by the stage scripts.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::scheduler::RunLayout;

/// Optional stages and upload target chosen for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Synapse ID of the project/folder receiving result crams. None = keep them locally.
    pub upload: Option<String>,
    pub run_cnvnator: bool,
    pub run_mutect_single: bool,
    /// Ploidy values for GATK HaplotypeCaller; None = stage disabled.
    pub gatk_hc_ploidy: Option<Vec<u32>>,
}

/// Shell-style boolean as the scripts expect it.
fn flag(v: bool) -> &'static str {
    if v {
        "True"
    } else {
        "False"
    }
}

impl RunOptions {
    /// Render the `#RUN_OPTIONS` section.
    pub fn render(&self) -> String {
        let mut out = String::from("#RUN_OPTIONS\n");
        let _ = writeln!(out, "UPLOAD={}", self.upload.as_deref().unwrap_or("None"));
        let _ = writeln!(out, "RUN_CNVNATOR={}", flag(self.run_cnvnator));
        let _ = writeln!(out, "RUN_MUTECT_SINGLE={}", flag(self.run_mutect_single));
        match &self.gatk_hc_ploidy {
            Some(ploidy) => {
                let values: Vec<String> = ploidy.iter().map(u32::to_string).collect();
                let _ = writeln!(out, "RUN_GATK_HC=True");
                let _ = writeln!(out, "PLOIDY=\"{}\"", values.join(" "));
            }
            None => {
                let _ = writeln!(out, "RUN_GATK_HC=False");
            }
        }
        out
    }
}

#[derive(Debug, thiserror::Error)]
#[error("write run metadata {path}: {source}")]
pub struct MetadataError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Where run options are recorded when a sample is claimed.
pub trait MetadataSink {
    fn record(&mut self, sample_id: &str, options: &RunOptions) -> Result<(), MetadataError>;
}

/// Writes `run_info` files into the sample directories of a [`RunLayout`].
pub struct RunInfoWriter<'a> {
    layout: &'a RunLayout,
}

impl<'a> RunInfoWriter<'a> {
    pub fn new(layout: &'a RunLayout) -> Self {
        Self { layout }
    }

    fn write(&self, path: &Path, options: &RunOptions) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut text = String::from("#PATH\n");
        let _ = writeln!(text, "JOB_HOME={}", self.layout.job_home.display());
        text.push('\n');
        text.push_str(&options.render());
        fs::write(path, text)
    }
}

impl MetadataSink for RunInfoWriter<'_> {
    fn record(&mut self, sample_id: &str, options: &RunOptions) -> Result<(), MetadataError> {
        let path = self.layout.run_info_path(sample_id);
        self.write(&path, options)
            .map_err(|source| MetadataError { path, source })
    }
}

/// Discards metadata (dry runs).
#[derive(Debug, Default)]
pub struct DiscardMetadata;

impl MetadataSink for DiscardMetadata {
    fn record(&mut self, sample_id: &str, _options: &RunOptions) -> Result<(), MetadataError> {
        tracing::debug!(sample = sample_id, "dry run: run_info not written");
        Ok(())
    }
}
