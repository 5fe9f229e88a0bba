//! `vcsub submit` – claim samples and submit their job chains.

use anyhow::{bail, Context, Result};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use vcsub_core::batch::{GridEngineClient, RecordingClient};
use vcsub_core::config::VcsubConfig;
use vcsub_core::metadata::{DiscardMetadata, RunInfoWriter, RunOptions};
use vcsub_core::sample_list;
use vcsub_core::scheduler::{Orchestrator, RunLayout, RunSummary, SampleOutcome};

/// Resolved arguments of `vcsub submit`.
#[derive(Debug)]
pub struct SubmitRequest {
    pub sample_list: PathBuf,
    pub con_down_limit: usize,
    pub work_dir: PathBuf,
    pub options: RunOptions,
    pub dry_run: bool,
}

pub fn run_submit(cfg: &VcsubConfig, req: &SubmitRequest) -> Result<()> {
    let limit = NonZeroUsize::new(req.con_down_limit)
        .context("--con-down-limit must be at least 1")?;
    let samples = sample_list::load(&req.sample_list)?;
    let job_home = cfg.resolve_job_home()?;
    if !job_home.is_dir() {
        tracing::warn!(path = %job_home.display(), "job home is not a directory on this host");
    }
    let layout = RunLayout::from_config(cfg, &req.work_dir, &job_home);
    tracing::info!(
        samples = samples.len(),
        con_down_limit = limit.get(),
        dry_run = req.dry_run,
        "starting submission"
    );

    let summary = if req.dry_run {
        Orchestrator::new(
            RecordingClient::new(1).echoing(),
            DiscardMetadata,
            &layout,
            limit,
            req.options.clone(),
        )
        .run(&samples)
    } else {
        Orchestrator::new(
            GridEngineClient::new(&cfg.qsub_program, &cfg.qstat_program),
            RunInfoWriter::new(&layout),
            &layout,
            limit,
            req.options.clone(),
        )
        .run(&samples)
    };

    print_summary(&summary);
    if summary.failed() > 0 {
        bail!("{} sample(s) failed submission", summary.failed());
    }
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    for report in &summary.reports {
        println!("- Sample: {} ({})", report.sample_id, report.file_type);
        match &report.outcome {
            SampleOutcome::Submitted(chain) => {
                println!("  submitted {} job(s); upload job {}", chain.job_count(), chain.upload)
            }
            SampleOutcome::AlreadyQueued { active } => {
                println!("  {active} job(s) for this sample are still queued; skipped")
            }
            SampleOutcome::InvalidFileType(ft) => {
                println!("  input file type must be bam or cram, got {ft}; skipped")
            }
            SampleOutcome::Failed(err) => println!("  submission failed: {err:#}"),
        }
    }
    println!();
    println!(
        "{} submitted ({} jobs), {} already queued, {} invalid, {} failed",
        summary.submitted(),
        summary.jobs_submitted(),
        summary.already_queued(),
        summary.invalid(),
        summary.failed()
    );
}
