//! `vcsub status` – count queued/running jobs per sample from its resume marker.

use anyhow::Result;
use std::path::Path;
use vcsub_core::batch::{BatchClient, GridEngineClient};
use vcsub_core::config::VcsubConfig;
use vcsub_core::sample_list;
use vcsub_core::scheduler::RunLayout;

pub fn run_status(cfg: &VcsubConfig, list: &Path, work_dir: &Path) -> Result<()> {
    let samples = sample_list::load(list)?;
    let layout = RunLayout::from_config(cfg, work_dir, &cfg.resolve_job_home()?);
    let mut client = GridEngineClient::new(&cfg.qsub_program, &cfg.qstat_program);

    println!("{:<20} {:<6} {}", "SAMPLE", "TYPE", "ACTIVE");
    for s in &samples {
        let active = client.count_active(&layout.marker_path(&s.id))?;
        println!("{:<20} {:<6} {}", s.id, s.file_type.as_str(), active);
    }
    Ok(())
}
