//! `vcsub check` – parse the sample list and show what would be submitted.

use anyhow::Result;
use std::path::Path;
use vcsub_core::sample_list::{self, FileType};

pub fn run_check(path: &Path) -> Result<()> {
    let samples = sample_list::load(path)?;
    if samples.is_empty() {
        println!("No samples in {}.", path.display());
        return Ok(());
    }
    println!("{:<20} {:<6} {:<6} {}", "SAMPLE", "TYPE", "FILES", "LOCATIONS");
    for s in &samples {
        let mut kinds: Vec<&str> = s.files.iter().map(|f| f.location_kind().as_str()).collect();
        kinds.sort_unstable();
        kinds.dedup();
        let note = if s.file_type == FileType::Fastq {
            "  (unsupported: will be skipped)"
        } else {
            ""
        };
        println!(
            "{:<20} {:<6} {:<6} {}{}",
            s.id,
            s.file_type.as_str(),
            s.files.len(),
            kinds.join(","),
            note
        );
    }
    Ok(())
}
