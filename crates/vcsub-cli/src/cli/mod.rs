//! CLI for the vcsub variant-calling submitter.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use vcsub_core::config;

use commands::{run_check, run_status, run_submit};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "vcsub")]
#[command(about = "vcsub: submit the variant-calling pipeline to Grid Engine", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Options shared by commands that read a sample list.
#[derive(Debug, Args)]
pub struct SampleListArgs {
    /// Sample list file. Each line is "sample_id<TAB>file_name<TAB>location";
    /// lines starting with "#" are skipped and trailing columns are ignored.
    /// Location is a Synapse ID, an S3 URI or a local path.
    #[arg(long, value_name = "sample_list.txt")]
    pub sample_list: PathBuf,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Submit download, conversion, variant-calling and upload jobs for every sample.
    Submit {
        #[command(flatten)]
        list: SampleListArgs,

        /// Maximum number of concurrent downloads [default: from config, 6].
        #[arg(long, value_name = "int")]
        con_down_limit: Option<usize>,

        /// Synapse ID of the project or folder receiving result cram files.
        /// If unset, results are kept locally.
        #[arg(long, value_name = "syn123")]
        upload: Option<String>,

        /// Run GATK HaplotypeCaller with the given ploidy values.
        #[arg(long, value_name = "ploidy", num_args = 1..)]
        run_gatk_hc: Option<Vec<u32>>,

        /// Run MuTect2 in single-sample mode.
        #[arg(long)]
        run_mutect_single: bool,

        /// Run CNVnator.
        #[arg(long)]
        run_cnvnator: bool,

        /// Directory holding per-sample directories [default: current directory].
        #[arg(long, value_name = "DIR")]
        work_dir: Option<PathBuf>,

        /// Print the qsub commands instead of submitting; writes no files.
        #[arg(long)]
        dry_run: bool,
    },

    /// Parse the sample list and show what would be submitted.
    Check {
        #[command(flatten)]
        list: SampleListArgs,
    },

    /// Show how many jobs of each sample are still queued or running.
    Status {
        #[command(flatten)]
        list: SampleListArgs,

        /// Directory holding per-sample directories [default: current directory].
        #[arg(long, value_name = "DIR")]
        work_dir: Option<PathBuf>,
    },
}

fn resolve_work_dir(work_dir: Option<PathBuf>) -> Result<PathBuf> {
    match work_dir {
        Some(dir) => Ok(dir),
        None => Ok(std::env::current_dir()?),
    }
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Submit {
                list,
                con_down_limit,
                upload,
                run_gatk_hc,
                run_mutect_single,
                run_cnvnator,
                work_dir,
                dry_run,
            } => {
                let request = commands::SubmitRequest {
                    sample_list: list.sample_list,
                    con_down_limit: con_down_limit.unwrap_or(cfg.con_down_limit),
                    work_dir: resolve_work_dir(work_dir)?,
                    options: vcsub_core::metadata::RunOptions {
                        upload,
                        run_cnvnator,
                        run_mutect_single,
                        gatk_hc_ploidy: run_gatk_hc,
                    },
                    dry_run,
                };
                run_submit(&cfg, &request)?;
            }
            CliCommand::Check { list } => run_check(&list.sample_list)?,
            CliCommand::Status { list, work_dir } => {
                run_status(&cfg, &list.sample_list, &resolve_work_dir(work_dir)?)?
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
