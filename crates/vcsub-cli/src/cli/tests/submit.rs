//! Tests for the submit subcommand.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;

#[test]
fn cli_parse_submit_defaults() {
    match parse(&["vcsub", "submit", "--sample-list", "samples.txt"]) {
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
            assert_eq!(list.sample_list, std::path::Path::new("samples.txt"));
            assert!(con_down_limit.is_none());
            assert!(upload.is_none());
            assert!(run_gatk_hc.is_none());
            assert!(!run_mutect_single);
            assert!(!run_cnvnator);
            assert!(work_dir.is_none());
            assert!(!dry_run);
        }
        _ => panic!("expected Submit"),
    }
}

#[test]
fn cli_parse_submit_all_options() {
    match parse(&[
        "vcsub",
        "submit",
        "--sample-list",
        "s.txt",
        "--con-down-limit",
        "3",
        "--upload",
        "syn123",
        "--run-gatk-hc",
        "2",
        "12",
        "--run-mutect-single",
        "--run-cnvnator",
        "--work-dir",
        "/scratch/run1",
        "--dry-run",
    ]) {
        CliCommand::Submit {
            con_down_limit,
            upload,
            run_gatk_hc,
            run_mutect_single,
            run_cnvnator,
            work_dir,
            dry_run,
            ..
        } => {
            assert_eq!(con_down_limit, Some(3));
            assert_eq!(upload.as_deref(), Some("syn123"));
            assert_eq!(run_gatk_hc, Some(vec![2, 12]));
            assert!(run_mutect_single);
            assert!(run_cnvnator);
            assert_eq!(
                work_dir.as_deref(),
                Some(std::path::Path::new("/scratch/run1"))
            );
            assert!(dry_run);
        }
        _ => panic!("expected Submit with options"),
    }
}

#[test]
fn cli_submit_requires_sample_list() {
    assert!(Cli::try_parse_from(["vcsub", "submit"]).is_err());
}

#[test]
fn cli_submit_gatk_hc_needs_a_ploidy() {
    assert!(Cli::try_parse_from([
        "vcsub",
        "submit",
        "--sample-list",
        "s.txt",
        "--run-gatk-hc"
    ])
    .is_err());
}

#[test]
fn cli_submit_rejects_non_integer_limit() {
    assert!(Cli::try_parse_from([
        "vcsub",
        "submit",
        "--sample-list",
        "s.txt",
        "--con-down-limit",
        "many"
    ])
    .is_err());
}
