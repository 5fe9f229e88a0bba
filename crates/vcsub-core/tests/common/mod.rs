//! Shared helpers for integration tests.

#![allow(dead_code)]

#[cfg(unix)]
pub mod fake_grid_engine;

use std::io::Write;
use std::path::{Path, PathBuf};

/// Write `contents` as a sample list inside `dir` and return its path.
pub fn write_sample_list(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("samples.txt");
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(contents.as_bytes()).unwrap();
    path
}
