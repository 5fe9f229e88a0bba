//! Sample list reader.
//!
//! Each non-comment line is `sample_id file_name location`; trailing columns
//! are ignored. Location is a Synapse ID, an S3 URI or a local path.

mod parse;
mod types;

pub use types::{FileType, LocationKind, Sample, SampleFile};

use std::path::{Path, PathBuf};

/// Fatal errors while reading a sample list. Any of these aborts the run
/// before a single job is submitted.
#[derive(Debug, thiserror::Error)]
pub enum SampleListError {
    #[error("read sample list {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: expected `sample_id file_name location`, got {content:?}")]
    Malformed { line: usize, content: String },
    #[error("line {line}: cannot infer file type from {file_name:?}")]
    UnknownFileType { line: usize, file_name: String },
}

/// Read and parse the sample list at `path`.
pub fn load(path: &Path) -> Result<Vec<Sample>, SampleListError> {
    let text = std::fs::read_to_string(path).map_err(|source| SampleListError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let samples = parse::parse_sample_list(&text)?;
    tracing::debug!(path = %path.display(), samples = samples.len(), "parsed sample list");
    Ok(samples)
}
