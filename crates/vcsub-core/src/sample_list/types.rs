//! Types produced by sample list parsing.

use std::fmt;

/// Input file type of a sample, derived from its file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    Bam,
    Cram,
    Fastq,
}

impl FileType {
    pub fn as_str(self) -> &'static str {
        match self {
            FileType::Bam => "bam",
            FileType::Cram => "cram",
            FileType::Fastq => "fastq",
        }
    }

    /// Infer the type from a file name extension. Index files (`.bai`, `.crai`)
    /// belong to their alignment type; `.gz` is looked through for fastq.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        let base = lower.strip_suffix(".gz").unwrap_or(&lower);
        let ext = base.rsplit_once('.').map(|(_, ext)| ext)?;
        match ext {
            "bam" | "bai" if base.len() == lower.len() => Some(FileType::Bam),
            "cram" | "crai" if base.len() == lower.len() => Some(FileType::Cram),
            "fastq" | "fq" => Some(FileType::Fastq),
            _ => None,
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a download stage fetches a file from. Classified for reporting only;
/// the download script interprets the raw string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationKind {
    /// Synapse entity ID (`syn` followed by digits).
    Synapse,
    /// S3 URI.
    S3,
    /// Anything else is treated as a local path (symlinked by the script).
    LocalPath,
}

impl LocationKind {
    pub fn classify(location: &str) -> Self {
        if let Some(digits) = location.strip_prefix("syn") {
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                return LocationKind::Synapse;
            }
        }
        if location.starts_with("s3://") {
            return LocationKind::S3;
        }
        LocationKind::LocalPath
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LocationKind::Synapse => "synapse",
            LocationKind::S3 => "s3",
            LocationKind::LocalPath => "local",
        }
    }
}

/// One `(filename, location)` pair of a sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleFile {
    pub file_name: String,
    pub location: String,
}

impl SampleFile {
    pub fn location_kind(&self) -> LocationKind {
        LocationKind::classify(&self.location)
    }
}

/// A sample keyed by `(id, file_type)` with its files in list order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub id: String,
    pub file_type: FileType,
    pub files: Vec<SampleFile>,
}

impl Sample {
    pub fn new(id: impl Into<String>, file_type: FileType) -> Self {
        Self {
            id: id.into(),
            file_type,
            files: Vec::new(),
        }
    }

    /// Builder-style helper, mostly for tests and dry runs.
    pub fn with_file(mut self, file_name: impl Into<String>, location: impl Into<String>) -> Self {
        self.files.push(SampleFile {
            file_name: file_name.into(),
            location: location.into(),
        });
        self
    }
}
