//! Parse sample list text into samples keyed by `(sample_id, file_type)`.

use std::collections::HashMap;

use super::types::{FileType, Sample, SampleFile};
use super::SampleListError;

/// Parse the full contents of a sample list.
///
/// Samples come back in order of first appearance; each sample's files keep
/// list order.
pub(crate) fn parse_sample_list(text: &str) -> Result<Vec<Sample>, SampleListError> {
    let mut samples: Vec<Sample> = Vec::new();
    let mut index: HashMap<(String, FileType), usize> = HashMap::new();

    for (i, raw) in text.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut cols = line.split_whitespace();
        let (sample_id, file_name, location) = match (cols.next(), cols.next(), cols.next()) {
            (Some(s), Some(f), Some(l)) => (s, f, l),
            _ => {
                return Err(SampleListError::Malformed {
                    line: line_no,
                    content: line.to_string(),
                })
            }
        };

        let file_type =
            FileType::from_file_name(file_name).ok_or_else(|| SampleListError::UnknownFileType {
                line: line_no,
                file_name: file_name.to_string(),
            })?;

        let key = (sample_id.to_string(), file_type);
        let slot = *index.entry(key).or_insert_with(|| {
            samples.push(Sample::new(sample_id, file_type));
            samples.len() - 1
        });
        samples[slot].files.push(SampleFile {
            file_name: file_name.to_string(),
            location: location.to_string(),
        });
    }

    Ok(samples)
}
