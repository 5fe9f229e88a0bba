//! Per-sample job chain: downloads → [bam2cram → unmapped reads] → variant calling → upload.

use crate::batch::{BatchClient, BatchError, Dependency, JobCommand, JobHandle};
use crate::sample_list::{FileType, Sample};

use super::layout::RunLayout;
use super::window::DownloadAdmissionWindow;

/// Pipeline stages in submission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Download,
    BamToCram,
    UnmappedReads,
    VariantCalling,
    Upload,
}

impl Stage {
    /// Script implementing the stage, relative to the job home.
    pub fn script(self) -> &'static str {
        match self {
            Stage::Download => "pre_1.download.sh",
            Stage::BamToCram => "pre_2.bam2cram.sh",
            Stage::UnmappedReads => "pre_2b.unmapped_reads.sh",
            Stage::VariantCalling => "pre_3.run_variant_calling.sh",
            Stage::Upload => "pre_4.upload_cram.sh",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Download => "download",
            Stage::BamToCram => "bam2cram",
            Stage::UnmappedReads => "unmapped_reads",
            Stage::VariantCalling => "variant_calling",
            Stage::Upload => "upload",
        }
    }
}

/// Why a sample's chain could not be built.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    #[error("input file type must be bam or cram, got {0}")]
    InvalidFileType(FileType),
    #[error(transparent)]
    Batch(#[from] BatchError),
}

/// Handles produced for one sample, by stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobChain {
    pub downloads: Vec<JobHandle>,
    pub bam_to_cram: Option<JobHandle>,
    pub unmapped_reads: Option<JobHandle>,
    pub variant_calling: JobHandle,
    pub upload: JobHandle,
}

impl JobChain {
    /// Total number of jobs submitted for the sample.
    pub fn job_count(&self) -> usize {
        self.downloads.len()
            + usize::from(self.bam_to_cram.is_some())
            + usize::from(self.unmapped_reads.is_some())
            + 2
    }
}

/// Submits one sample's chain with correct hold wiring.
pub struct ChainBuilder<'a> {
    layout: &'a RunLayout,
}

impl<'a> ChainBuilder<'a> {
    pub fn new(layout: &'a RunLayout) -> Self {
        Self { layout }
    }

    /// Submit every stage of `sample`.
    ///
    /// Fastq input is rejected before anything is submitted. A scheduler
    /// failure stops the chain; jobs already accepted stay queued.
    pub fn build<C: BatchClient + ?Sized>(
        &self,
        sample: &Sample,
        window: &mut DownloadAdmissionWindow,
        client: &mut C,
    ) -> Result<JobChain, ChainError> {
        let convert = match sample.file_type {
            FileType::Bam => true,
            FileType::Cram => false,
            FileType::Fastq => return Err(ChainError::InvalidFileType(sample.file_type)),
        };
        let id = sample.id.as_str();

        let mut downloads = Vec::with_capacity(sample.files.len());
        for file in &sample.files {
            let predecessor = window.admit();
            let cmd = self
                .command(Stage::Download, id)
                .arg(&file.file_name)
                .arg(&file.location);
            let handle = self.submit(client, Stage::Download, id, predecessor.into(), &cmd)?;
            window.record(handle.clone());
            downloads.push(handle);
        }

        // Fan-in: the next stage waits on every download of the sample.
        let mut hold: Dependency = downloads.iter().cloned().collect();

        let (bam_to_cram, unmapped_reads) = if convert {
            let cram = self.submit_stage(client, Stage::BamToCram, id, hold)?;
            let unmapped =
                self.submit_stage(client, Stage::UnmappedReads, id, Dependency::on(cram.clone()))?;
            hold = Dependency::on(unmapped.clone());
            (Some(cram), Some(unmapped))
        } else {
            (None, None)
        };

        let variant_calling = self.submit_stage(client, Stage::VariantCalling, id, hold)?;
        let upload = self.submit_stage(
            client,
            Stage::Upload,
            id,
            Dependency::on(variant_calling.clone()),
        )?;

        Ok(JobChain {
            downloads,
            bam_to_cram,
            unmapped_reads,
            variant_calling,
            upload,
        })
    }

    fn command(&self, stage: Stage, sample_id: &str) -> JobCommand {
        JobCommand::new(self.layout.script(stage.script())).arg(sample_id)
    }

    fn submit_stage<C: BatchClient + ?Sized>(
        &self,
        client: &mut C,
        stage: Stage,
        sample_id: &str,
        hold: Dependency,
    ) -> Result<JobHandle, BatchError> {
        let cmd = self.command(stage, sample_id);
        self.submit(client, stage, sample_id, hold, &cmd)
    }

    fn submit<C: BatchClient + ?Sized>(
        &self,
        client: &mut C,
        stage: Stage,
        sample_id: &str,
        hold: Dependency,
        cmd: &JobCommand,
    ) -> Result<JobHandle, BatchError> {
        let hold_list = hold.to_hold_list();
        let options = self.layout.submit_options(sample_id, hold);
        let handle = client.submit(&options, cmd)?;
        tracing::debug!(
            sample = sample_id,
            stage = stage.as_str(),
            hold = hold_list.as_deref().unwrap_or("-"),
            job = %handle,
            "submitted"
        );
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::RecordingClient;
    use std::num::NonZeroUsize;

    fn window(n: usize) -> DownloadAdmissionWindow {
        DownloadAdmissionWindow::new(NonZeroUsize::new(n).unwrap())
    }

    fn holds(client: &RecordingClient) -> Vec<Option<String>> {
        client
            .submissions()
            .iter()
            .map(|s| s.options.hold.to_hold_list())
            .collect()
    }

    fn scripts(client: &RecordingClient) -> Vec<String> {
        client
            .submissions()
            .iter()
            .map(|s| s.command.script_name().to_string())
            .collect()
    }

    #[test]
    fn bam_sample_two_files() {
        let layout = RunLayout::new("/w", "/jobs");
        let sample = Sample::new("S1", FileType::Bam)
            .with_file("a", "locA")
            .with_file("b", "locB");
        let mut client = RecordingClient::new(1);
        let mut w = window(6);

        let chain = ChainBuilder::new(&layout)
            .build(&sample, &mut w, &mut client)
            .unwrap();

        assert_eq!(chain.job_count(), 6);
        assert_eq!(
            scripts(&client),
            vec![
                "pre_1.download.sh",
                "pre_1.download.sh",
                "pre_2.bam2cram.sh",
                "pre_2b.unmapped_reads.sh",
                "pre_3.run_variant_calling.sh",
                "pre_4.upload_cram.sh",
            ]
        );
        assert_eq!(
            holds(&client),
            vec![
                None,
                None,
                Some("1,2".to_string()),
                Some("3".to_string()),
                Some("4".to_string()),
                Some("5".to_string()),
            ]
        );
        let first = &client.submissions()[0].command;
        assert_eq!(first.to_string(), "/jobs/pre_1.download.sh S1 a locA");
        assert_eq!(client.submissions()[5].command.args, vec!["S1"]);
        assert_eq!(w.occupied(), 2);
    }

    #[test]
    fn cram_sample_skips_conversion() {
        let layout = RunLayout::new("/w", "/jobs");
        let sample = Sample::new("S2", FileType::Cram)
            .with_file("x.cram", "syn1")
            .with_file("x.cram.crai", "syn2")
            .with_file("y.cram", "syn3");
        let mut client = RecordingClient::new(10);
        let chain = ChainBuilder::new(&layout)
            .build(&sample, &mut window(6), &mut client)
            .unwrap();

        assert!(chain.bam_to_cram.is_none());
        assert!(chain.unmapped_reads.is_none());
        assert_eq!(chain.job_count(), 5);
        let holds = holds(&client);
        assert_eq!(
            &holds[3..],
            &[Some("10,11,12".to_string()), Some("13".to_string())]
        );
    }

    #[test]
    fn fastq_sample_submits_nothing() {
        let layout = RunLayout::new("/w", "/jobs");
        let sample = Sample::new("S3", FileType::Fastq).with_file("r1.fastq.gz", "syn1");
        let mut client = RecordingClient::default();
        let mut w = window(2);
        let err = ChainBuilder::new(&layout)
            .build(&sample, &mut w, &mut client)
            .unwrap_err();
        assert!(matches!(err, ChainError::InvalidFileType(FileType::Fastq)));
        assert!(client.submissions().is_empty());
        assert_eq!(w.occupied(), 0);
    }

    #[test]
    fn zero_files_starts_immediately() {
        let layout = RunLayout::new("/w", "/jobs");
        let sample = Sample::new("S4", FileType::Cram);
        let mut client = RecordingClient::default();
        let chain = ChainBuilder::new(&layout)
            .build(&sample, &mut window(1), &mut client)
            .unwrap();
        assert!(chain.downloads.is_empty());
        assert_eq!(holds(&client), vec![None, Some("1".to_string())]);
    }

    #[test]
    fn window_limits_downloads_within_a_sample() {
        let layout = RunLayout::new("/w", "/jobs");
        let sample = Sample::new("S5", FileType::Cram)
            .with_file("1.cram", "l1")
            .with_file("2.cram", "l2")
            .with_file("3.cram", "l3");
        let mut client = RecordingClient::default();
        ChainBuilder::new(&layout)
            .build(&sample, &mut window(1), &mut client)
            .unwrap();
        let holds = holds(&client);
        assert_eq!(
            &holds[..3],
            &[None, Some("1".to_string()), Some("2".to_string())]
        );
        assert_eq!(holds[3], Some("1,2,3".to_string()));
    }

    #[test]
    fn scheduler_failure_stops_the_chain() {
        let layout = RunLayout::new("/w", "/jobs");
        let sample = Sample::new("S6", FileType::Bam).with_file("a.bam", "syn1");
        let mut client = RecordingClient::default();
        let err = ChainBuilder::new(&layout)
            .build(&sample, &mut window(6), &mut client.fail_after(2))
            .unwrap_err();
        assert!(matches!(err, ChainError::Batch(_)));
        assert_eq!(client.submissions().len(), 2);
    }
}
