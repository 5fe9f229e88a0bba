//! Top-level driver: claim each sample, record its options, submit its chain.

use std::num::NonZeroUsize;

use crate::batch::{BatchClient, BatchError};
use crate::metadata::{MetadataError, MetadataSink, RunOptions};
use crate::sample_list::{FileType, Sample};

use super::chain::{ChainBuilder, ChainError, JobChain};
use super::layout::RunLayout;
use super::window::DownloadAdmissionWindow;

/// Failure confined to one sample. Sibling jobs already accepted by the
/// scheduler are left for the operator to reconcile.
#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    #[error(transparent)]
    Batch(#[from] BatchError),
    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

/// What happened to one sample.
#[derive(Debug)]
pub enum SampleOutcome {
    Submitted(JobChain),
    /// The resume marker still references `active` queued/running jobs.
    AlreadyQueued { active: usize },
    InvalidFileType(FileType),
    Failed(SampleError),
}

#[derive(Debug)]
pub struct SampleReport {
    pub sample_id: String,
    pub file_type: FileType,
    pub outcome: SampleOutcome,
}

/// Outcomes of a run, in sample list order.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub reports: Vec<SampleReport>,
}

impl RunSummary {
    fn count(&self, pred: impl Fn(&SampleOutcome) -> bool) -> usize {
        self.reports.iter().filter(|r| pred(&r.outcome)).count()
    }

    pub fn submitted(&self) -> usize {
        self.count(|o| matches!(o, SampleOutcome::Submitted(_)))
    }

    pub fn already_queued(&self) -> usize {
        self.count(|o| matches!(o, SampleOutcome::AlreadyQueued { .. }))
    }

    pub fn invalid(&self) -> usize {
        self.count(|o| matches!(o, SampleOutcome::InvalidFileType(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, SampleOutcome::Failed(_)))
    }

    /// Total jobs submitted across all samples.
    pub fn jobs_submitted(&self) -> usize {
        self.reports
            .iter()
            .map(|r| match &r.outcome {
                SampleOutcome::Submitted(chain) => chain.job_count(),
                _ => 0,
            })
            .sum()
    }
}

/// Drives submission for a whole sample list through one shared download window.
pub struct Orchestrator<'a, C, M> {
    client: C,
    metadata: M,
    layout: &'a RunLayout,
    options: RunOptions,
    window: DownloadAdmissionWindow,
}

impl<'a, C: BatchClient, M: MetadataSink> Orchestrator<'a, C, M> {
    pub fn new(
        client: C,
        metadata: M,
        layout: &'a RunLayout,
        con_down_limit: NonZeroUsize,
        options: RunOptions,
    ) -> Self {
        Self {
            client,
            metadata,
            layout,
            options,
            window: DownloadAdmissionWindow::new(con_down_limit),
        }
    }

    pub fn window(&self) -> &DownloadAdmissionWindow {
        &self.window
    }

    /// Give back the client (e.g. to inspect a recording client).
    pub fn into_client(self) -> C {
        self.client
    }

    /// Submit every sample in order. Per-sample problems are reported in the
    /// summary and never stop the remaining samples.
    pub fn run(&mut self, samples: &[Sample]) -> RunSummary {
        let mut summary = RunSummary::default();
        for sample in samples {
            let outcome = self.run_sample(sample);
            match &outcome {
                SampleOutcome::Submitted(chain) => tracing::info!(
                    sample = %sample.id,
                    jobs = chain.job_count(),
                    upload_job = %chain.upload,
                    "submitted sample"
                ),
                SampleOutcome::AlreadyQueued { active } => tracing::info!(
                    sample = %sample.id,
                    active,
                    "jobs already queued for sample; skipping"
                ),
                SampleOutcome::InvalidFileType(ft) => tracing::warn!(
                    sample = %sample.id,
                    file_type = %ft,
                    "input file type must be bam or cram; skipping"
                ),
                SampleOutcome::Failed(err) => {
                    tracing::warn!(sample = %sample.id, "sample submission failed: {:#}", err)
                }
            }
            summary.reports.push(SampleReport {
                sample_id: sample.id.clone(),
                file_type: sample.file_type,
                outcome,
            });
        }
        summary
    }

    fn run_sample(&mut self, sample: &Sample) -> SampleOutcome {
        match self.claim_and_submit(sample) {
            Ok(outcome) => outcome,
            Err(err) => SampleOutcome::Failed(err),
        }
    }

    fn claim_and_submit(&mut self, sample: &Sample) -> Result<SampleOutcome, SampleError> {
        let marker = self.layout.marker_path(&sample.id);

        let active = self.client.count_active(&marker)?;
        if active > 0 {
            return Ok(SampleOutcome::AlreadyQueued { active });
        }
        self.client.write_marker(&marker, true)?;
        self.metadata.record(&sample.id, &self.options)?;

        let builder = ChainBuilder::new(self.layout);
        match builder.build(sample, &mut self.window, &mut self.client) {
            Ok(chain) => Ok(SampleOutcome::Submitted(chain)),
            Err(ChainError::InvalidFileType(ft)) => Ok(SampleOutcome::InvalidFileType(ft)),
            Err(ChainError::Batch(e)) => Err(SampleError::Batch(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::RecordingClient;
    use crate::metadata::DiscardMetadata;

    fn limit(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn bad_sample_does_not_stop_the_batch() {
        let layout = RunLayout::new("/w", "/jobs");
        let samples = vec![
            Sample::new("S1", FileType::Cram).with_file("a.cram", "syn1"),
            Sample::new("S2", FileType::Fastq).with_file("r1.fq", "syn2"),
            Sample::new("S3", FileType::Bam).with_file("b.bam", "syn3"),
        ];
        let mut orch = Orchestrator::new(
            RecordingClient::default(),
            DiscardMetadata,
            &layout,
            limit(6),
            RunOptions::default(),
        );
        let summary = orch.run(&samples);
        assert_eq!(summary.submitted(), 2);
        assert_eq!(summary.invalid(), 1);
        assert_eq!(summary.failed(), 0);
        assert_eq!(summary.jobs_submitted(), 3 + 5);
        assert!(matches!(
            summary.reports[1].outcome,
            SampleOutcome::InvalidFileType(FileType::Fastq)
        ));
        assert_eq!(orch.into_client().submissions().len(), 8);
    }

    #[test]
    fn window_is_shared_across_samples() {
        let layout = RunLayout::new("/w", "/jobs");
        let samples = vec![
            Sample::new("S1", FileType::Cram).with_file("a.cram", "l"),
            Sample::new("S2", FileType::Cram).with_file("b.cram", "l"),
        ];
        let mut orch = Orchestrator::new(
            RecordingClient::default(),
            DiscardMetadata,
            &layout,
            limit(1),
            RunOptions::default(),
        );
        orch.run(&samples);
        assert_eq!(orch.window().occupied(), 1);
        let client = orch.into_client();
        // S1: download=1, vc=2, upload=3; S2's download waits on S1's download.
        let s2_download = &client.submissions()[3];
        assert_eq!(s2_download.command.args[0], "S2");
        assert_eq!(s2_download.options.hold.to_hold_list().as_deref(), Some("1"));
    }

    #[test]
    fn batch_failure_is_per_sample() {
        let layout = RunLayout::new("/w", "/jobs");
        let samples = vec![
            Sample::new("S1", FileType::Cram).with_file("a.cram", "l"),
            Sample::new("S2", FileType::Cram).with_file("b.cram", "l"),
        ];
        let mut recorder = RecordingClient::default();
        let summary = Orchestrator::new(
            recorder.fail_after(1),
            DiscardMetadata,
            &layout,
            limit(6),
            RunOptions::default(),
        )
        .run(&samples);
        assert_eq!(summary.failed(), 2);
        assert!(matches!(
            summary.reports[0].outcome,
            SampleOutcome::Failed(SampleError::Batch(_))
        ));
        assert_eq!(recorder.submissions().len(), 1);
    }
}
