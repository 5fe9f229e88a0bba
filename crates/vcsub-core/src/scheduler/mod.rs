//! Job-dependency orchestration.
//!
//! For each sample: resume-marker check → claim → run metadata → chain of
//! stage submissions wired with holds. Downloads across the whole run go
//! through one shared [`DownloadAdmissionWindow`].

mod chain;
mod layout;
mod run;
mod window;

pub use chain::{ChainBuilder, ChainError, JobChain, Stage};
pub use layout::RunLayout;
pub use run::{Orchestrator, RunSummary, SampleError, SampleOutcome, SampleReport};
pub use window::DownloadAdmissionWindow;
