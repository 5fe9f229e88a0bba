//! Download admission window shared by every sample of a run.
//!
//! Holds the handles of the last N download jobs. Each new download is held
//! on the oldest of them, so the (k+N)-th download cannot start before the
//! k-th has finished. The scheduler enforces the wait; nothing here blocks.

use std::collections::VecDeque;
use std::num::NonZeroUsize;

use crate::batch::JobHandle;

/// Fixed-size FIFO of the most recent download job handles.
#[derive(Debug, Clone)]
pub struct DownloadAdmissionWindow {
    slots: VecDeque<Option<JobHandle>>,
}

impl DownloadAdmissionWindow {
    /// Create a window with `limit` empty slots.
    pub fn new(limit: NonZeroUsize) -> Self {
        let mut slots = VecDeque::with_capacity(limit.get());
        slots.resize(limit.get(), None);
        Self { slots }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// The download the next submission must wait for (the oldest slot), if any.
    pub fn admit(&self) -> Option<JobHandle> {
        self.slots.front().cloned().flatten()
    }

    /// Retire the oldest slot and remember `handle` as the newest download.
    pub fn record(&mut self, handle: JobHandle) {
        self.slots.pop_front();
        self.slots.push_back(Some(handle));
    }

    /// Number of slots holding a handle.
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
}
