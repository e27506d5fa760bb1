//! Summary job contract and scheduler seam.

use crate::model::note::NoteId;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Unit of work asking for a summary of one note snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryJob {
    pub note_id: NoteId,
    pub title: String,
    pub content: String,
}

impl SummaryJob {
    pub fn new(note_id: NoteId, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            note_id,
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Job submission failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// The receiving worker has stopped.
    WorkerStopped,
    /// Implementation-specific rejection.
    Rejected(String),
}

impl Display for ScheduleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WorkerStopped => write!(f, "summary worker is not running"),
            Self::Rejected(reason) => write!(f, "summary job rejected: {reason}"),
        }
    }
}

impl Error for ScheduleError {}

/// Fire-and-forget submission of summary jobs.
///
/// Implementations must return without waiting for the job to run.
pub trait SummaryScheduler {
    fn schedule(&self, job: SummaryJob) -> Result<(), ScheduleError>;
}

impl<S: SummaryScheduler + ?Sized> SummaryScheduler for &S {
    fn schedule(&self, job: SummaryJob) -> Result<(), ScheduleError> {
        (**self).schedule(job)
    }
}

/// Scheduler that accepts and discards every job.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopScheduler;

impl SummaryScheduler for NoopScheduler {
    fn schedule(&self, _job: SummaryJob) -> Result<(), ScheduleError> {
        Ok(())
    }
}
