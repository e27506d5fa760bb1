//! Background summary worker.
//!
//! # Responsibility
//! - Own a dedicated SQLite connection on a background thread.
//! - Drain submitted jobs in FIFO order, summarize, and write results back.
//!
//! # Invariants
//! - `WorkerScheduler::schedule` is a channel send and never waits for a job.
//! - One job failing does not stop the worker.
//! - `shutdown` processes every job submitted before it, then joins.

use crate::model::note::NoteId;
use crate::repo::note_repo::SqliteNoteRepository;
use crate::service::note_service::{NoteService, NoteServiceError};
use crate::summary::job::{NoopScheduler, ScheduleError, SummaryJob, SummaryScheduler};
use crate::summary::summarizer::Summarizer;
use log::{error, info, warn};
use rusqlite::Connection;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Instant;

const WORKER_THREAD_NAME: &str = "notekeep-summary";

enum WorkerMessage {
    Run(SummaryJob),
    Stop,
}

/// Counters reported when the worker stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerReport {
    /// Jobs whose summary was written back.
    pub completed: u64,
    /// Jobs dropped because summarizing or writing failed.
    pub failed: u64,
}

/// Cloneable submission handle for a running [`SummaryWorker`].
#[derive(Debug, Clone)]
pub struct WorkerScheduler {
    sender: Sender<WorkerMessage>,
}

impl SummaryScheduler for WorkerScheduler {
    fn schedule(&self, job: SummaryJob) -> Result<(), ScheduleError> {
        self.sender
            .send(WorkerMessage::Run(job))
            .map_err(|_| ScheduleError::WorkerStopped)
    }
}

/// Background thread that turns summary jobs into stored summaries.
pub struct SummaryWorker {
    scheduler: WorkerScheduler,
    handle: Option<JoinHandle<WorkerReport>>,
}

impl SummaryWorker {
    /// Starts the worker thread.
    ///
    /// `conn` must point at the same database the submitting service writes
    /// to; an in-memory connection only sees its own data.
    pub fn spawn<Z>(conn: Connection, summarizer: Z) -> std::io::Result<Self>
    where
        Z: Summarizer + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel();
        let handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || run_worker(conn, summarizer, receiver))?;
        info!("event=summary_worker module=summary status=start");

        Ok(Self {
            scheduler: WorkerScheduler { sender },
            handle: Some(handle),
        })
    }

    /// Returns a submission handle usable from any thread.
    pub fn scheduler(&self) -> WorkerScheduler {
        self.scheduler.clone()
    }

    /// Stops after draining already-submitted jobs and returns the counters.
    pub fn shutdown(mut self) -> WorkerReport {
        self.stop_and_join()
    }

    fn stop_and_join(&mut self) -> WorkerReport {
        let Some(handle) = self.handle.take() else {
            return WorkerReport::default();
        };
        // A send error means the thread already exited; join still reports.
        let _ = self.scheduler.sender.send(WorkerMessage::Stop);
        match handle.join() {
            Ok(report) => {
                info!(
                    "event=summary_worker module=summary status=stopped completed={} failed={}",
                    report.completed, report.failed
                );
                report
            }
            Err(_) => {
                error!("event=summary_worker module=summary status=error reason=thread_panicked");
                WorkerReport::default()
            }
        }
    }
}

impl Drop for SummaryWorker {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}

fn run_worker<Z: Summarizer>(
    conn: Connection,
    summarizer: Z,
    receiver: Receiver<WorkerMessage>,
) -> WorkerReport {
    let mut report = WorkerReport::default();

    let repo = match SqliteNoteRepository::try_new(&conn) {
        Ok(repo) => repo,
        Err(err) => {
            error!("event=summary_worker module=summary status=error error={err}");
            return report;
        }
    };
    // Write-backs must never enqueue further jobs.
    let service = NoteService::new(repo, NoopScheduler);

    while let Ok(message) = receiver.recv() {
        let job = match message {
            WorkerMessage::Run(job) => job,
            WorkerMessage::Stop => break,
        };

        match process_job(&service, &summarizer, &job) {
            Ok(()) => report.completed += 1,
            Err(reason) => {
                report.failed += 1;
                warn!(
                    "event=summary_job module=summary status=error note_id={} error={reason}",
                    job.note_id
                );
            }
        }
    }

    report
}

fn process_job<Z: Summarizer>(
    service: &NoteService<SqliteNoteRepository<'_>, NoopScheduler>,
    summarizer: &Z,
    job: &SummaryJob,
) -> Result<(), String> {
    let started_at = Instant::now();
    let summary = summarizer
        .summarize(&job.title, &job.content)
        .map_err(|err| err.to_string())?;

    match service.apply_summary(job.note_id, &summary) {
        Ok(()) => {
            info!(
                "event=summary_job module=summary status=ok note_id={} duration_ms={} summary_chars={}",
                job.note_id,
                started_at.elapsed().as_millis(),
                summary.chars().count()
            );
            Ok(())
        }
        Err(NoteServiceError::NoteNotFound(id)) => Err(deleted_message(id)),
        Err(err) => Err(err.to_string()),
    }
}

fn deleted_message(id: NoteId) -> String {
    format!("note {id} was deleted before its summary finished")
}

