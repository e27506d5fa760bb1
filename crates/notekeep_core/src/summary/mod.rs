//! Asynchronous summary pipeline.
//!
//! # Responsibility
//! - Define the job shape submitted after note writes.
//! - Decouple mutation paths from summary generation via a scheduler seam.
//! - Run jobs on a background worker that writes results back onto notes.
//!
//! # Invariants
//! - Submitting a job never blocks on its completion.
//! - A failed job leaves the note untouched; there is no retry.
//! - Jobs are never cancelled once submitted.

pub mod job;
pub mod summarizer;
pub mod worker;
