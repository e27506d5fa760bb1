//! Note use-case service.
//!
//! # Responsibility
//! - Provide the caller-facing note operations: list, get, create, update,
//!   delete and search.
//! - Resolve caller identity from the explicit `RequestContext` and enforce
//!   ownership.
//! - Submit summary jobs after writes without waiting for them.
//!
//! # Invariants
//! - Unauthenticated reads return `None`, never an error.
//! - `update_note` fails without writing when the note is missing or the
//!   caller is not its owner.
//! - `update_note` re-submits a summary job only when the note already had
//!   a summary.
//! - Summary submission failures are logged and never fail the mutation.

use crate::auth::RequestContext;
use crate::model::note::{Note, NoteId, UserId};
use crate::repo::note_repo::{NoteRepository, RepoError};
use crate::summary::job::{SummaryJob, SummaryScheduler};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// How `get_note` and `delete_note` treat callers who do not own the note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnershipPolicy {
    /// Only the owner may read a single note or delete it.
    #[default]
    Strict,
    /// Any caller may read any note by id and delete it unconditionally.
    Legacy,
}

impl OwnershipPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Legacy => "legacy",
        }
    }
}

impl FromStr for OwnershipPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "legacy" => Ok(Self::Legacy),
            other => Err(format!(
                "unsupported ownership policy `{other}`; expected strict|legacy"
            )),
        }
    }
}

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Operation needs an authenticated caller.
    Unauthenticated,
    /// Target note does not exist.
    NoteNotFound(NoteId),
    /// Caller is not the note owner.
    Unauthorized(NoteId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between checks and writes.
    InconsistentState(&'static str),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "user not found"),
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::Unauthorized(id) => write!(f, "caller does not own note {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent note state: {details}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NoteNotFound(id),
            other => Self::Repo(other),
        }
    }
}

pub type NoteServiceResult<T> = Result<T, NoteServiceError>;

/// Note service facade over a repository and a summary scheduler.
pub struct NoteService<R: NoteRepository, S: SummaryScheduler> {
    repo: R,
    scheduler: S,
    policy: OwnershipPolicy,
}

impl<R: NoteRepository, S: SummaryScheduler> NoteService<R, S> {
    /// Creates a service with the default `Strict` ownership policy.
    pub fn new(repo: R, scheduler: S) -> Self {
        Self::with_policy(repo, scheduler, OwnershipPolicy::default())
    }

    pub fn with_policy(repo: R, scheduler: S, policy: OwnershipPolicy) -> Self {
        Self {
            repo,
            scheduler,
            policy,
        }
    }

    pub fn policy(&self) -> OwnershipPolicy {
        self.policy
    }

    /// Lists every note owned by the caller in storage order.
    ///
    /// Returns `Ok(None)` for unauthenticated callers.
    pub fn list_notes(&self, ctx: &RequestContext) -> NoteServiceResult<Option<Vec<Note>>> {
        let Some(user_id) = ctx.user_id() else {
            debug!("event=notes_list module=service status=skipped reason=unauthenticated");
            return Ok(None);
        };

        let notes = self.repo.list_notes_by_user(&user_id)?;
        debug!(
            "event=notes_list module=service status=ok count={}",
            notes.len()
        );
        Ok(Some(notes))
    }

    /// Filters the caller's notes by a case-insensitive substring of title
    /// or content. Only the empty query returns the full list.
    pub fn search_notes(
        &self,
        ctx: &RequestContext,
        query: &str,
    ) -> NoteServiceResult<Option<Vec<Note>>> {
        let Some(notes) = self.list_notes(ctx)? else {
            return Ok(None);
        };

        Ok(Some(
            notes
                .into_iter()
                .filter(|note| note.matches_text(query))
                .collect(),
        ))
    }

    /// Gets one note by id.
    ///
    /// Absent or unresolved ids return `Ok(None)`. Under `Strict`, notes
    /// owned by someone else are reported the same way.
    pub fn get_note(
        &self,
        ctx: &RequestContext,
        id: Option<NoteId>,
    ) -> NoteServiceResult<Option<Note>> {
        let Some(id) = id else {
            return Ok(None);
        };

        let Some(note) = self.repo.get_note(id)? else {
            return Ok(None);
        };

        match self.policy {
            OwnershipPolicy::Legacy => Ok(Some(note)),
            OwnershipPolicy::Strict => match ctx.user_id() {
                Some(user_id) if note.is_owned_by(&user_id) => Ok(Some(note)),
                _ => {
                    debug!("event=note_get module=service status=hidden note_id={id}");
                    Ok(None)
                }
            },
        }
    }

    /// Creates a note owned by the caller and returns its id.
    ///
    /// When `wants_summary` is set, a summary job is submitted after the
    /// insert; submission failures do not fail the call.
    pub fn create_note(
        &self,
        ctx: &RequestContext,
        title: impl Into<String>,
        content: impl Into<String>,
        wants_summary: bool,
    ) -> NoteServiceResult<NoteId> {
        let user_id = ctx.user_id().ok_or(NoteServiceError::Unauthenticated)?;
        let note = Note::new(user_id, title, content);
        let id = self.repo.insert_note(&note)?;
        info!(
            "event=note_create module=service status=ok note_id={id} summary_requested={wants_summary}"
        );

        if wants_summary {
            self.submit_summary(SummaryJob::new(id, note.title, note.content));
        }

        Ok(id)
    }

    /// Replaces title and content of a note owned by the caller.
    ///
    /// The owner field is never changed. A summary job is re-submitted only
    /// when the note already carried a summary.
    pub fn update_note(
        &self,
        ctx: &RequestContext,
        id: NoteId,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> NoteServiceResult<NoteId> {
        let existing = self
            .repo
            .get_note(id)?
            .ok_or(NoteServiceError::NoteNotFound(id))?;

        let user_id = self.require_owner(ctx, &existing)?;
        let title = title.into();
        let content = content.into();

        match self
            .repo
            .update_note_content(id, &user_id, title.as_str(), content.as_str())
        {
            Ok(()) => {}
            // Row vanished or changed owner between the check and the write.
            Err(RepoError::NotFound(_)) => {
                return Err(NoteServiceError::InconsistentState(
                    "note changed between ownership check and update",
                ));
            }
            Err(err) => return Err(err.into()),
        }
        info!(
            "event=note_update module=service status=ok note_id={id} resummarize={}",
            existing.has_summary()
        );

        if existing.has_summary() {
            self.submit_summary(SummaryJob::new(id, title, content));
        }

        Ok(id)
    }

    /// Permanently deletes a note.
    ///
    /// `Strict` requires an authenticated caller, an existing note, and
    /// ownership, checked in that order.
    /// `Legacy` deletes unconditionally and succeeds for unknown ids.
    pub fn delete_note(&self, ctx: &RequestContext, id: NoteId) -> NoteServiceResult<()> {
        if self.policy == OwnershipPolicy::Strict {
            if !ctx.is_authenticated() {
                return Err(NoteServiceError::Unauthenticated);
            }
            let existing = self
                .repo
                .get_note(id)?
                .ok_or(NoteServiceError::NoteNotFound(id))?;
            self.require_owner(ctx, &existing)?;
        }

        let removed = self.repo.delete_note(id)?;
        info!(
            "event=note_delete module=service status=ok note_id={id} policy={} removed={removed}",
            self.policy.as_str()
        );
        Ok(())
    }

    /// Writes a finished summary back onto a note.
    ///
    /// Fails with `NoteNotFound` when the note was deleted meanwhile. Never
    /// submits a new summary job.
    pub fn apply_summary(&self, id: NoteId, summary: &str) -> NoteServiceResult<()> {
        self.repo.set_note_summary(id, summary)?;
        info!("event=note_summary module=service status=ok note_id={id}");
        Ok(())
    }

    /// Unauthenticated callers are reported as `Unauthorized`, matching the
    /// update contract where a missing identity never equals an owner.
    fn require_owner(&self, ctx: &RequestContext, note: &Note) -> NoteServiceResult<UserId> {
        match ctx.user_id() {
            Some(user_id) if note.is_owned_by(&user_id) => Ok(user_id),
            caller => {
                let reason = if caller.is_some() {
                    "not_owner"
                } else {
                    "unauthenticated"
                };
                warn!(
                    "event=note_auth module=service status=denied reason={reason} note_id={}",
                    note.id
                );
                Err(NoteServiceError::Unauthorized(note.id))
            }
        }
    }

    fn submit_summary(&self, job: SummaryJob) {
        let note_id = job.note_id;
        match self.scheduler.schedule(job) {
            Ok(()) => debug!("event=summary_enqueue module=service status=ok note_id={note_id}"),
            Err(err) => warn!(
                "event=summary_enqueue module=service status=error note_id={note_id} error={err}"
            ),
        }
    }
}
