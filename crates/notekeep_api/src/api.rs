//! Client-facing note operations.
//!
//! # Responsibility
//! - Expose the note contract (list, get, create, update, delete, search) as
//!   string-in, envelope-out calls for UI clients.
//! - Own the DB location and the background summary worker for a host
//!   process.
//!
//! # Invariants
//! - Exported calls never panic; every failure becomes an envelope with
//!   `ok=false` and a message.
//! - Note ids cross the boundary as UUID strings.
//! - Caller identity is passed per call; the api keeps no session state.
//! - The process-wide runtime starts on first use and is configured at most
//!   once.

use log::warn;
use notekeep_core::db::open_db;
use notekeep_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    CoreConfig, ExtractiveSummarizer, Note, NoteId, NoteService, RequestContext,
    SqliteNoteRepository, SummaryWorker, WorkerReport, WorkerScheduler,
};
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::sync::Mutex;
use uuid::Uuid;

static RUNTIME: OnceCell<NoteApi> = OnceCell::new();

/// Installs the process-wide runtime with explicit settings.
///
/// Must run before the first note call; later calls are rejected.
pub fn configure(config: CoreConfig) -> Result<(), String> {
    let mut created = false;
    RUNTIME.get_or_try_init(|| {
        created = true;
        NoteApi::open(config)
    })?;
    if created {
        Ok(())
    } else {
        Err("note runtime already started".to_string())
    }
}

fn runtime() -> Result<&'static NoteApi, String> {
    RUNTIME.get_or_try_init(NoteApi::from_env)
}

/// Lists the caller's notes using the process-wide runtime.
pub fn list_notes_for_caller(subject: Option<String>) -> NotesResponse {
    match runtime() {
        Ok(api) => api.list_notes_for_caller(subject),
        Err(err) => notes_failure(err),
    }
}

/// Filters the caller's notes using the process-wide runtime.
pub fn search_notes(subject: Option<String>, query: String) -> NotesResponse {
    match runtime() {
        Ok(api) => api.search_notes(subject, query),
        Err(err) => notes_failure(err),
    }
}

/// Gets one note using the process-wide runtime.
pub fn get_note_by_id(subject: Option<String>, id: Option<String>) -> NoteResponse {
    match runtime() {
        Ok(api) => api.get_note_by_id(subject, id),
        Err(err) => NoteResponse {
            ok: false,
            note: None,
            message: err,
        },
    }
}

/// Creates a note using the process-wide runtime.
pub fn create_note(
    subject: Option<String>,
    title: String,
    content: String,
    wants_summary: bool,
) -> ActionResponse {
    match runtime() {
        Ok(api) => api.create_note(subject, title, content, wants_summary),
        Err(err) => ActionResponse::failure(err),
    }
}

/// Updates a note using the process-wide runtime.
pub fn update_note(
    subject: Option<String>,
    id: String,
    title: String,
    content: String,
) -> ActionResponse {
    match runtime() {
        Ok(api) => api.update_note(subject, id, title, content),
        Err(err) => ActionResponse::failure(err),
    }
}

/// Deletes a note using the process-wide runtime.
pub fn delete_note(subject: Option<String>, id: String) -> ActionResponse {
    match runtime() {
        Ok(api) => api.delete_note(subject, id),
        Err(err) => ActionResponse::failure(err),
    }
}

/// Drains pending summaries of the process-wide runtime, if it was started.
pub fn shutdown() -> WorkerReport {
    match RUNTIME.get() {
        Some(api) => api.shutdown(),
        None => WorkerReport::default(),
    }
}

/// Minimal health-check API.
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Core crate version.
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// Returns an empty string on success and the error message on failure.
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Serializes an envelope as pretty JSON for text transports.
pub fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|err| {
        format!("{{\"ok\":false,\"message\":\"serialization failed: {err}\"}}")
    })
}

/// Note shape returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteItem {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<Note> for NoteItem {
    fn from(note: Note) -> Self {
        Self {
            id: note.id.to_string(),
            user_id: note.user_id.to_string(),
            title: note.title,
            content: note.content,
            summary: note.summary,
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }
}

/// Envelope for list/search calls.
///
/// `items` is `None` for unauthenticated callers, which clients render as
/// "nothing to show" rather than as an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotesResponse {
    pub ok: bool,
    pub items: Option<Vec<NoteItem>>,
    pub message: String,
}

/// Envelope for single-note reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteResponse {
    pub ok: bool,
    pub note: Option<NoteItem>,
    pub message: String,
}

/// Envelope for mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    pub ok: bool,
    pub note_id: Option<String>,
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, note_id: Option<NoteId>) -> Self {
        Self {
            ok: true,
            note_id: note_id.map(|id| id.to_string()),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            note_id: None,
            message: message.into(),
        }
    }
}

type ApiService<'conn, 'sched> =
    NoteService<SqliteNoteRepository<'conn>, &'sched WorkerScheduler>;

/// Process-level handle binding config, storage and the summary worker.
pub struct NoteApi {
    config: CoreConfig,
    scheduler: WorkerScheduler,
    worker: Mutex<Option<SummaryWorker>>,
}

impl NoteApi {
    /// Opens the api with config read from the environment.
    pub fn from_env() -> Result<Self, String> {
        let config = CoreConfig::from_env().map_err(|err| err.to_string())?;
        Self::open(config)
    }

    /// Opens the database (running migrations) and starts the summary worker.
    pub fn open(config: CoreConfig) -> Result<Self, String> {
        let worker_conn = open_db(&config.db_path)
            .map_err(|err| format!("note DB open failed: {err}"))?;
        let worker = SummaryWorker::spawn(
            worker_conn,
            ExtractiveSummarizer::new(config.summary_max_chars),
        )
        .map_err(|err| format!("summary worker start failed: {err}"))?;

        Ok(Self {
            config,
            scheduler: worker.scheduler(),
            worker: Mutex::new(Some(worker)),
        })
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Lists the caller's notes.
    pub fn list_notes_for_caller(&self, subject: Option<String>) -> NotesResponse {
        let ctx = RequestContext::from_subject(subject);
        match self.with_service(|service| {
            service.list_notes(&ctx).map_err(|err| err.to_string())
        }) {
            Ok(items) => notes_success(items),
            Err(err) => notes_failure(format!("list_notes failed: {err}")),
        }
    }

    /// Filters the caller's notes by case-insensitive title/content text.
    pub fn search_notes(&self, subject: Option<String>, query: String) -> NotesResponse {
        let ctx = RequestContext::from_subject(subject);
        match self.with_service(|service| {
            service
                .search_notes(&ctx, query.as_str())
                .map_err(|err| err.to_string())
        }) {
            Ok(items) => notes_success(items),
            Err(err) => notes_failure(format!("search_notes failed: {err}")),
        }
    }

    /// Gets one note. Absent, malformed, or unknown ids yield `note=None`.
    pub fn get_note_by_id(&self, subject: Option<String>, id: Option<String>) -> NoteResponse {
        let ctx = RequestContext::from_subject(subject);
        let note_id = id.as_deref().and_then(parse_note_id_lenient);
        match self.with_service(|service| {
            service
                .get_note(&ctx, note_id)
                .map_err(|err| err.to_string())
        }) {
            Ok(Some(note)) => NoteResponse {
                ok: true,
                note: Some(note.into()),
                message: "Note found.".to_string(),
            },
            Ok(None) => NoteResponse {
                ok: true,
                note: None,
                message: "No note.".to_string(),
            },
            Err(err) => NoteResponse {
                ok: false,
                note: None,
                message: format!("get_note failed: {err}"),
            },
        }
    }

    /// Creates a note for the caller, optionally requesting a summary.
    pub fn create_note(
        &self,
        subject: Option<String>,
        title: String,
        content: String,
        wants_summary: bool,
    ) -> ActionResponse {
        let ctx = RequestContext::from_subject(subject);
        match self.with_service(|service| {
            service
                .create_note(&ctx, title, content, wants_summary)
                .map_err(|err| err.to_string())
        }) {
            Ok(id) => ActionResponse::success("Note created.", Some(id)),
            Err(err) => ActionResponse::failure(format!("create_note failed: {err}")),
        }
    }

    /// Replaces title/content of a note the caller owns.
    pub fn update_note(
        &self,
        subject: Option<String>,
        id: String,
        title: String,
        content: String,
    ) -> ActionResponse {
        let note_id = match parse_note_id(id.as_str()) {
            Ok(note_id) => note_id,
            Err(err) => return ActionResponse::failure(format!("update_note failed: {err}")),
        };
        let ctx = RequestContext::from_subject(subject);
        match self.with_service(|service| {
            service
                .update_note(&ctx, note_id, title, content)
                .map_err(|err| err.to_string())
        }) {
            Ok(id) => ActionResponse::success("Note updated.", Some(id)),
            Err(err) => ActionResponse::failure(format!("update_note failed: {err}")),
        }
    }

    /// Deletes a note according to the configured ownership policy.
    pub fn delete_note(&self, subject: Option<String>, id: String) -> ActionResponse {
        let note_id = match parse_note_id(id.as_str()) {
            Ok(note_id) => note_id,
            Err(err) => return ActionResponse::failure(format!("delete_note failed: {err}")),
        };
        let ctx = RequestContext::from_subject(subject);
        match self.with_service(|service| {
            service
                .delete_note(&ctx, note_id)
                .map_err(|err| err.to_string())
        }) {
            Ok(()) => ActionResponse::success("Note deleted.", Some(note_id)),
            Err(err) => ActionResponse::failure(format!("delete_note failed: {err}")),
        }
    }

    /// Stops the summary worker after it drains submitted jobs.
    ///
    /// Later summary requests are dropped with a logged warning; notes are
    /// still saved. Calling this twice returns an empty report.
    pub fn shutdown(&self) -> WorkerReport {
        let worker = self
            .worker
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        match worker {
            Some(worker) => worker.shutdown(),
            None => WorkerReport::default(),
        }
    }

    fn with_service<T>(
        &self,
        f: impl FnOnce(&ApiService<'_, '_>) -> Result<T, String>,
    ) -> Result<T, String> {
        let conn = open_db(&self.config.db_path)
            .map_err(|err| format!("note DB open failed: {err}"))?;
        let repo = SqliteNoteRepository::try_new(&conn)
            .map_err(|err| format!("note repo init failed: {err}"))?;
        let service =
            NoteService::with_policy(repo, &self.scheduler, self.config.ownership_policy);
        f(&service)
    }
}

fn notes_success(items: Option<Vec<Note>>) -> NotesResponse {
    let message = match items.as_ref() {
        None => "Not signed in.".to_string(),
        Some(notes) if notes.is_empty() => "No notes.".to_string(),
        Some(notes) => format!("Found {} note(s).", notes.len()),
    };
    NotesResponse {
        ok: true,
        items: items.map(|notes| notes.into_iter().map(NoteItem::from).collect()),
        message,
    }
}

fn notes_failure(message: String) -> NotesResponse {
    NotesResponse {
        ok: false,
        items: None,
        message,
    }
}

fn parse_note_id(value: &str) -> Result<NoteId, String> {
    Uuid::parse_str(value.trim()).map_err(|_| format!("invalid note id `{}`", value.trim()))
}

fn parse_note_id_lenient(value: &str) -> Option<NoteId> {
    match parse_note_id(value) {
        Ok(id) => Some(id),
        Err(err) => {
            warn!("event=note_get module=api status=skipped reason=invalid_id error={err}");
            None
        }
    }
}
