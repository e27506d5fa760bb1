//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD persistence APIs over the `notes` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `user_id` is written once by `insert_note` and never by any update path.
//! - Content updates never touch `summary`; summary writes never touch
//!   title/content.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Listing returns rows in insertion order (`rowid ASC`).

use crate::db::DbError;
use crate::model::note::{Note, NoteId, UserId};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const NOTE_SELECT_SQL: &str = "SELECT
    uuid,
    user_id,
    title,
    content,
    summary,
    created_at,
    updated_at
FROM notes";

const REQUIRED_NOTE_COLUMNS: &[&str] = &[
    "uuid",
    "user_id",
    "title",
    "content",
    "summary",
    "created_at",
    "updated_at",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for note persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(NoteId),
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing; run migrations first")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "required column `{table}.{column}` is missing; run migrations first"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for note persistence.
pub trait NoteRepository {
    /// Persists a new note and returns its stable id.
    fn insert_note(&self, note: &Note) -> RepoResult<NoteId>;
    /// Gets one note by id regardless of owner.
    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// Lists all notes owned by `user_id` in insertion order.
    fn list_notes_by_user(&self, user_id: &UserId) -> RepoResult<Vec<Note>>;
    /// Replaces title and content of a note owned by `owner`.
    ///
    /// Returns `NotFound` when no row matches both id and owner.
    fn update_note_content(
        &self,
        id: NoteId,
        owner: &UserId,
        title: &str,
        content: &str,
    ) -> RepoResult<()>;
    /// Writes a derived summary onto an existing note.
    fn set_note_summary(&self, id: NoteId, summary: &str) -> RepoResult<()>;
    /// Permanently deletes a note. Returns whether a row was removed.
    fn delete_note(&self, id: NoteId) -> RepoResult<bool>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// Fails fast when the `notes` schema is missing, so callers that skipped
    /// `open_db` get a clear error instead of SQL failures later.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_note_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn insert_note(&self, note: &Note) -> RepoResult<NoteId> {
        self.conn.execute(
            "INSERT INTO notes (uuid, user_id, title, content, summary)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                note.id.to_string(),
                note.user_id.as_str(),
                note.title.as_str(),
                note.content.as_str(),
                note.summary.as_deref(),
            ],
        )?;

        Ok(note.id)
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_note_row(row)?));
        }

        Ok(None)
    }

    fn list_notes_by_user(&self, user_id: &UserId) -> RepoResult<Vec<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL} WHERE user_id = ?1 ORDER BY rowid ASC;"
        ))?;

        let mut rows = stmt.query([user_id.as_str()])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }

        Ok(notes)
    }

    fn update_note_content(
        &self,
        id: NoteId,
        owner: &UserId,
        title: &str,
        content: &str,
    ) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE notes
             SET
                title = ?3,
                content = ?4,
                updated_at = (CAST((julianday('now') - 2440587.5) * 86400000 AS INTEGER))
             WHERE uuid = ?1
               AND user_id = ?2;",
            params![id.to_string(), owner.as_str(), title, content],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn set_note_summary(&self, id: NoteId, summary: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE notes
             SET
                summary = ?2,
                updated_at = (CAST((julianday('now') - 2440587.5) * 86400000 AS INTEGER))
             WHERE uuid = ?1;",
            params![id.to_string(), summary],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn delete_note(&self, id: NoteId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM notes WHERE uuid = ?1;", [id.to_string()])?;
        Ok(changed > 0)
    }
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in notes.uuid"))
    })?;

    let user_id: String = row.get("user_id")?;
    if user_id.trim().is_empty() {
        return Err(RepoError::InvalidData(format!(
            "empty owner in notes.user_id for note {id}"
        )));
    }

    Ok(Note {
        id,
        user_id: UserId::new(user_id),
        title: row.get("title")?,
        content: row.get("content")?,
        summary: row.get("summary")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn ensure_note_connection_ready(conn: &Connection) -> RepoResult<()> {
    if !table_exists(conn, "notes")? {
        return Err(RepoError::MissingRequiredTable("notes"));
    }

    for &column in REQUIRED_NOTE_COLUMNS {
        if !table_has_column(conn, "notes", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "notes",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
