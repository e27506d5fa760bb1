use notekeep_core::db::open_db_in_memory;
use notekeep_core::{Note, NoteRepository, RepoError, SqliteNoteRepository, UserId};
use rusqlite::Connection;
use uuid::Uuid;

fn alice() -> UserId {
    UserId::new("user_alice")
}

fn bob() -> UserId {
    UserId::new("user_bob")
}

#[test]
fn insert_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let note = Note::new(alice(), "Groceries", "milk, eggs");
    let id = repo.insert_note(&note).unwrap();
    assert_eq!(id, note.id);

    let loaded = repo.get_note(id).unwrap().unwrap();
    assert_eq!(loaded.user_id, alice());
    assert_eq!(loaded.title, "Groceries");
    assert_eq!(loaded.content, "milk, eggs");
    assert!(loaded.summary.is_none());
    assert!(loaded.created_at > 0);
}

#[test]
fn get_unknown_id_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    assert!(repo.get_note(Uuid::new_v4()).unwrap().is_none());
}

#[test]
fn list_by_user_filters_owner_and_keeps_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let first = Note::new(alice(), "first", "a");
    let foreign = Note::new(bob(), "foreign", "b");
    let second = Note::new(alice(), "second", "c");
    repo.insert_note(&first).unwrap();
    repo.insert_note(&foreign).unwrap();
    repo.insert_note(&second).unwrap();

    let listed = repo.list_notes_by_user(&alice()).unwrap();
    let ids = listed.iter().map(|note| note.id).collect::<Vec<_>>();
    assert_eq!(ids, vec![first.id, second.id]);

    let nobody = repo
        .list_notes_by_user(&UserId::new("user_nobody"))
        .unwrap();
    assert!(nobody.is_empty());
}

#[test]
fn update_content_keeps_owner_and_summary() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let note = Note::new(alice(), "draft", "body");
    repo.insert_note(&note).unwrap();
    repo.set_note_summary(note.id, "old summary").unwrap();

    repo.update_note_content(note.id, &alice(), "final", "new body")
        .unwrap();

    let loaded = repo.get_note(note.id).unwrap().unwrap();
    assert_eq!(loaded.id, note.id);
    assert_eq!(loaded.user_id, alice());
    assert_eq!(loaded.title, "final");
    assert_eq!(loaded.content, "new body");
    assert_eq!(loaded.summary.as_deref(), Some("old summary"));
}

#[test]
fn update_content_requires_matching_owner() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let note = Note::new(alice(), "mine", "body");
    repo.insert_note(&note).unwrap();

    let err = repo
        .update_note_content(note.id, &bob(), "hack", "hack")
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == note.id));

    let loaded = repo.get_note(note.id).unwrap().unwrap();
    assert_eq!(loaded.title, "mine");
}

#[test]
fn set_summary_on_missing_note_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let missing = Uuid::new_v4();
    let err = repo.set_note_summary(missing, "text").unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == missing));
}

#[test]
fn delete_reports_whether_a_row_was_removed() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let note = Note::new(alice(), "temp", "body");
    repo.insert_note(&note).unwrap();

    assert!(repo.delete_note(note.id).unwrap());
    assert!(!repo.delete_note(note.id).unwrap());
    assert!(repo.get_note(note.id).unwrap().is_none());
}

#[test]
fn repository_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteNoteRepository::try_new(&conn);
    assert!(matches!(result, Err(RepoError::MissingRequiredTable("notes"))));
}

#[test]
fn repository_rejects_table_missing_columns() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("CREATE TABLE notes (uuid TEXT PRIMARY KEY, user_id TEXT);")
        .unwrap();

    let result = SqliteNoteRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "notes",
            column: "title"
        })
    ));
}

#[test]
fn read_rejects_corrupted_uuid() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO notes (uuid, user_id, title, content) VALUES ('not-a-uuid', 'user_alice', 't', 'c');",
        [],
    )
    .unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let err = repo.list_notes_by_user(&alice()).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}
