//! Client-facing contract for NoteKeep.
//! UI shells call into this crate; storage and summary rules live in
//! `notekeep_core`.

pub mod api;

pub use api::{
    configure, core_version, create_note, delete_note, get_note_by_id, init_logging,
    list_notes_for_caller, ping, search_notes, shutdown, to_json, update_note, ActionResponse,
    NoteApi, NoteItem, NoteResponse, NotesResponse,
};
pub use notekeep_core::{init_logging_from_config, CoreConfig, OwnershipPolicy, WorkerReport};
