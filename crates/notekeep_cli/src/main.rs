//! Command-line client for the note store.
//!
//! # Responsibility
//! - Map subcommands onto `notekeep_api` calls.
//! - Print JSON envelopes so output can be piped into other tools.
//!
//! Exit status is non-zero when the envelope reports `ok=false`.

use clap::{Parser, Subcommand};
use notekeep_api::{
    configure, core_version, create_note, delete_note, get_note_by_id, init_logging_from_config,
    list_notes_for_caller, ping, search_notes, shutdown, to_json, update_note, CoreConfig,
};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "notekeep", version, about = "Personal notes with optional summaries")]
struct Cli {
    /// Caller subject; commands run anonymously when omitted.
    #[arg(long, global = true, env = "NOTEKEEP_USER")]
    user: Option<String>,

    /// Database file, overriding NOTEKEEP_DB_PATH.
    #[arg(long, global = true, value_name = "FILE")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the caller's notes.
    List,
    /// Show one note.
    Get { id: String },
    /// Create a note.
    Create {
        title: String,
        content: String,
        /// Request a generated summary.
        #[arg(long)]
        summary: bool,
    },
    /// Replace a note's title and content.
    Update {
        id: String,
        title: String,
        content: String,
    },
    /// Delete a note.
    Delete { id: String },
    /// Filter the caller's notes by title or content.
    Search { query: String },
    /// Print core version and health probe.
    Version,
}

#[derive(Serialize)]
struct VersionInfo {
    ok: bool,
    version: String,
    ping: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Command::Version = cli.command {
        return emit(true, &version_info());
    }

    let mut config = match CoreConfig::from_env() {
        Ok(config) => config,
        Err(err) => return fail(format!("config error: {err}")),
    };
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Err(err) = init_logging_from_config(&config) {
        eprintln!("logging disabled: {err}");
    }

    if let Err(err) = configure(config) {
        return fail(err);
    }

    let user = cli.user;
    let code = match cli.command {
        Command::List => {
            let response = list_notes_for_caller(user);
            emit(response.ok, &response)
        }
        Command::Get { id } => {
            let response = get_note_by_id(user, Some(id));
            emit(response.ok, &response)
        }
        Command::Create {
            title,
            content,
            summary,
        } => {
            let response = create_note(user, title, content, summary);
            emit(response.ok, &response)
        }
        Command::Update { id, title, content } => {
            let response = update_note(user, id, title, content);
            emit(response.ok, &response)
        }
        Command::Delete { id } => {
            let response = delete_note(user, id);
            emit(response.ok, &response)
        }
        Command::Search { query } => {
            let response = search_notes(user, query);
            emit(response.ok, &response)
        }
        Command::Version => emit(true, &version_info()),
    };

    // Pending summaries are written before the process exits.
    shutdown();
    code
}

fn version_info() -> VersionInfo {
    VersionInfo {
        ok: true,
        version: core_version(),
        ping: ping(),
    }
}

fn emit<T: Serialize>(ok: bool, value: &T) -> ExitCode {
    println!("{}", to_json(value));
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn fail(message: String) -> ExitCode {
    eprintln!("notekeep: {message}");
    ExitCode::FAILURE
}
