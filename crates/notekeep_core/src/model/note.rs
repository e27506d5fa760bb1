//! Note domain model.
//!
//! # Responsibility
//! - Define the persisted note record and its owner identity.
//! - Provide lifecycle helpers used by the service layer.
//!
//! # Invariants
//! - `id` is stable and never reused for another note.
//! - `user_id` is set once at creation and never changed by updates.
//! - `summary` stays `None` until a summarization job writes it back.

use serde::Serialize;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for every note.
pub type NoteId = Uuid;

/// Owner subject as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wraps a raw subject string.
    pub fn new(subject: impl Into<String>) -> Self {
        Self(subject.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonical persisted note record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    pub id: NoteId,
    /// Serialized as `userId` to match the client contract.
    #[serde(rename = "userId")]
    pub user_id: UserId,
    pub title: String,
    pub content: String,
    /// Derived text written by the summary pipeline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Unix epoch milliseconds, assigned by storage on insert.
    #[serde(rename = "createdAt")]
    pub created_at: i64,
    /// Unix epoch milliseconds of the last title/content/summary write.
    #[serde(rename = "updatedAt")]
    pub updated_at: i64,
}

impl Note {
    /// Creates a note with a generated stable ID and no summary.
    ///
    /// Timestamps are zero until storage assigns them.
    pub fn new(user_id: UserId, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), user_id, title, content)
    }

    /// Creates a note with a caller-provided stable ID.
    pub fn with_id(
        id: NoteId,
        user_id: UserId,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id,
            user_id,
            title: title.into(),
            content: content.into(),
            summary: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    /// Returns whether a non-empty summary has been written.
    ///
    /// An empty string counts as "no summary".
    pub fn has_summary(&self) -> bool {
        self.summary
            .as_deref()
            .is_some_and(|summary| !summary.is_empty())
    }

    /// Returns whether `user_id` owns this note.
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }

    /// Case-insensitive substring match against title or content.
    ///
    /// Only the empty needle matches every note; whitespace is matched
    /// literally.
    pub fn matches_text(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        let needle = needle.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.content.to_lowercase().contains(&needle)
    }
}

#[cfg(test)]
mod tests {
    use super::{Note, UserId};

    fn owner() -> UserId {
        UserId::new("user_a")
    }

    #[test]
    fn new_note_has_fresh_id_and_no_summary() {
        let first = Note::new(owner(), "Groceries", "milk, eggs");
        let second = Note::new(owner(), "Groceries", "milk, eggs");
        assert_ne!(first.id, second.id);
        assert!(first.summary.is_none());
        assert!(!first.has_summary());
    }

    #[test]
    fn empty_summary_is_treated_as_absent() {
        let mut note = Note::new(owner(), "t", "c");
        note.summary = Some(String::new());
        assert!(!note.has_summary());
        note.summary = Some("short".to_string());
        assert!(note.has_summary());
    }

    #[test]
    fn matches_text_is_case_insensitive_over_title_and_content() {
        let note = Note::new(owner(), "Groceries", "Milk, eggs");
        assert!(note.matches_text("groc"));
        assert!(note.matches_text("MILK"));
        assert!(note.matches_text(""));
        assert!(!note.matches_text("bread"));
    }

    #[test]
    fn matches_text_keeps_whitespace_in_needle() {
        let note = Note::new(owner(), "milk", "eggs");
        assert!(!note.matches_text("  "));
        assert!(!note.matches_text("milk "));

        let spaced = Note::new(owner(), "two  spaces", "x");
        assert!(spaced.matches_text("  "));
        assert!(spaced.matches_text("TWO  "));
    }

    #[test]
    fn serializes_with_client_field_names() {
        let note = Note::new(owner(), "t", "c");
        let json = serde_json::to_value(&note).expect("serialize note");
        assert_eq!(json["userId"], "user_a");
        assert!(json.get("summary").is_none());
        assert!(json.get("createdAt").is_some());
    }
}
