//! Summarizer seam and the built-in extractive implementation.
//!
//! # Responsibility
//! - Abstract the external summary generator behind a trait.
//! - Provide a local extractive summarizer so the pipeline works offline.
//!
//! # Invariants
//! - `ExtractiveSummarizer` output never exceeds `max_chars` plus a
//!   three-char ellipsis.
//! - Markdown syntax is stripped before sentence selection.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Default summary budget in characters.
pub const DEFAULT_SUMMARY_MAX_CHARS: usize = 200;

static MARKDOWN_IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[[^\]]*]\(([^)]+)\)").expect("valid image regex"));
static MARKDOWN_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid link regex"));
static MARKDOWN_SYMBOL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\*_`#>~\[\]\(\)]+"#).expect("valid markdown symbol regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));
static SENTENCE_END_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?](\s|$)").expect("valid sentence regex"));

/// Summary generation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummarizeError {
    /// Nothing left to summarize after cleanup.
    EmptyInput,
    /// External backend failure.
    Backend(String),
}

impl Display for SummarizeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "note has no text to summarize"),
            Self::Backend(message) => write!(f, "summary backend failed: {message}"),
        }
    }
}

impl Error for SummarizeError {}

/// Produces a summary for one note snapshot.
pub trait Summarizer {
    fn summarize(&self, title: &str, content: &str) -> Result<String, SummarizeError>;
}

/// Picks leading sentences of the note body up to a character budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractiveSummarizer {
    max_chars: usize,
}

impl ExtractiveSummarizer {
    pub fn new(max_chars: usize) -> Self {
        Self {
            max_chars: max_chars.max(1),
        }
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }
}

impl Default for ExtractiveSummarizer {
    fn default() -> Self {
        Self::new(DEFAULT_SUMMARY_MAX_CHARS)
    }
}

impl Summarizer for ExtractiveSummarizer {
    fn summarize(&self, title: &str, content: &str) -> Result<String, SummarizeError> {
        let body = plain_text(content);
        // Title-only notes still get a summary.
        let source = if body.is_empty() {
            plain_text(title)
        } else {
            body
        };
        if source.is_empty() {
            return Err(SummarizeError::EmptyInput);
        }

        Ok(leading_sentences(&source, self.max_chars))
    }
}

/// Strips markdown syntax and collapses whitespace.
pub fn plain_text(markdown: &str) -> String {
    let without_images = MARKDOWN_IMAGE_RE.replace_all(markdown, " ");
    let without_links = MARKDOWN_LINK_RE.replace_all(&without_images, "$1");
    let without_symbols = MARKDOWN_SYMBOL_RE.replace_all(&without_links, " ");
    let normalized = WHITESPACE_RE.replace_all(&without_symbols, " ");
    normalized.trim().to_string()
}

fn leading_sentences(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut summary = "";

    for sentence_end in SENTENCE_END_RE.find_iter(text) {
        // Keep the punctuation, drop the trailing space.
        let candidate = text[..=sentence_end.start()].trim();
        if candidate.chars().count() > max_chars {
            break;
        }
        summary = candidate;
    }

    if summary.is_empty() {
        return truncate_chars(text, max_chars);
    }
    summary.to_string()
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut truncated = text.chars().take(max_chars).collect::<String>();
    truncated.truncate(truncated.trim_end().len());
    truncated.push_str("...");
    truncated
}

#[cfg(test)]
mod tests {
    use super::{plain_text, ExtractiveSummarizer, SummarizeError, Summarizer};

    #[test]
    fn plain_text_strips_markdown_and_keeps_link_labels() {
        let text = plain_text("# Title\n\n- [docs](https://example.com) **bold** ![x](a.png)");
        assert!(!text.contains('#'));
        assert!(!text.contains('*'));
        assert!(!text.contains("a.png"));
        assert!(text.contains("docs"));
    }

    #[test]
    fn keeps_whole_sentences_within_budget() {
        let summarizer = ExtractiveSummarizer::new(40);
        let summary = summarizer
            .summarize("t", "First point here. Second point follows. Third is long enough.")
            .expect("summary");
        assert_eq!(summary, "First point here. Second point follows.");
    }

    #[test]
    fn truncates_when_first_sentence_exceeds_budget() {
        let summarizer = ExtractiveSummarizer::new(10);
        let summary = summarizer
            .summarize("t", "a very long opening sentence without a stop")
            .expect("summary");
        assert!(summary.ends_with("..."));
        assert!(summary.chars().count() <= 13);
    }

    #[test]
    fn falls_back_to_title_and_rejects_empty_notes() {
        let summarizer = ExtractiveSummarizer::default();
        assert_eq!(
            summarizer.summarize("Groceries", "   ").expect("summary"),
            "Groceries"
        );
        assert_eq!(
            summarizer.summarize(" ", "**"),
            Err(SummarizeError::EmptyInput)
        );
    }
}
