//! Source normalizers
//!
//! Each normalizer is a pure transform from one raw source to canonical
//! in-memory records. Malformed lines and rows are skipped with a diagnostic
//! and counted; a bad record never aborts the run. No identity resolution
//! and no persistence happens here.

use thiserror::Error;

pub mod colors_used;
pub mod episode_dates;
pub mod subject_matter;

pub use colors_used::{ColorsUsedRecord, ColorsUsedSource, PaletteEntry};
pub use episode_dates::{EpisodeDateRecord, EpisodeDateSource};
pub use subject_matter::{SubjectMatterRecord, SubjectMatterSource};

/// Source normalization errors
///
/// Only structural failures surface here (a source whose header row cannot
/// be read at all). Per-record problems are diagnostics, not errors.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source's header row is missing or unreadable
    #[error("Unreadable source header: {0}")]
    Header(String),
}

/// A normalized source: the canonical records plus a skip count for
/// records that failed normalization
#[derive(Debug)]
pub struct Normalized<T> {
    pub records: Vec<T>,
    pub skipped: usize,
}

/// Literal flag value marking presence in the wide-format sources
pub(crate) const PRESENT_FLAG: &str = "1";

/// Parse a Python-style literal list such as `['Bright Red', 'Titanium White']`
///
/// The raw field may contain stray carriage returns and newlines. Entries
/// are stripped of brackets, quotes, and surrounding whitespace; empty
/// entries are dropped.
pub(crate) fn parse_literal_list(raw: &str) -> Vec<String> {
    let cleaned: String = raw.chars().filter(|c| *c != '\r' && *c != '\n').collect();
    let trimmed = cleaned.trim().trim_start_matches('[').trim_end_matches(']');

    trimmed
        .split(',')
        .map(|entry| entry.trim_matches(|c: char| matches!(c, '[' | ']' | '\'' | '"') || c.is_whitespace()))
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Clean a wide-format header name the way the catalog schema expects it:
/// trimmed, spaces/hyphens/slashes collapsed to underscores, parentheses
/// and embedded line breaks dropped.
pub(crate) fn clean_column_name(name: &str) -> String {
    name.trim()
        .chars()
        .filter(|c| !matches!(c, '\r' | '\n' | '(' | ')'))
        .map(|c| match c {
            ' ' | '-' | '/' => '_',
            other => other,
        })
        .collect()
}
