//! Subject-matter table normalizer
//!
//! Wide-format CSV: identity columns `EPISODE` (a code of the form
//! `S<season>E<episode>`) and `TITLE`, then one boolean flag column per
//! subject name.

use super::{clean_column_name, Normalized, SourceError, PRESENT_FLAG};
use regex::Regex;
use tracing::warn;

const RESERVED_COLUMNS: [&str; 2] = ["EPISODE", "TITLE"];

/// Canonical record for one subject-matter row
#[derive(Debug, Clone)]
pub struct SubjectMatterRecord {
    pub season: i64,
    pub episode: i64,
    pub title: String,
    /// Cleaned flag column names whose value equals the presence flag
    pub flagged_columns: Vec<String>,
}

/// Normalizer for the subject-matter table
pub struct SubjectMatterSource {
    code_re: Regex,
}

impl SubjectMatterSource {
    pub fn new() -> Self {
        Self {
            code_re: Regex::new(r"^S(\d+)E(\d+)$").expect("valid episode code regex"),
        }
    }

    /// Normalize the whole source, one record per well-formed row
    pub fn normalize(&self, raw: &str) -> Result<Normalized<SubjectMatterRecord>, SourceError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(raw.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| SourceError::Header(e.to_string()))?
            .iter()
            .map(clean_column_name)
            .collect();

        let column = |name: &str| headers.iter().position(|h| h.as_str() == name);
        let code_col = column("EPISODE")
            .ok_or_else(|| SourceError::Header("missing EPISODE column".to_string()))?;
        let title_col = column("TITLE")
            .ok_or_else(|| SourceError::Header("missing TITLE column".to_string()))?;

        let flag_columns: Vec<(usize, String)> = headers
            .iter()
            .enumerate()
            .filter(|(_, name)| !RESERVED_COLUMNS.contains(&name.as_str()))
            .map(|(idx, name)| (idx, name.clone()))
            .collect();

        let mut records = Vec::new();
        let mut skipped = 0;

        for row in reader.records() {
            let row = match row {
                Ok(row) => row,
                Err(e) => {
                    warn!(error = %e, "Skipping subject row: unreadable record");
                    skipped += 1;
                    continue;
                }
            };

            let field = |idx: usize| row.get(idx).unwrap_or("").trim();

            let code = field(code_col);
            let captures = match self.code_re.captures(code) {
                Some(c) => c,
                None => {
                    warn!(code, "Skipping subject row: unparsable episode code");
                    skipped += 1;
                    continue;
                }
            };

            // The regex only admits digits, so these parses cannot fail on
            // values that fit the integer range
            let (season, episode) = match (captures[1].parse(), captures[2].parse()) {
                (Ok(s), Ok(e)) => (s, e),
                _ => {
                    warn!(code, "Skipping subject row: season/episode out of range");
                    skipped += 1;
                    continue;
                }
            };

            let title = field(title_col).trim_matches('"').to_string();

            let flagged_columns = flag_columns
                .iter()
                .filter(|(idx, _)| field(*idx) == PRESENT_FLAG)
                .map(|(_, name)| name.clone())
                .collect();

            records.push(SubjectMatterRecord {
                season,
                episode,
                title,
                flagged_columns,
            });
        }

        Ok(Normalized { records, skipped })
    }
}

impl Default for SubjectMatterSource {
    fn default() -> Self {
        Self::new()
    }
}
