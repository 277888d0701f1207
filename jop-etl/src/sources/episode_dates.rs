//! Episode/date list normalizer
//!
//! The source is a free-text file, one episode per line:
//!
//! ```text
//! "A Walk in the Woods" (January 11, 1983)
//! ```
//!
//! Lines that do not match the shape, or whose date fails to parse against
//! the month-name/day/year format, are skipped and reported.

use super::Normalized;
use chrono::NaiveDate;
use regex::Regex;
use tracing::warn;

/// Canonical record for one episode/date line
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeDateRecord {
    pub title: String,
    pub air_date: NaiveDate,
}

/// Normalizer for the episode/date list
pub struct EpisodeDateSource {
    line_re: Regex,
}

impl EpisodeDateSource {
    pub fn new() -> Self {
        Self {
            // quoted title followed by a parenthesized date
            line_re: Regex::new(r#"^"([^"]+)"\s*\(([^)]+)\)"#).expect("valid episode line regex"),
        }
    }

    /// Normalize the whole source, one record per well-formed line
    pub fn normalize(&self, raw: &str) -> Normalized<EpisodeDateRecord> {
        let mut records = Vec::new();
        let mut skipped = 0;

        for line in raw.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let captures = match self.line_re.captures(line) {
                Some(c) => c,
                None => {
                    warn!(line, "Skipping episode line: does not match title/date shape");
                    skipped += 1;
                    continue;
                }
            };

            let title = captures[1].trim().to_string();
            let date_str = captures[2].trim();

            match NaiveDate::parse_from_str(date_str, "%B %d, %Y") {
                Ok(air_date) => records.push(EpisodeDateRecord { title, air_date }),
                Err(_) => {
                    warn!(line, date = date_str, "Skipping episode line: unparsable air date");
                    skipped += 1;
                }
            }
        }

        Normalized { records, skipped }
    }
}

impl Default for EpisodeDateSource {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_line() {
        let source = EpisodeDateSource::new();
        let out = source.normalize("\"A Walk in the Woods\" (January 11, 1983)\n");

        assert_eq!(out.skipped, 0);
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].title, "A Walk in the Woods");
        assert_eq!(
            out.records[0].air_date,
            NaiveDate::from_ymd_opt(1983, 1, 11).unwrap()
        );
    }

    #[test]
    fn skips_malformed_line_without_aborting() {
        let source = EpisodeDateSource::new();
        let raw = "not an episode line\n\"Mount McKinley\" (January 11, 1983)\n";
        let out = source.normalize(raw);

        assert_eq!(out.skipped, 1);
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].title, "Mount McKinley");
    }

    #[test]
    fn skips_unparsable_date() {
        let source = EpisodeDateSource::new();
        let out = source.normalize("\"Winter Frost\" (Januberry 99, 1983)\n");

        assert_eq!(out.skipped, 1);
        assert!(out.records.is_empty());
    }

    #[test]
    fn blank_lines_are_not_diagnostics() {
        let source = EpisodeDateSource::new();
        let out = source.normalize("\n\n\"Quiet Stream\" (July 4, 1987)\n\n");

        assert_eq!(out.skipped, 0);
        assert_eq!(out.records.len(), 1);
    }
}
