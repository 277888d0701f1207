//! Colors-used table normalizer
//!
//! Wide-format CSV: one row per episode with identity columns (painting
//! index/title, season, episode, media URLs), literal-list columns holding
//! the exact color names and hex codes used in that episode, and one
//! boolean flag column per abbreviated color name.

use super::{clean_column_name, parse_literal_list, Normalized, SourceError, PRESENT_FLAG};
use tracing::warn;

/// Identity and list columns; everything else in the header is a color flag
const RESERVED_COLUMNS: [&str; 9] = [
    "painting_index",
    "img_src",
    "painting_title",
    "season",
    "episode",
    "num_colors",
    "youtube_src",
    "colors",
    "color_hex",
];

/// One exact color name with its hex code, zipped from the literal lists
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteEntry {
    pub name: String,
    pub hex_code: String,
}

/// Canonical record for one colors-used row
#[derive(Debug, Clone)]
pub struct ColorsUsedRecord {
    pub title: String,
    pub season: i64,
    pub episode: i64,
    pub youtube_url: Option<String>,
    pub image_url: Option<String>,
    /// Exact color names and hex codes from the literal-list columns
    pub palette: Vec<PaletteEntry>,
    /// Cleaned flag column names whose value equals the presence flag
    pub flagged_columns: Vec<String>,
}

/// Normalizer for the colors-used table
pub struct ColorsUsedSource;

impl ColorsUsedSource {
    pub fn new() -> Self {
        Self
    }

    /// Normalize the whole source, one record per well-formed row
    pub fn normalize(&self, raw: &str) -> Result<Normalized<ColorsUsedRecord>, SourceError> {
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
        let title_col = column("painting_title")
            .ok_or_else(|| SourceError::Header("missing painting_title column".to_string()))?;
        let season_col = column("season")
            .ok_or_else(|| SourceError::Header("missing season column".to_string()))?;
        let episode_col = column("episode")
            .ok_or_else(|| SourceError::Header("missing episode column".to_string()))?;
        let youtube_col = column("youtube_src");
        let image_col = column("img_src");
        let colors_col = column("colors");
        let hex_col = column("color_hex");

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
                    warn!(error = %e, "Skipping colors row: unreadable record");
                    skipped += 1;
                    continue;
                }
            };

            let field = |idx: usize| row.get(idx).unwrap_or("").trim();

            let title = field(title_col).to_string();
            let (season, episode) = match (field(season_col).parse(), field(episode_col).parse()) {
                (Ok(s), Ok(e)) => (s, e),
                _ => {
                    warn!(title = %title, "Skipping colors row: non-numeric season/episode");
                    skipped += 1;
                    continue;
                }
            };

            let palette = match (colors_col, hex_col) {
                (Some(names_idx), Some(hex_idx)) => {
                    let names = parse_literal_list(field(names_idx));
                    let hexes = parse_literal_list(field(hex_idx));
                    names
                        .into_iter()
                        .zip(hexes)
                        .map(|(name, hex_code)| PaletteEntry { name, hex_code })
                        .collect()
                }
                _ => Vec::new(),
            };

            let flagged_columns = flag_columns
                .iter()
                .filter(|(idx, _)| field(*idx) == PRESENT_FLAG)
                .map(|(_, name)| name.clone())
                .collect();

            let optional = |idx: Option<usize>| {
                idx.map(|i| field(i)).filter(|v| !v.is_empty()).map(str::to_string)
            };

            records.push(ColorsUsedRecord {
                title,
                season,
                episode,
                youtube_url: optional(youtube_col),
                image_url: optional(image_col),
                palette,
                flagged_columns,
            });
        }

        Ok(Normalized { records, skipped })
    }
}

impl Default for ColorsUsedSource {
    fn default() -> Self {
        Self::new()
    }
}
