//! Ingestion pipeline orchestration
//!
//! Three dependency-ordered phases, each fully committed before the next:
//! (1) colors, (2) episodes, (3) links. A crash between phases leaves no
//! dangling link rows; re-running the whole pipeline from the start is the
//! recovery procedure. Every per-row failure is logged and skipped; no
//! single bad row aborts a run.

use crate::columns;
use crate::link::{EpisodeStore, EpisodeUpsert, RelationLinker};
use crate::resolve::{ColorResolver, SubjectResolver};
use crate::sources::{ColorsUsedSource, EpisodeDateSource, SubjectMatterSource};
use chrono::NaiveDate;
use jop_common::{Error, Result};
use sqlx::SqlitePool;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{info, warn};

/// Raw text of the three ingestion sources
#[derive(Debug, Clone)]
pub struct SourceSet {
    pub episode_dates: String,
    pub colors_used: String,
    pub subject_matter: String,
}

/// Per-run ingestion statistics
#[derive(Debug, Default)]
pub struct IngestStats {
    pub episode_lines_skipped: usize,
    pub colors_rows_skipped: usize,
    pub subject_rows_skipped: usize,
    pub colors_resolved: usize,
    pub subjects_resolved: usize,
    pub episodes_upserted: usize,
    pub episodes_appended: usize,
    pub color_links_created: usize,
    pub subject_links_created: usize,
    pub pairs_dropped: usize,
}

/// Run the full ingestion pipeline against an open catalog database
pub async fn run_pipeline(db: &SqlitePool, sources: &SourceSet) -> Result<IngestStats> {
    let mut stats = IngestStats::default();

    // Normalize all three sources up front; the normalizers are pure and
    // report per-record diagnostics themselves
    let dates = EpisodeDateSource::new().normalize(&sources.episode_dates);
    let colors_rows = ColorsUsedSource::new()
        .normalize(&sources.colors_used)
        .map_err(|e| Error::Parse(e.to_string()))?;
    let subject_rows = SubjectMatterSource::new()
        .normalize(&sources.subject_matter)
        .map_err(|e| Error::Parse(e.to_string()))?;

    stats.episode_lines_skipped = dates.skipped;
    stats.colors_rows_skipped = colors_rows.skipped;
    stats.subject_rows_skipped = subject_rows.skipped;

    let mut colors = ColorResolver::new(db);
    let mut subjects = SubjectResolver::new(db);
    let mut episodes = EpisodeStore::new(db);
    let linker = RelationLinker::new(db);

    // Phase 1: colors
    for row in &colors_rows.records {
        for entry in &row.palette {
            if let Err(e) = colors.resolve(&entry.name, &entry.hex_code).await {
                warn!(color = %entry.name, error = %e, "Skipping color resolution");
            }
        }
    }
    stats.colors_resolved = colors.resolved_count();
    info!(colors = stats.colors_resolved, "Phase 1 complete: colors committed");

    // Phase 2: episodes
    //
    // The colors source carries the authoritative (season, episode)
    // identity; air dates attach by exact trimmed title match against the
    // episode-date list. The first date listed for a title wins when
    // titles repeat.
    let mut date_by_title: HashMap<&str, NaiveDate> = HashMap::new();
    for record in &dates.records {
        date_by_title.entry(record.title.as_str()).or_insert(record.air_date);
    }

    let mut matched_titles: HashSet<&str> = HashSet::new();
    for row in &colors_rows.records {
        let title = row.title.trim();
        let air_date = date_by_title.get(title).map(|d| d.format("%Y-%m-%d").to_string());
        if air_date.is_some() {
            matched_titles.insert(title);
        }

        let upsert = EpisodeUpsert {
            title: title.to_string(),
            season: row.season,
            episode: row.episode,
            air_date,
            youtube_url: row.youtube_url.clone(),
            image_url: row.image_url.clone(),
        };
        match episodes.upsert(&upsert).await {
            Ok(_) => stats.episodes_upserted += 1,
            Err(e) => {
                warn!(title, season = row.season, episode = row.episode, error = %e,
                      "Skipping episode upsert");
            }
        }
    }

    // Date-list lines with no wide-format counterpart still become
    // episodes, with sequential fallback identity (season 1, line
    // ordinal). An occupied identity is left untouched.
    for (ordinal, record) in dates.records.iter().enumerate() {
        if matched_titles.contains(record.title.as_str()) {
            continue;
        }
        let upsert = EpisodeUpsert {
            title: record.title.clone(),
            season: 1,
            episode: (ordinal + 1) as i64,
            air_date: Some(record.air_date.format("%Y-%m-%d").to_string()),
            youtube_url: None,
            image_url: None,
        };
        match episodes.insert_if_absent(&upsert).await {
            Ok(Some(_)) => stats.episodes_appended += 1,
            Ok(None) => {
                warn!(title = %record.title, ordinal = ordinal + 1,
                      "Dropping date-only episode: fallback identity already taken");
            }
            Err(e) => {
                warn!(title = %record.title, error = %e, "Skipping date-only episode insert");
            }
        }
    }
    info!(
        upserted = stats.episodes_upserted,
        appended = stats.episodes_appended,
        "Phase 2 complete: episodes committed"
    );

    // Phase 3: links
    //
    // Subjects are resolved before any linking so every link references an
    // already-committed entity.
    let subject_vocabulary: BTreeSet<&str> = subject_rows
        .records
        .iter()
        .flat_map(|row| row.flagged_columns.iter().map(String::as_str))
        .collect();
    for raw_name in subject_vocabulary {
        if let Err(e) = subjects.resolve(raw_name).await {
            warn!(subject = raw_name, error = %e, "Skipping subject resolution");
        }
    }
    stats.subjects_resolved = subjects.resolved_count();

    for row in &colors_rows.records {
        let episode_id = match episodes.lookup(row.season, row.episode).await {
            Ok(Some(guid)) => guid,
            Ok(None) => {
                warn!(season = row.season, episode = row.episode,
                      "Dropping color links: episode not resolved");
                stats.pairs_dropped += row.palette.len() + row.flagged_columns.len();
                continue;
            }
            Err(e) => {
                warn!(season = row.season, episode = row.episode, error = %e,
                      "Dropping color links: episode lookup failed");
                continue;
            }
        };

        // Exact names from the literal palette lists
        for entry in &row.palette {
            match colors.find_exact(&entry.name) {
                Some(color_id) => {
                    let color_id = color_id.to_string();
                    match linker.link_color(&episode_id, &color_id).await {
                        Ok(true) => stats.color_links_created += 1,
                        Ok(false) => {}
                        Err(e) => warn!(color = %entry.name, error = %e, "Skipping color link"),
                    }
                }
                None => {
                    warn!(color = %entry.name, "Dropping color link: name not resolved");
                    stats.pairs_dropped += 1;
                }
            }
        }

        // Abbreviated flag columns: configured mapping first, substring
        // containment fallback for anything outside the vocabulary
        for column in &row.flagged_columns {
            let color_id = columns::mapped_color_name(column)
                .and_then(|canonical| colors.find_exact(canonical))
                .or_else(|| colors.find_containing(&columns::expanded_column_name(column)));

            match color_id {
                Some(color_id) => {
                    let color_id = color_id.to_string();
                    match linker.link_color(&episode_id, &color_id).await {
                        Ok(true) => stats.color_links_created += 1,
                        Ok(false) => {}
                        Err(e) => warn!(column = %column, error = %e, "Skipping color link"),
                    }
                }
                None => {
                    warn!(column = %column, "Dropping color link: no matching resolved color");
                    stats.pairs_dropped += 1;
                }
            }
        }
    }

    for row in &subject_rows.records {
        let episode_id = match episodes.lookup(row.season, row.episode).await {
            Ok(Some(guid)) => guid,
            Ok(None) => {
                warn!(season = row.season, episode = row.episode, title = %row.title,
                      "Dropping subject links: episode not resolved");
                stats.pairs_dropped += row.flagged_columns.len();
                continue;
            }
            Err(e) => {
                warn!(season = row.season, episode = row.episode, error = %e,
                      "Dropping subject links: episode lookup failed");
                continue;
            }
        };

        for column in &row.flagged_columns {
            match subjects.resolve(column).await {
                Ok(subject_id) => match linker.link_subject(&episode_id, &subject_id).await {
                    Ok(true) => stats.subject_links_created += 1,
                    Ok(false) => {}
                    Err(e) => warn!(subject = %column, error = %e, "Skipping subject link"),
                },
                Err(e) => {
                    warn!(subject = %column, error = %e, "Dropping subject link: unresolved");
                    stats.pairs_dropped += 1;
                }
            }
        }
    }

    info!(
        color_links = stats.color_links_created,
        subject_links = stats.subject_links_created,
        dropped = stats.pairs_dropped,
        "Phase 3 complete: links committed"
    );

    Ok(stats)
}
