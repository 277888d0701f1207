//! Typed filter plan builder
//!
//! Composes month/color/subject criteria into one parameterized SQL
//! statement. User-supplied values only ever travel as bind arguments;
//! the rendered SQL text is assembled exclusively from fixed fragments,
//! so injection safety is structural rather than conventional.
//!
//! The join fan-out makes a row-level predicate unable to express "this
//! episode has ALL of these colors": each (episode, color, subject)
//! combination is its own joined row. Both combinators therefore work on
//! per-episode aggregates. For every requested value the plan emits a
//! satisfaction flag, `MAX(CASE WHEN name matches THEN 1 ELSE 0 END)`,
//! which is 1 iff some association of the episode matches that value.
//! ALL requires the flag sum to equal the number of requested values;
//! ANY requires it to be at least one. Keeping the name dimensions out of
//! WHERE also leaves the aggregated name lists complete, so a match on
//! one color still returns the episode's full palette.

/// Combinator for the color and subject dimensions
///
/// Months are always OR-combined; dimensions are always AND-composed with
/// each other. The combinator only governs semantics within the colors
/// dimension and within the subjects dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Combine {
    /// Every requested value must be satisfied by some association
    #[default]
    All,
    /// At least one requested value must be satisfied
    Any,
}

impl Combine {
    /// Parse the wire-level filter type (`AND`/`OR`, case-insensitive)
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "AND" => Some(Combine::All),
            "OR" => Some(Combine::Any),
            _ => None,
        }
    }
}

/// One filter query over the episode catalog
///
/// An empty list for a dimension means "no constraint on that dimension".
#[derive(Debug, Clone, Default)]
pub struct EpisodeQuery {
    pub months: Vec<u32>,
    pub colors: Vec<String>,
    pub subjects: Vec<String>,
    pub combine: Combine,
}

/// A bind argument of the rendered plan
#[derive(Debug, Clone, PartialEq)]
pub enum SqlArg {
    Int(i64),
    Text(String),
}

/// A rendered, executable plan: SQL text plus bind arguments in order
#[derive(Debug, Clone)]
pub struct SqlPlan {
    pub sql: String,
    pub args: Vec<SqlArg>,
}

/// Shared SELECT/JOIN/aggregation skeleton for episode views
const BASE_SELECT: &str = "SELECT e.guid, e.title, e.season_number, e.episode_number, \
     e.air_date, e.youtube_url, e.image_url, \
     GROUP_CONCAT(DISTINCT c.name) AS color_names, \
     GROUP_CONCAT(DISTINCT s.name) AS subject_names \
     FROM episodes e \
     LEFT JOIN episode_colors ec ON e.guid = ec.episode_id \
     LEFT JOIN colors c ON ec.color_id = c.guid \
     LEFT JOIN episode_subjects es ON e.guid = es.episode_id \
     LEFT JOIN subjects s ON es.subject_id = s.guid";

impl EpisodeQuery {
    /// Render the filter plan
    pub fn build(&self) -> SqlPlan {
        let mut args = Vec::new();
        let mut sql = String::from(BASE_SELECT);

        // Month matching is an episode-level attribute test: exact
        // equality on the calendar month, OR-combined across requested
        // months regardless of combinator.
        if !self.months.is_empty() {
            let placeholders = vec!["?"; self.months.len()].join(", ");
            sql.push_str(&format!(
                " WHERE CAST(strftime('%m', e.air_date) AS INTEGER) IN ({placeholders})"
            ));
            args.extend(self.months.iter().map(|m| SqlArg::Int(*m as i64)));
        }

        sql.push_str(" GROUP BY e.guid");

        let mut having = Vec::new();
        if let Some(clause) = name_dimension("c.name", &self.colors, self.combine, &mut args) {
            having.push(clause);
        }
        if let Some(clause) = name_dimension("s.name", &self.subjects, self.combine, &mut args) {
            having.push(clause);
        }
        if !having.is_empty() {
            sql.push_str(" HAVING ");
            sql.push_str(&having.join(" AND "));
        }

        sql.push_str(" ORDER BY e.season_number ASC, e.episode_number ASC");

        SqlPlan { sql, args }
    }
}

/// Render the per-episode satisfaction test for one name dimension
fn name_dimension(
    column: &str,
    values: &[String],
    combine: Combine,
    args: &mut Vec<SqlArg>,
) -> Option<String> {
    if values.is_empty() {
        return None;
    }

    let flags: Vec<String> = values
        .iter()
        .map(|value| {
            args.push(SqlArg::Text(format!("%{}%", value.trim().to_lowercase())));
            format!("MAX(CASE WHEN LOWER({column}) LIKE ? THEN 1 ELSE 0 END)")
        })
        .collect();
    let satisfied = flags.join(" + ");

    match combine {
        Combine::All => {
            args.push(SqlArg::Int(values.len() as i64));
            Some(format!("({satisfied}) = ?"))
        }
        Combine::Any => Some(format!("({satisfied}) >= 1")),
    }
}

/// Render the single-episode detail plan
pub fn detail_plan(season: i64, episode: i64) -> SqlPlan {
    SqlPlan {
        sql: format!(
            "{BASE_SELECT} WHERE e.season_number = ? AND e.episode_number = ? GROUP BY e.guid"
        ),
        args: vec![SqlArg::Int(season), SqlArg::Int(episode)],
    }
}
