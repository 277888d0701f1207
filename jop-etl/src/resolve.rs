//! Entity resolvers
//!
//! Assign stable surrogate ids to colors and subjects. Resolution is
//! upsert-or-fetch: repeated and interleaved calls with the same normalized
//! key return the same guid for the lifetime of the catalog. Each resolver
//! keeps a run-scoped cache so link-time matching never re-queries names it
//! has already seen.

use crate::columns::canonical_subject_name;
use jop_common::Result;
use sqlx::SqlitePool;
use std::collections::HashMap;
use uuid::Uuid;

/// Color resolver
///
/// Key: the exact trimmed name. Insert-or-update: an existing color keeps
/// its guid while its hex code is overwritten with the latest supplied
/// value (last-write-wins).
pub struct ColorResolver<'a> {
    db: &'a SqlitePool,
    /// name -> guid, in resolution order
    resolved: Vec<(String, String)>,
    by_name: HashMap<String, usize>,
}

impl<'a> ColorResolver<'a> {
    pub fn new(db: &'a SqlitePool) -> Self {
        Self {
            db,
            resolved: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Resolve a color name to its guid, upserting as needed
    pub async fn resolve(&mut self, name: &str, hex_code: &str) -> Result<String> {
        let name = name.trim();
        let hex_code = hex_code.trim();

        if let Some(&idx) = self.by_name.get(name) {
            // Already resolved this run; still apply last-write-wins on hex
            sqlx::query("UPDATE colors SET hex_code = ?, updated_at = CURRENT_TIMESTAMP WHERE name = ?")
                .bind(hex_code)
                .bind(name)
                .execute(self.db)
                .await?;
            return Ok(self.resolved[idx].1.clone());
        }

        let guid: String = sqlx::query_scalar(
            r#"
            INSERT INTO colors (guid, name, hex_code)
            VALUES (?, ?, ?)
            ON CONFLICT(name) DO UPDATE SET
                hex_code = excluded.hex_code,
                updated_at = CURRENT_TIMESTAMP
            RETURNING guid
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(name)
        .bind(hex_code)
        .fetch_one(self.db)
        .await?;

        self.by_name.insert(name.to_string(), self.resolved.len());
        self.resolved.push((name.to_string(), guid.clone()));
        Ok(guid)
    }

    /// Exact-name lookup against the run cache
    pub fn find_exact(&self, name: &str) -> Option<&str> {
        self.by_name
            .get(name.trim())
            .map(|&idx| self.resolved[idx].1.as_str())
    }

    /// Substring-containment fallback: the needle must appear
    /// case-insensitively inside a resolved color name. Among multiple
    /// candidates the longest name wins, so a more specific name is never
    /// shadowed by a shorter one it contains.
    pub fn find_containing(&self, needle: &str) -> Option<&str> {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }

        self.resolved
            .iter()
            .filter(|(name, _)| name.to_lowercase().contains(&needle))
            .max_by_key(|(name, _)| name.len())
            .map(|(_, guid)| guid.as_str())
    }

    /// Number of distinct colors resolved this run
    pub fn resolved_count(&self) -> usize {
        self.resolved.len()
    }
}

/// Subject resolver
///
/// Key: the canonical subject name (trimmed, underscores expanded,
/// title-cased). Insert-if-absent: existing rows are never updated.
pub struct SubjectResolver<'a> {
    db: &'a SqlitePool,
    by_name: HashMap<String, String>,
}

impl<'a> SubjectResolver<'a> {
    pub fn new(db: &'a SqlitePool) -> Self {
        Self {
            db,
            by_name: HashMap::new(),
        }
    }

    /// Resolve a raw flag column name to the subject's guid, inserting the
    /// canonical name if absent
    pub async fn resolve(&mut self, raw_name: &str) -> Result<String> {
        let name = canonical_subject_name(raw_name);

        if let Some(guid) = self.by_name.get(&name) {
            return Ok(guid.clone());
        }

        sqlx::query("INSERT OR IGNORE INTO subjects (guid, name) VALUES (?, ?)")
            .bind(Uuid::new_v4().to_string())
            .bind(&name)
            .execute(self.db)
            .await?;

        let guid: String = sqlx::query_scalar("SELECT guid FROM subjects WHERE name = ?")
            .bind(&name)
            .fetch_one(self.db)
            .await?;

        self.by_name.insert(name, guid.clone());
        Ok(guid)
    }

    /// Number of distinct subjects resolved this run
    pub fn resolved_count(&self) -> usize {
        self.by_name.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await
            .unwrap();
        jop_common::db::init::create_schema(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn color_resolution_is_stable_across_calls() {
        let pool = setup_test_db().await;
        let mut resolver = ColorResolver::new(&pool);

        let first = resolver.resolve("Bright Red", "#DB0000").await.unwrap();
        let second = resolver.resolve("Bright Red", "#DB0000").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(resolver.resolved_count(), 1);
    }

    #[tokio::test]
    async fn color_hex_is_last_write_wins() {
        let pool = setup_test_db().await;
        let mut resolver = ColorResolver::new(&pool);

        let guid = resolver.resolve("Phthalo Blue", "#0C0040").await.unwrap();
        let again = resolver.resolve("Phthalo Blue", "#000088").await.unwrap();
        assert_eq!(guid, again);

        let hex: String = sqlx::query_scalar("SELECT hex_code FROM colors WHERE name = 'Phthalo Blue'")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(hex, "#000088");
    }

    #[tokio::test]
    async fn color_substring_match_prefers_longest_name() {
        let pool = setup_test_db().await;
        let mut resolver = ColorResolver::new(&pool);

        let sienna = resolver.resolve("Sienna", "#551100").await.unwrap();
        let dark_sienna = resolver.resolve("Dark Sienna", "#5F2E1F").await.unwrap();

        assert_eq!(resolver.find_containing("sienna"), Some(dark_sienna.as_str()));
        assert_eq!(resolver.find_exact("Sienna"), Some(sienna.as_str()));
        assert_eq!(resolver.find_containing("no such color"), None);
    }

    #[tokio::test]
    async fn subject_resolution_never_updates_existing_rows() {
        let pool = setup_test_db().await;
        let mut resolver = SubjectResolver::new(&pool);

        let first = resolver.resolve("AURORA_BOREALIS").await.unwrap();
        let second = resolver.resolve("aurora_borealis").await.unwrap();
        assert_eq!(first, second, "Same canonical name must resolve to one guid");

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM subjects")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);

        let name: String = sqlx::query_scalar("SELECT name FROM subjects")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(name, "Aurora Borealis");
    }
}
