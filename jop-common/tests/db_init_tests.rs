//! Tests for database initialization
//!
//! Covers automatic schema creation, idempotent re-initialization, and the
//! uniqueness constraints the ingestion pipeline relies on.

use jop_common::db::init_database;
use std::path::PathBuf;

fn temp_db_path(tag: &str) -> PathBuf {
    PathBuf::from(format!(
        "/tmp/jop-test-db-{}-{}.db",
        tag,
        std::process::id()
    ))
}

#[tokio::test]
async fn test_database_creation_when_missing() {
    let db_path = temp_db_path("create");
    let _ = std::fs::remove_file(&db_path);

    let result = init_database(&db_path).await;
    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");

    let _ = std::fs::remove_file(&db_path);
}

#[tokio::test]
async fn test_database_opens_existing() {
    let db_path = temp_db_path("existing");
    let _ = std::fs::remove_file(&db_path);

    let pool1 = init_database(&db_path).await;
    assert!(pool1.is_ok());
    drop(pool1);

    // Second init must succeed against the already-created schema
    let pool2 = init_database(&db_path).await;
    assert!(pool2.is_ok(), "Failed to open existing database: {:?}", pool2.err());
    drop(pool2);

    let _ = std::fs::remove_file(&db_path);
}

#[tokio::test]
async fn test_episode_identity_is_unique() {
    let db_path = temp_db_path("identity");
    let _ = std::fs::remove_file(&db_path);

    let pool = init_database(&db_path).await.unwrap();

    sqlx::query(
        "INSERT INTO episodes (guid, title, season_number, episode_number) VALUES (?, ?, ?, ?)",
    )
    .bind("g1")
    .bind("A Walk in the Woods")
    .bind(1_i64)
    .bind(1_i64)
    .execute(&pool)
    .await
    .unwrap();

    // Same (season, episode) with a different guid must violate the
    // uniqueness constraint
    let dup = sqlx::query(
        "INSERT INTO episodes (guid, title, season_number, episode_number) VALUES (?, ?, ?, ?)",
    )
    .bind("g2")
    .bind("A Walk in the Woods")
    .bind(1_i64)
    .bind(1_i64)
    .execute(&pool)
    .await;
    assert!(dup.is_err(), "Duplicate episode identity should be rejected");

    drop(pool);
    let _ = std::fs::remove_file(&db_path);
}

#[tokio::test]
async fn test_link_tables_reject_duplicate_pairs() {
    let db_path = temp_db_path("links");
    let _ = std::fs::remove_file(&db_path);

    let pool = init_database(&db_path).await.unwrap();

    sqlx::query(
        "INSERT INTO episodes (guid, title, season_number, episode_number) VALUES ('e1', 'T', 1, 1)",
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query("INSERT INTO colors (guid, name, hex_code) VALUES ('c1', 'Black', '#000000')")
        .execute(&pool)
        .await
        .unwrap();

    sqlx::query("INSERT INTO episode_colors (episode_id, color_id) VALUES ('e1', 'c1')")
        .execute(&pool)
        .await
        .unwrap();

    let dup = sqlx::query("INSERT INTO episode_colors (episode_id, color_id) VALUES ('e1', 'c1')")
        .execute(&pool)
        .await;
    assert!(dup.is_err(), "Duplicate link pair should be rejected");

    // INSERT OR IGNORE is the idempotent path the linker uses
    let ignored =
        sqlx::query("INSERT OR IGNORE INTO episode_colors (episode_id, color_id) VALUES ('e1', 'c1')")
            .execute(&pool)
            .await
            .unwrap();
    assert_eq!(ignored.rows_affected(), 0);

    drop(pool);
    let _ = std::fs::remove_file(&db_path);
}
