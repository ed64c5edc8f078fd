// Bookshelf Keeper - Personal Library Catalog Core
// Copyright (C) 2025 Bookshelf Keeper contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! Database migrations
//!
//! Schema creation and evolution as runtime SQL, tracked in the `_migrations`
//! table so each migration runs exactly once per store lifetime. Migrations
//! are irreversible; there is no down path.
//!
//! # History
//! 1. `initial_schema` — the flat `books` table: five denormalized location
//!    columns and nothing else. This is the historical catalog layout.
//! 2. `location_tree` — introduces the `locations` adjacency-list table,
//!    adds `books.location_id`, creates one root node per distinct historical
//!    `location_level1` value (case-insensitive dedupe) and backfills
//!    `location_id` by root-name match. Deeper flat levels converge to their
//!    true leaf on the next repository write or consistency check.

use crate::error::Result;
use crate::storage::locations;
use sqlx::{Executor, SqlitePool};
use tracing::info;

/// Run all database migrations
///
/// This function creates the database schema and applies any pending
/// migrations, in order.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    create_migrations_table(pool).await?;

    run_migration(pool, 1, "initial_schema", create_initial_schema(pool)).await?;
    run_migration(pool, 2, "location_tree", create_location_tree(pool)).await?;

    Ok(())
}

/// Create migrations tracking table
async fn create_migrations_table(pool: &SqlitePool) -> Result<()> {
    pool.execute(
        r#"
        CREATE TABLE IF NOT EXISTS _migrations (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .await?;

    Ok(())
}

/// Run a single migration if it hasn't been applied yet
async fn run_migration(
    pool: &SqlitePool,
    id: i32,
    name: &str,
    migration_fn: impl std::future::Future<Output = Result<()>>,
) -> Result<()> {
    // Check if migration has been applied
    let applied: Option<i32> = sqlx::query_scalar("SELECT id FROM _migrations WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    if applied.is_some() {
        return Ok(());
    }

    info!(id, name, "applying migration");
    migration_fn.await?;

    // Record migration
    sqlx::query("INSERT INTO _migrations (id, name) VALUES (?, ?)")
        .bind(id)
        .bind(name)
        .execute(pool)
        .await?;

    Ok(())
}

/// Create initial database schema
///
/// The flat catalog: book rows carry their whole location as five denormalized
/// text columns, level 1 (room) mandatory, 2-5 optional.
async fn create_initial_schema(pool: &SqlitePool) -> Result<()> {
    pool.execute(
        r#"
-- Books table: one row per catalog entry
CREATE TABLE IF NOT EXISTS books (
    id INTEGER PRIMARY KEY AUTOINCREMENT,

    title TEXT NOT NULL,
    authors TEXT NOT NULL,
    language TEXT NOT NULL,  -- ISO-639-1-like code ("en", "ru", "zh")
    genre TEXT,

    -- Flat location path: room, then up to four optional sub-levels
    location_level1 TEXT NOT NULL,
    location_level2 TEXT,
    location_level3 TEXT,
    location_level4 TEXT,
    location_level5 TEXT,

    reading_status TEXT NOT NULL DEFAULT 'not_read',  -- not_read | reading | read

    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_books_title ON books(title);
CREATE INDEX IF NOT EXISTS idx_books_location_level1 ON books(location_level1);
CREATE INDEX IF NOT EXISTS idx_books_language ON books(language);

-- Trigger to update updated_at timestamp when a book is modified
CREATE TRIGGER IF NOT EXISTS update_books_timestamp
AFTER UPDATE ON books
FOR EACH ROW
BEGIN
    UPDATE books SET updated_at = CURRENT_TIMESTAMP WHERE id = NEW.id;
END;
        "#,
    )
    .await?;

    Ok(())
}

/// Introduce the location tree and link books to it
///
/// Runs in three steps: create the `locations` table and the `location_id`
/// column, then seed one root per distinct historical room name, then backfill
/// every book's `location_id` from its trimmed `location_level1`.
async fn create_location_tree(pool: &SqlitePool) -> Result<()> {
    pool.execute(
        r#"
-- Locations table: adjacency-list tree of named nodes
-- parent_id IS NULL marks a root ("room")
CREATE TABLE IF NOT EXISTS locations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    parent_id INTEGER REFERENCES locations(id)
);

CREATE INDEX IF NOT EXISTS idx_locations_parent_id ON locations(parent_id);
        "#,
    )
    .await?;

    pool.execute("ALTER TABLE books ADD COLUMN location_id INTEGER REFERENCES locations(id)")
        .await?;

    // Seed one root per distinct historical room. get_or_create_root trims and
    // matches case-insensitively, so "office" and " Office " collapse to one
    // node, keeping the first-seen casing.
    let rooms: Vec<String> = sqlx::query_scalar(
        "SELECT DISTINCT TRIM(location_level1) FROM books WHERE TRIM(location_level1) != ''",
    )
    .fetch_all(pool)
    .await?;

    let room_count = rooms.len();
    for room in rooms {
        locations::get_or_create_root(pool, &room).await?;
    }

    // Backfill the tree reference by root-name match. Deeper levels are
    // reconciled lazily by the repository's re-resolution on write.
    let backfilled = sqlx::query(
        r#"
        UPDATE books
        SET location_id = (
            SELECT l.id FROM locations l
            WHERE l.parent_id IS NULL
              AND l.name = TRIM(books.location_level1) COLLATE NOCASE
        )
        WHERE TRIM(location_level1) != ''
        "#,
    )
    .execute(pool)
    .await?;

    info!(
        rooms = room_count,
        books = backfilled.rows_affected(),
        "location tree backfill complete"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::database::Database;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use std::str::FromStr;

    /// Raw pool without automatic migrations, for staging legacy states
    async fn raw_pool() -> SqlitePool {
        let opts = SqliteConnectOptions::from_str("sqlite::memory:")
            .unwrap()
            .foreign_keys(true);
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts)
            .await
            .expect("Failed to create raw pool")
    }

    #[tokio::test]
    async fn test_migrations() {
        let db = Database::new_in_memory()
            .await
            .expect("Failed to create database");

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name != '_migrations' ORDER BY name",
        )
        .fetch_all(db.pool())
        .await
        .expect("Failed to query tables");

        assert_eq!(tables, vec!["books", "locations"]);
    }

    #[tokio::test]
    async fn test_migration_tracking() {
        let db = Database::new_in_memory()
            .await
            .expect("Failed to create database");

        let names: Vec<String> =
            sqlx::query_scalar("SELECT name FROM _migrations ORDER BY id")
                .fetch_all(db.pool())
                .await
                .expect("Failed to query migrations");

        assert_eq!(names, vec!["initial_schema", "location_tree"]);
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let db = Database::new_in_memory()
            .await
            .expect("Failed to create database");

        // A second run must be a no-op, not a duplicate-column error
        run_migrations(db.pool()).await.expect("Re-run failed");

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _migrations")
            .fetch_one(db.pool())
            .await
            .expect("Failed to query migrations");
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn test_foreign_keys_enabled() {
        let db = Database::new_in_memory()
            .await
            .expect("Failed to create database");

        let fk_enabled: i32 = sqlx::query_scalar("PRAGMA foreign_keys")
            .fetch_one(db.pool())
            .await
            .expect("Failed to check foreign keys");

        assert_eq!(fk_enabled, 1, "Foreign keys not enabled");
    }

    #[tokio::test]
    async fn test_location_tree_backfill() {
        let pool = raw_pool().await;

        // Stage a legacy flat-only catalog
        create_migrations_table(&pool).await.unwrap();
        run_migration(&pool, 1, "initial_schema", create_initial_schema(&pool))
            .await
            .unwrap();

        for (title, room) in [
            ("Dune", "Office"),
            ("Foundation", " office "),
            ("Solaris", "Bedroom"),
            ("Drafts", "   "),
        ] {
            sqlx::query(
                "INSERT INTO books (title, authors, language, location_level1) VALUES (?, ?, ?, ?)",
            )
            .bind(title)
            .bind("Author")
            .bind("en")
            .bind(room)
            .execute(&pool)
            .await
            .unwrap();
        }

        // Applies only the pending location_tree migration
        run_migrations(&pool).await.unwrap();

        // "Office" and " office " collapse to a single root
        let roots: Vec<String> =
            sqlx::query_scalar("SELECT name FROM locations WHERE parent_id IS NULL ORDER BY name")
                .fetch_all(&pool)
                .await
                .unwrap();
        let lowered: Vec<String> = roots.iter().map(|name| name.to_lowercase()).collect();
        assert_eq!(lowered, vec!["bedroom", "office"]);

        let linked: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM books WHERE location_id IS NOT NULL",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(linked, 3, "blank-room book must stay unlinked");

        let dune_room: String = sqlx::query_scalar(
            r#"
            SELECT l.name FROM books b
            JOIN locations l ON l.id = b.location_id
            WHERE b.title = 'Dune'
            "#,
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(dune_room.to_lowercase(), "office");
    }
}
