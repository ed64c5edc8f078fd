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


//! Location tree store
//!
//! Persistence for the shared tree of named location nodes. Nodes are created
//! lazily, one per distinct (trimmed name, parent) pair, and never deleted.
//!
//! Name matching is case-insensitive at every layer (`COLLATE NOCASE`), with
//! the first writer's casing preserved for display. Parent matching uses `IS`,
//! so a NULL parent (root) compares correctly against NULL rather than being
//! silently unequal.
//!
//! # Race behavior
//! `get_or_create_*` must not create duplicates when two writers race on the
//! same (name, parent) key. The insert is a single atomic
//! `INSERT ... SELECT ... WHERE NOT EXISTS` statement followed by a re-select:
//! whichever writer loses the race inserts nothing and re-reads the winner's
//! row.

use crate::error::Result;
use crate::storage::models::Location;
use sqlx::SqlitePool;

/// Find or create a root location ("room")
///
/// Trims `name`; a blank name yields the transient sentinel (never persisted),
/// modeling "no room specified" without failing the call.
pub async fn get_or_create_root(pool: &SqlitePool, name: &str) -> Result<Location> {
    get_or_create(pool, name, None).await
}

/// Find or create a child location under `parent_id`
///
/// Same normalization as [`get_or_create_root`]. A `None` parent resolves
/// against roots (NULL-safe matching), which makes the two entry points
/// consistent rather than subtly different.
pub async fn get_or_create_child(
    pool: &SqlitePool,
    name: &str,
    parent_id: Option<i64>,
) -> Result<Location> {
    get_or_create(pool, name, parent_id).await
}

async fn get_or_create(
    pool: &SqlitePool,
    name: &str,
    parent_id: Option<i64>,
) -> Result<Location> {
    let name = name.trim();
    if name.is_empty() {
        return Ok(Location::sentinel());
    }

    // Atomic insert-or-ignore: the NOT EXISTS guard and the insert execute as
    // one statement, so concurrent callers cannot both insert the same key.
    sqlx::query(
        r#"
        INSERT INTO locations (name, parent_id)
        SELECT ?, ?
        WHERE NOT EXISTS (
            SELECT 1 FROM locations
            WHERE name = ? COLLATE NOCASE AND parent_id IS ?
        )
        "#,
    )
    .bind(name)
    .bind(parent_id)
    .bind(name)
    .bind(parent_id)
    .execute(pool)
    .await?;

    // Re-select: returns our insert or the concurrent winner's row either way
    let location = sqlx::query_as::<_, Location>(
        r#"
        SELECT id, name, parent_id FROM locations
        WHERE name = ? COLLATE NOCASE AND parent_id IS ?
        LIMIT 1
        "#,
    )
    .bind(name)
    .bind(parent_id)
    .fetch_one(pool)
    .await?;

    Ok(location)
}

/// Point lookup by id
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Location>> {
    let location =
        sqlx::query_as::<_, Location>("SELECT id, name, parent_id FROM locations WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;

    Ok(location)
}

/// All root locations (rooms), sorted by name
pub async fn list_roots(pool: &SqlitePool) -> Result<Vec<Location>> {
    let locations = sqlx::query_as::<_, Location>(
        "SELECT id, name, parent_id FROM locations WHERE parent_id IS NULL ORDER BY name",
    )
    .fetch_all(pool)
    .await?;

    Ok(locations)
}

/// Direct children of a node, sorted by name
pub async fn list_children(pool: &SqlitePool, parent_id: i64) -> Result<Vec<Location>> {
    let locations = sqlx::query_as::<_, Location>(
        "SELECT id, name, parent_id FROM locations WHERE parent_id = ? ORDER BY name",
    )
    .bind(parent_id)
    .fetch_all(pool)
    .await?;

    Ok(locations)
}
