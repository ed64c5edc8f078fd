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


//! Catalog repository
//!
//! The single write path for the catalog. Every book write resolves its flat
//! location levels against the location tree first, so `location_id` and the
//! `location_level1..5` columns can never disagree — that is the central
//! consistency invariant of the whole store. Nothing else in the crate writes
//! the `books` table.
//!
//! The repository owns the [`Database`] handle (constructed by the composition
//! root) and the live book feed that [`crate::catalog::views`] derives from.
//!
//! # Path resolution
//! Levels are walked strictly left to right, absent levels skipped: a present
//! level3 under an absent level2 attaches directly beneath the room. Gaps
//! collapse instead of erroring; that is intended policy, covered by tests.

use crate::catalog::languages::{self, LanguageItem, ISO_639_1_LANGUAGES};
use crate::catalog::path::LocationPath;
use crate::catalog::views::BookFeed;
use crate::error::{CatalogError, Result};
use crate::storage::models::{Book, KeyCount, Location, NewBook, ReadingStatus};
use crate::storage::{books, locations, Database};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

/// Outcome of a consistency pass over the catalog
#[derive(Debug, Clone, Default)]
pub struct ConsistencyReport {
    /// Books examined
    pub checked: u64,
    /// Books whose tree reference was out of sync and got repaired
    pub repaired: u64,
    /// Books with a blank room that cannot be resolved (legacy data)
    pub skipped: u64,
}

/// Catalog repository - orchestrates book and location-tree storage
pub struct CatalogRepository {
    db: Database,
    feed: watch::Sender<Arc<Vec<Book>>>,
}

impl CatalogRepository {
    /// Open a repository over an already-opened database
    ///
    /// Primes the live feed with the current catalog.
    pub async fn open(db: Database) -> Result<Self> {
        let current = books::list_books(db.pool()).await?;
        let (feed, _) = watch::channel(Arc::new(current));
        Ok(Self { db, feed })
    }

    /// The underlying database handle
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Close the repository and its database
    ///
    /// Dropping the repository also ends every derived view; closing makes the
    /// shutdown explicit and waits for the pool to drain.
    pub async fn close(self) -> Result<()> {
        self.db.close().await
    }

    // ========================================================================
    // PATH RESOLUTION
    // ========================================================================

    /// Resolve a location path to its deepest node, creating missing nodes
    ///
    /// The returned node is the root itself when no sub-levels are present.
    /// A blank level1 is a caller error at this layer.
    pub async fn resolve_path(&self, path: &LocationPath) -> Result<Location> {
        let path = path.normalized();
        if path.level1.is_empty() {
            return Err(CatalogError::Validation {
                field: "location_level1",
            });
        }

        let mut current = locations::get_or_create_root(self.db.pool(), &path.level1).await?;
        for level in path.sub_levels() {
            current = locations::get_or_create_child(self.db.pool(), level, current.id).await?;
        }

        Ok(current)
    }

    // ========================================================================
    // BOOK WRITES
    // ========================================================================

    /// Add a book to the catalog
    ///
    /// Validates required fields before any storage access, resolves the
    /// location path, persists with `reading_status = not_read`, and returns
    /// the new book's id.
    pub async fn add_book(&self, book: NewBook) -> Result<i64> {
        require("title", &book.title)?;
        require("authors", &book.authors)?;
        require("language", &book.language)?;
        require("location_level1", &book.location_level1)?;

        let path = LocationPath {
            level1: book.location_level1.clone(),
            level2: book.location_level2.clone(),
            level3: book.location_level3.clone(),
            level4: book.location_level4.clone(),
            level5: book.location_level5.clone(),
        }
        .normalized();
        let leaf = self.resolve_path(&path).await?;

        // Store the normalized levels: absent is NULL, never an empty string
        let mut book = book;
        book.location_level1 = path.level1;
        book.location_level2 = path.level2;
        book.location_level3 = path.level3;
        book.location_level4 = path.level4;
        book.location_level5 = path.level5;

        let id = books::insert_book(self.db.pool(), &book, leaf.id).await?;
        info!(id, title = %book.title, "book added");

        self.refresh_feed().await?;
        Ok(id)
    }

    /// Update a book
    ///
    /// Re-resolves the location path from the book's current flat fields
    /// before persisting, so `location_id` never drifts out of sync with
    /// them. Returns `false` ("nothing to do") when the id no longer exists.
    pub async fn update_book(&self, book: &Book) -> Result<bool> {
        require("title", &book.title)?;
        require("authors", &book.authors)?;
        require("language", &book.language)?;
        require("location_level1", &book.location_level1)?;

        let path = LocationPath::from_book(book).normalized();
        let leaf = self.resolve_path(&path).await?;

        let mut updated = book.clone();
        updated.location_level1 = path.level1;
        updated.location_level2 = path.level2;
        updated.location_level3 = path.level3;
        updated.location_level4 = path.level4;
        updated.location_level5 = path.level5;
        updated.location_id = leaf.id;

        let changed = books::update_book(self.db.pool(), &updated).await?;
        if changed {
            self.refresh_feed().await?;
        } else {
            debug!(id = book.id, "update skipped, book no longer exists");
        }
        Ok(changed)
    }

    /// Delete a book
    ///
    /// Location nodes are shared and survive; only the book row goes.
    /// Returns `false` when the id no longer exists.
    pub async fn delete_book(&self, id: i64) -> Result<bool> {
        let deleted = books::delete_book(self.db.pool(), id).await?;
        if deleted {
            info!(id, "book deleted");
            self.refresh_feed().await?;
        } else {
            debug!(id, "delete skipped, book no longer exists");
        }
        Ok(deleted)
    }

    /// Change a book's reading status
    ///
    /// Funnels through [`CatalogRepository::update_book`] so the location
    /// invariant is re-checked like on any other write.
    pub async fn set_reading_status(&self, id: i64, status: ReadingStatus) -> Result<bool> {
        let Some(mut book) = books::find_book_by_id(self.db.pool(), id).await? else {
            return Ok(false);
        };
        book.set_reading_status(status);
        self.update_book(&book).await
    }

    // ========================================================================
    // BOOK READS
    // ========================================================================

    /// Point lookup by id
    pub async fn book_by_id(&self, id: i64) -> Result<Option<Book>> {
        books::find_book_by_id(self.db.pool(), id).await
    }

    /// All books, sorted by title
    pub async fn list_books(&self) -> Result<Vec<Book>> {
        books::list_books(self.db.pool()).await
    }

    /// One-shot search by title or authors, case-insensitive substring
    pub async fn search_books(&self, query: &str) -> Result<Vec<Book>> {
        books::search_books(self.db.pool(), query).await
    }

    /// Total number of books
    pub async fn count_books(&self) -> Result<i64> {
        books::count_books(self.db.pool()).await
    }

    // ========================================================================
    // SUGGESTIONS & AGGREGATES
    // ========================================================================

    /// Distinct room names for autocomplete, case-preserved, sorted
    pub async fn room_suggestions(&self) -> Result<Vec<String>> {
        books::distinct_rooms(self.db.pool()).await
    }

    /// Distinct shelf (level 2) names recorded under a room
    ///
    /// Unbounded; display layers cap the list (typically at 7 entries).
    pub async fn shelf_suggestions(&self, room: &str) -> Result<Vec<String>> {
        books::distinct_level2_for_room(self.db.pool(), room).await
    }

    /// Language autocomplete: catalog languages first, then the rest of the
    /// reference table, both in reference order
    pub async fn language_suggestions(&self) -> Result<Vec<&'static LanguageItem>> {
        let used = books::distinct_languages(self.db.pool()).await?;
        Ok(languages::suggestions(&used, ISO_639_1_LANGUAGES))
    }

    /// Books per language
    pub async fn language_stats(&self) -> Result<Vec<KeyCount>> {
        books::language_stats(self.db.pool()).await
    }

    /// Books per room
    pub async fn room_stats(&self) -> Result<Vec<KeyCount>> {
        books::room_stats(self.db.pool()).await
    }

    // ========================================================================
    // LOCATION TREE BROWSING
    // ========================================================================

    /// All root locations (rooms), sorted by name
    pub async fn list_roots(&self) -> Result<Vec<Location>> {
        locations::list_roots(self.db.pool()).await
    }

    /// Direct children of a location, sorted by name
    pub async fn list_children(&self, parent_id: i64) -> Result<Vec<Location>> {
        locations::list_children(self.db.pool(), parent_id).await
    }

    /// Walk a leaf's ancestry, root first (breadcrumb order)
    ///
    /// A dangling reference anywhere along the chain is a
    /// [`CatalogError::LocationNotFound`].
    pub async fn location_chain(&self, location_id: i64) -> Result<Vec<Location>> {
        let mut chain = Vec::new();
        let mut next = Some(location_id);

        while let Some(id) = next {
            let node = locations::find_by_id(self.db.pool(), id)
                .await?
                .ok_or(CatalogError::LocationNotFound(id))?;
            next = node.parent_id;
            chain.push(node);
        }

        chain.reverse();
        Ok(chain)
    }

    // ========================================================================
    // CONSISTENCY
    // ========================================================================

    /// Verify and repair the flat/tree agreement for every book
    ///
    /// Re-resolves each book's flat path and rewrites `location_id` where it
    /// diverged (e.g. rows predating the location tree, whose backfill only
    /// linked the root). Books with a blank room are counted as skipped.
    pub async fn check_consistency(&self) -> Result<ConsistencyReport> {
        let all = books::list_books(self.db.pool()).await?;
        let mut report = ConsistencyReport::default();

        for book in all {
            report.checked += 1;

            let path = LocationPath::from_book(&book).normalized();
            if path.level1.is_empty() {
                report.skipped += 1;
                continue;
            }

            let leaf = self.resolve_path(&path).await?;
            if book.location_id != leaf.id {
                let mut repaired = book.clone();
                repaired.location_id = leaf.id;
                books::update_book(self.db.pool(), &repaired).await?;
                report.repaired += 1;
            }
        }

        if report.repaired > 0 {
            info!(
                checked = report.checked,
                repaired = report.repaired,
                "consistency pass repaired diverged location links"
            );
            self.refresh_feed().await?;
        }
        Ok(report)
    }

    // ========================================================================
    // LIVE FEED
    // ========================================================================

    /// Subscribe to the live book collection
    ///
    /// The receiver holds the current value immediately and is notified after
    /// every successful write. On a storage failure the feed keeps its
    /// last-known-good value; nothing partial is ever published.
    pub fn watch_books(&self) -> BookFeed {
        self.feed.subscribe()
    }

    /// Reload the catalog and publish it to subscribers
    async fn refresh_feed(&self) -> Result<()> {
        let current = books::list_books(self.db.pool()).await?;
        self.feed.send_replace(Arc::new(current));
        Ok(())
    }
}

/// Validation gate: required fields must be non-blank after trim
fn require(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CatalogError::Validation { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    async fn repo() -> CatalogRepository {
        let db = Database::new_in_memory().await.expect("Failed to create database");
        CatalogRepository::open(db).await.expect("Failed to open repository")
    }

    fn dune(room: &str) -> NewBook {
        NewBook::new(
            "Dune".to_string(),
            "F. Herbert".to_string(),
            "en".to_string(),
            room.to_string(),
        )
    }

    #[tokio::test]
    async fn test_add_book_validates_before_storage() {
        let repo = repo().await;

        let mut blank_title = dune("Office");
        blank_title.title = "  ".to_string();
        let err = repo.add_book(blank_title).await.unwrap_err();
        assert!(matches!(err, CatalogError::Validation { field: "title" }));

        let mut blank_room = dune("Office");
        blank_room.location_level1 = String::new();
        let err = repo.add_book(blank_room).await.unwrap_err();
        assert!(matches!(err, CatalogError::Validation { field: "location_level1" }));

        // Nothing was written
        assert_eq!(repo.count_books().await.unwrap(), 0);
        assert!(repo.list_roots().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_book_round_trip() {
        let repo = repo().await;

        let id = repo.add_book(dune("Office")).await.unwrap();
        let book = repo.book_by_id(id).await.unwrap().expect("book vanished");

        assert_eq!(book.location_level1, "Office");
        assert_eq!(book.location_level2, None);
        assert_eq!(book.location_level5, None);
        assert_eq!(book.get_reading_status(), ReadingStatus::NotRead);

        let leaf_id = book.location_id.expect("tree reference missing");
        let leaf = locations::find_by_id(repo.database().pool(), leaf_id)
            .await
            .unwrap()
            .expect("leaf missing");
        assert!(leaf.is_root());
        assert_eq!(leaf.name, "Office");
    }

    #[tokio::test]
    async fn test_resolve_path_collapses_gaps() {
        let repo = repo().await;

        let path = LocationPath {
            level1: "Office".to_string(),
            level2: None,
            level3: Some("Row 3".to_string()),
            level4: None,
            level5: None,
        };
        let leaf = repo.resolve_path(&path).await.unwrap();

        // level3 attaches directly under the room
        let root = locations::get_or_create_root(repo.database().pool(), "Office")
            .await
            .unwrap();
        assert_eq!(leaf.parent_id, root.id);
        assert_eq!(leaf.name, "Row 3");
    }

    #[tokio::test]
    async fn test_resolve_path_is_idempotent() {
        let repo = repo().await;

        let path = LocationPath {
            level1: "Office".to_string(),
            level2: Some("Cabinet".to_string()),
            level3: Some("Shelf 2".to_string()),
            level4: Some("Row 1".to_string()),
            level5: Some("Slot 4".to_string()),
        };

        let first = repo.resolve_path(&path).await.unwrap();
        let second = repo.resolve_path(&path).await.unwrap();
        assert_eq!(first.id, second.id);

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM locations")
            .fetch_one(repo.database().pool())
            .await
            .unwrap();
        assert_eq!(count, 5, "one node per distinct (name, parent) pair");
    }

    #[tokio::test]
    async fn test_update_rebinds_location() {
        let repo = repo().await;

        let id = repo.add_book(dune("Office")).await.unwrap();
        let book = repo.book_by_id(id).await.unwrap().unwrap();
        let original_leaf = book.location_id;

        // Unchanged fields keep the same leaf
        assert!(repo.update_book(&book).await.unwrap());
        let unchanged = repo.book_by_id(id).await.unwrap().unwrap();
        assert_eq!(unchanged.location_id, original_leaf);

        // Adding a shelf moves the leaf but reuses the root
        let mut moved = unchanged.clone();
        moved.location_level2 = Some("Shelf 1".to_string());
        assert!(repo.update_book(&moved).await.unwrap());

        let moved = repo.book_by_id(id).await.unwrap().unwrap();
        assert_ne!(moved.location_id, original_leaf);

        let leaf = locations::find_by_id(repo.database().pool(), moved.location_id.unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(leaf.name, "Shelf 1");
        assert_eq!(leaf.parent_id, original_leaf, "root node must be reused");
    }

    #[tokio::test]
    async fn test_update_missing_book_reports_nothing_to_do() {
        let repo = repo().await;

        let id = repo.add_book(dune("Office")).await.unwrap();
        let book = repo.book_by_id(id).await.unwrap().unwrap();
        assert!(repo.delete_book(id).await.unwrap());

        assert!(!repo.update_book(&book).await.unwrap());
        assert!(!repo.delete_book(id).await.unwrap());
        assert!(!repo
            .set_reading_status(id, ReadingStatus::Read)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_delete_keeps_shared_locations() {
        let repo = repo().await;

        let first = repo.add_book(dune("Office")).await.unwrap();
        let second = repo.add_book(dune("Office")).await.unwrap();

        let leaf = repo.book_by_id(first).await.unwrap().unwrap().location_id;
        assert!(repo.delete_book(first).await.unwrap());

        // The surviving book still resolves through the same leaf
        let survivor = repo.book_by_id(second).await.unwrap().unwrap();
        assert_eq!(survivor.location_id, leaf);
        let node = locations::find_by_id(repo.database().pool(), leaf.unwrap())
            .await
            .unwrap();
        assert!(node.is_some(), "locations must outlive books");
    }

    #[tokio::test]
    async fn test_set_reading_status_keeps_location() {
        let repo = repo().await;

        let id = repo.add_book(dune("Office")).await.unwrap();
        let before = repo.book_by_id(id).await.unwrap().unwrap();

        assert!(repo.set_reading_status(id, ReadingStatus::Reading).await.unwrap());

        let after = repo.book_by_id(id).await.unwrap().unwrap();
        assert_eq!(after.get_reading_status(), ReadingStatus::Reading);
        assert_eq!(after.location_id, before.location_id);
    }

    #[tokio::test]
    async fn test_location_chain() {
        let repo = repo().await;

        let mut book = dune("Office");
        book.location_level2 = Some("Cabinet".to_string());
        book.location_level3 = Some("Shelf 2".to_string());
        let id = repo.add_book(book).await.unwrap();

        let stored = repo.book_by_id(id).await.unwrap().unwrap();
        let chain = repo.location_chain(stored.location_id.unwrap()).await.unwrap();

        let names: Vec<&str> = chain.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Office", "Cabinet", "Shelf 2"]);

        let err = repo.location_chain(9999).await.unwrap_err();
        assert!(matches!(err, CatalogError::LocationNotFound(9999)));
    }

    #[tokio::test]
    async fn test_check_consistency_repairs_divergence() {
        let repo = repo().await;

        let mut book = dune("Office");
        book.location_level2 = Some("Shelf 1".to_string());
        let id = repo.add_book(book).await.unwrap();
        let good = repo.book_by_id(id).await.unwrap().unwrap();

        // Corrupt the tree reference behind the repository's back
        sqlx::query("UPDATE books SET location_id = NULL WHERE id = ?")
            .bind(id)
            .execute(repo.database().pool())
            .await
            .unwrap();

        let report = repo.check_consistency().await.unwrap();
        assert_eq!(report.checked, 1);
        assert_eq!(report.repaired, 1);
        assert_eq!(report.skipped, 0);

        let fixed = repo.book_by_id(id).await.unwrap().unwrap();
        assert_eq!(fixed.location_id, good.location_id);

        // A clean catalog repairs nothing
        let report = repo.check_consistency().await.unwrap();
        assert_eq!(report.repaired, 0);
    }

    #[tokio::test]
    async fn test_watch_books_sees_writes() {
        let repo = repo().await;
        let mut feed = repo.watch_books();

        assert!(feed.borrow().is_empty());

        repo.add_book(dune("Office")).await.unwrap();
        timeout(Duration::from_secs(1), feed.changed())
            .await
            .expect("no update")
            .expect("feed closed");

        let snapshot = feed.borrow_and_update().clone();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].title, "Dune");
    }

    #[tokio::test]
    async fn test_language_suggestions_order() {
        let repo = repo().await;

        repo.add_book(dune("Office")).await.unwrap();
        let mut solaris = NewBook::new(
            "Solaris".to_string(),
            "S. Lem".to_string(),
            "RU".to_string(),
            "Office".to_string(),
        );
        solaris.genre = Some("sci-fi".to_string());
        repo.add_book(solaris).await.unwrap();

        let ordered = repo.language_suggestions().await.unwrap();
        // Used languages lead in reference order (ru before en), rest follow
        assert_eq!(ordered[0].code, "ru");
        assert_eq!(ordered[1].code, "en");
        assert_eq!(ordered[2].code, "zh");
        assert_eq!(ordered.len(), ISO_639_1_LANGUAGES.len());
    }

    #[tokio::test]
    async fn test_suggestions() {
        let repo = repo().await;

        let mut with_shelf = dune("Office");
        with_shelf.location_level2 = Some("Shelf B".to_string());
        repo.add_book(with_shelf).await.unwrap();

        let mut with_shelf = dune(" Office ");
        with_shelf.title = "Foundation".to_string();
        with_shelf.location_level2 = Some("shelf a".to_string());
        repo.add_book(with_shelf).await.unwrap();

        repo.add_book(dune("Bedroom")).await.unwrap();

        assert_eq!(
            repo.room_suggestions().await.unwrap(),
            vec!["Bedroom", "Office"]
        );
        assert_eq!(
            repo.shelf_suggestions("Office").await.unwrap(),
            vec!["shelf a", "Shelf B"]
        );
    }
}
