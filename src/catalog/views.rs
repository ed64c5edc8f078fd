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


//! Live query and filter views over the book feed
//!
//! The repository publishes the full (title-sorted) book collection on a
//! `tokio::sync::watch` channel. Everything here derives from that feed:
//! subscribers get the current value immediately and a recomputed value after
//! every write that goes through the repository. Dropping a receiver (or a
//! [`SearchView`]) releases the subscription; the worker task behind it ends
//! and nothing is notified afterwards.
//!
//! Pure filter functions live here too, so one-shot callers don't have to set
//! up a subscription to reuse the matching rules.

use crate::storage::models::Book;
use std::sync::Arc;
use tokio::sync::watch;

/// Shared snapshot of the catalog, as published by the repository
pub type BookFeed = watch::Receiver<Arc<Vec<Book>>>;

/// Filter by exact language code; `None` means no filter
///
/// No case folding: codes are expected canonical-cased as stored.
pub fn filter_by_language(books: &[Book], language: Option<&str>) -> Vec<Book> {
    match language {
        None => books.to_vec(),
        Some(code) => books.iter().filter(|b| b.language == code).cloned().collect(),
    }
}

/// True if `query` occurs in the book's title or authors, case-insensitively
pub fn matches_search(book: &Book, query: &str) -> bool {
    let query = query.to_lowercase();
    book.title.to_lowercase().contains(&query) || book.authors.to_lowercase().contains(&query)
}

/// Search a snapshot; an empty query matches everything
pub fn apply_search(books: &[Book], query: &str) -> Vec<Book> {
    if query.trim().is_empty() {
        return books.to_vec();
    }
    books.iter().filter(|b| matches_search(b, query)).cloned().collect()
}

/// Distinct language codes in a snapshot, sorted ascending
pub fn distinct_languages(books: &[Book]) -> Vec<String> {
    let mut languages: Vec<String> = books.iter().map(|b| b.language.clone()).collect();
    languages.sort();
    languages.dedup();
    languages
}

/// Distinct room names in a snapshot, sorted ascending
pub fn distinct_rooms(books: &[Book]) -> Vec<String> {
    let mut rooms: Vec<String> = books.iter().map(|b| b.location_level1.clone()).collect();
    rooms.sort();
    rooms.dedup();
    rooms
}

/// Spawn a live derived view: `f` is re-applied to every feed update
///
/// The worker ends when the feed closes or every receiver of the derived
/// channel is dropped.
pub fn derive<T, F>(mut feed: BookFeed, f: F) -> watch::Receiver<T>
where
    T: Send + Sync + 'static,
    F: Fn(&[Book]) -> T + Send + 'static,
{
    let initial = f(&feed.borrow());
    let (tx, rx) = watch::channel(initial);

    tokio::spawn(async move {
        loop {
            tokio::select! {
                changed = feed.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let snapshot = feed.borrow_and_update().clone();
                    if tx.send(f(&snapshot)).is_err() {
                        break;
                    }
                }
                _ = tx.closed() => break,
            }
        }
    });

    rx
}

/// Live distinct-languages view
pub fn languages_view(feed: BookFeed) -> watch::Receiver<Vec<String>> {
    derive(feed, distinct_languages)
}

/// Live distinct-rooms view
pub fn rooms_view(feed: BookFeed) -> watch::Receiver<Vec<String>> {
    derive(feed, distinct_rooms)
}

/// Live search over the book feed
///
/// Recomputes whenever the feed or the query changes. Results keep the feed's
/// title ordering.
pub struct SearchView {
    query: watch::Sender<String>,
    results: watch::Receiver<Arc<Vec<Book>>>,
}

impl SearchView {
    pub fn new(mut feed: BookFeed) -> Self {
        let (query_tx, mut query_rx) = watch::channel(String::new());
        let initial = Arc::new(apply_search(&feed.borrow(), ""));
        let (results_tx, results_rx) = watch::channel(initial);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    changed = feed.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                    changed = query_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                    _ = results_tx.closed() => break,
                }

                let books = feed.borrow_and_update().clone();
                let query = query_rx.borrow_and_update().clone();
                let results = Arc::new(apply_search(&books, &query));
                if results_tx.send(results).is_err() {
                    break;
                }
            }
        });

        Self {
            query: query_tx,
            results: results_rx,
        }
    }

    /// Change the search text; a no-op once the underlying feed is gone
    pub fn set_query(&self, query: impl Into<String>) {
        let _ = self.query.send(query.into());
    }

    /// Subscribe to result updates
    pub fn subscribe(&self) -> BookFeed {
        self.results.clone()
    }

    /// Current result snapshot
    pub fn current(&self) -> Arc<Vec<Book>> {
        self.results.borrow().clone()
    }
}
