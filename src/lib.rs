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


//! Personal library catalog core
//!
//! Records books with title, authors, language, reading status, and a
//! hierarchical physical location (room → shelf → row → position). Free-text
//! location input is deduplicated into a shared tree of named nodes, while a
//! flat five-column copy of the path is kept in sync on every write for
//! display and legacy queries.
//!
//! # Layers
//! - [`storage`] — SQLite persistence: database lifecycle, migrations, the
//!   book and location-tree stores
//! - [`catalog`] — the repository (single write path, path resolution,
//!   suggestions, consistency repair) and live query views
//!
//! # Usage Example
//! ```no_run
//! use bookshelf_core::catalog::CatalogRepository;
//! use bookshelf_core::storage::{Database, NewBook};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::new(Database::get_default_path()).await?;
//! let repo = CatalogRepository::open(db).await?;
//!
//! let mut book = NewBook::new(
//!     "Dune".to_string(),
//!     "F. Herbert".to_string(),
//!     "en".to_string(),
//!     "Office".to_string(),
//! );
//! book.location_level2 = Some("Shelf 1".to_string());
//! let id = repo.add_book(book).await?;
//!
//! let stored = repo.book_by_id(id).await?;
//! repo.close().await?;
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod error;
pub mod storage;

pub use error::{CatalogError, Result};
