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


//! Database storage and models
//!
//! All database operations for the catalog, on SQLite via sqlx.
//!
//! # Database Schema
//! - `books`: catalog entries with the flat five-level location columns plus
//!   the `location_id` tree reference
//! - `locations`: adjacency-list tree of named location nodes, shared across
//!   books; `parent_id IS NULL` marks a room
//! - `_migrations`: applied-migration markers (see [`migrations`])
//!
//! # Usage Example
//! ```no_run
//! use bookshelf_core::storage::{books, locations, models::NewBook, Database};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::new("./my_catalog.db").await?;
//!
//! let office = locations::get_or_create_root(db.pool(), "Office").await?;
//! let new_book = NewBook::new(
//!     "Dune".to_string(),
//!     "F. Herbert".to_string(),
//!     "en".to_string(),
//!     "Office".to_string(),
//! );
//! let book_id = books::insert_book(db.pool(), &new_book, office.id).await?;
//!
//! let book = books::find_book_by_id(db.pool(), book_id).await?;
//! # Ok(())
//! # }
//! ```

pub mod books;
pub mod database;
pub mod locations;
pub mod migrations;
pub mod models;

// Re-export commonly used types
pub use database::Database;
pub use models::{Book, KeyCount, Location, NewBook, ReadingStatus};
