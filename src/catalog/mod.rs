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


//! Catalog orchestration and query views
//!
//! - [`repository`] — the single write path: validation, location-path
//!   resolution, book persistence, live feed publication
//! - [`path`] — the five-level location path value type and its normalization
//! - [`views`] — live filtered/derived views over the book feed
//! - [`languages`] — language reference table and autocomplete ordering

pub mod languages;
pub mod path;
pub mod repository;
pub mod views;

pub use languages::{LanguageItem, ISO_639_1_LANGUAGES};
pub use path::LocationPath;
pub use repository::{CatalogRepository, ConsistencyReport};
pub use views::{BookFeed, SearchView};
