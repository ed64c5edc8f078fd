// Bookshelf Keeper - Personal Library Catalog Core
// Copyright (C) 2025 Bookshelf Keeper contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

//! Book store queries
//!
//! Plain async query functions over the pool. Nothing here touches the
//! location tree: callers (the repository) resolve `location_id` first and
//! hand it in, keeping a single write path for the flat/tree consistency
//! invariant.

use crate::error::Result;
use crate::storage::models::{Book, KeyCount, NewBook};
use sqlx::SqlitePool;

/// Insert a new book
///
/// `location_id` is the pre-resolved tree leaf for the book's flat path.
/// `reading_status` starts at the schema default (`not_read`).
/// Returns the id of the inserted book.
pub async fn insert_book(
    pool: &SqlitePool,
    book: &NewBook,
    location_id: Option<i64>,
) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO books (
            title, authors, language, genre,
            location_level1, location_level2, location_level3,
            location_level4, location_level5,
            location_id
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&book.title)
    .bind(&book.authors)
    .bind(&book.language)
    .bind(&book.genre)
    .bind(&book.location_level1)
    .bind(&book.location_level2)
    .bind(&book.location_level3)
    .bind(&book.location_level4)
    .bind(&book.location_level5)
    .bind(location_id)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Find book by ID
pub async fn find_book_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Book>> {
    let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(book)
}

/// Update an existing book
///
/// Returns `false` when the id no longer exists (concurrent delete).
pub async fn update_book(pool: &SqlitePool, book: &Book) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE books SET
            title = ?, authors = ?, language = ?, genre = ?,
            location_level1 = ?, location_level2 = ?, location_level3 = ?,
            location_level4 = ?, location_level5 = ?,
            location_id = ?, reading_status = ?
        WHERE id = ?
        "#,
    )
    .bind(&book.title)
    .bind(&book.authors)
    .bind(&book.language)
    .bind(&book.genre)
    .bind(&book.location_level1)
    .bind(&book.location_level2)
    .bind(&book.location_level3)
    .bind(&book.location_level4)
    .bind(&book.location_level5)
    .bind(book.location_id)
    .bind(&book.reading_status)
    .bind(book.id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a book
///
/// Location nodes are shared and stay behind; only the book row goes.
/// Returns `false` when the id no longer exists.
pub async fn delete_book(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM books WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// List all books, sorted by title
pub async fn list_books(pool: &SqlitePool) -> Result<Vec<Book>> {
    let books = sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY title ASC")
        .fetch_all(pool)
        .await?;

    Ok(books)
}

/// Count total books
pub async fn count_books(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Search books by title or authors, case-insensitive substring
pub async fn search_books(pool: &SqlitePool, query: &str) -> Result<Vec<Book>> {
    let pattern = format!("%{}%", query);
    let books = sqlx::query_as::<_, Book>(
        "SELECT * FROM books WHERE title LIKE ? OR authors LIKE ? ORDER BY title",
    )
    .bind(&pattern)
    .bind(&pattern)
    .fetch_all(pool)
    .await?;

    Ok(books)
}

/// Distinct room names (level 1), case-preserved, sorted
pub async fn distinct_rooms(pool: &SqlitePool) -> Result<Vec<String>> {
    let rooms: Vec<String> = sqlx::query_scalar(
        "SELECT DISTINCT location_level1 FROM books WHERE location_level1 != '' ORDER BY location_level1 ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rooms)
}

/// Distinct language codes, sorted
pub async fn distinct_languages(pool: &SqlitePool) -> Result<Vec<String>> {
    let languages: Vec<String> = sqlx::query_scalar(
        "SELECT DISTINCT language FROM books WHERE language != '' ORDER BY language ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(languages)
}

/// Distinct level-2 values (shelves) recorded under a room
///
/// Unbounded; display layers cap the list themselves (typically at 7).
pub async fn distinct_level2_for_room(pool: &SqlitePool, room: &str) -> Result<Vec<String>> {
    let shelves: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT DISTINCT location_level2
        FROM books
        WHERE location_level1 = ? AND location_level2 IS NOT NULL AND location_level2 != ''
        ORDER BY location_level2 COLLATE NOCASE
        "#,
    )
    .bind(room)
    .fetch_all(pool)
    .await?;

    Ok(shelves)
}

/// Books per language
pub async fn language_stats(pool: &SqlitePool) -> Result<Vec<KeyCount>> {
    let stats = sqlx::query_as::<_, KeyCount>(
        "SELECT language AS key, COUNT(*) AS count FROM books GROUP BY language ORDER BY key",
    )
    .fetch_all(pool)
    .await?;

    Ok(stats)
}

/// Books per room (level 1)
pub async fn room_stats(pool: &SqlitePool) -> Result<Vec<KeyCount>> {
    let stats = sqlx::query_as::<_, KeyCount>(
        "SELECT location_level1 AS key, COUNT(*) AS count FROM books GROUP BY location_level1 ORDER BY key",
    )
    .fetch_all(pool)
    .await?;

    Ok(stats)
}
