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


//! Desktop testing CLI for the catalog core

use anyhow::bail;
use bookshelf_core::catalog::CatalogRepository;
use bookshelf_core::error::CatalogError;
use bookshelf_core::storage::{Database, NewBook, ReadingStatus};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bookshelf-cli")]
#[command(about = "Bookshelf Keeper CLI - Desktop catalog tool", long_about = None)]
struct Cli {
    /// Database file (defaults to the platform data directory)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a book to the catalog
    Add {
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        authors: String,
        /// ISO-639-1 language code ("en", "ru", "zh")
        #[arg(short, long)]
        language: String,
        /// Room (location level 1)
        #[arg(short, long)]
        room: String,
        /// Shelf / cabinet (level 2)
        #[arg(long)]
        shelf: Option<String>,
        /// Row (level 3)
        #[arg(long)]
        row: Option<String>,
        /// Position (level 4)
        #[arg(long)]
        position: Option<String>,
        /// Extra detail (level 5)
        #[arg(long)]
        detail: Option<String>,
        #[arg(short, long)]
        genre: Option<String>,
    },
    /// List all books
    List,
    /// Search books by title or authors
    Search {
        query: String,
    },
    /// Show one book with its location breadcrumb
    Show {
        id: i64,
    },
    /// Delete a book
    Delete {
        id: i64,
    },
    /// Set a book's reading status (not_read, reading, read)
    Status {
        id: i64,
        status: String,
    },
    /// List known rooms
    Rooms,
    /// List shelf suggestions for a room
    Shelves {
        room: String,
    },
    /// List language suggestions (catalog languages first)
    Languages,
    /// Per-language and per-room catalog statistics
    Stats,
    /// Export the catalog as JSON
    Export,
    /// Run database integrity check and location-link repair
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let path = cli.database.unwrap_or_else(Database::get_default_path);

    let db = Database::new(&path).await?;
    let repo = CatalogRepository::open(db).await?;

    match cli.command {
        Commands::Add {
            title,
            authors,
            language,
            room,
            shelf,
            row,
            position,
            detail,
            genre,
        } => {
            let mut book = NewBook::new(title, authors, language, room);
            book.location_level2 = shelf;
            book.location_level3 = row;
            book.location_level4 = position;
            book.location_level5 = detail;
            book.genre = genre;

            let id = repo.add_book(book).await?;
            println!("Added book #{}", id);
        }
        Commands::List => {
            let books = repo.list_books().await?;
            for book in &books {
                println!(
                    "#{:<4} {} - {} [{}] ({})",
                    book.id,
                    book.title,
                    book.authors,
                    book.language,
                    book.get_reading_status().as_str()
                );
            }
            println!("{} book(s)", books.len());
        }
        Commands::Search { query } => {
            let books = repo.search_books(&query).await?;
            for book in &books {
                println!("#{:<4} {} - {}", book.id, book.title, book.authors);
            }
            println!("{} match(es)", books.len());
        }
        Commands::Show { id } => {
            let book = repo
                .book_by_id(id)
                .await?
                .ok_or(CatalogError::BookNotFound(id))?;

            println!("Title:    {}", book.title);
            println!("Authors:  {}", book.authors);
            println!("Language: {}", book.language);
            if let Some(genre) = &book.genre {
                println!("Genre:    {}", genre);
            }
            println!("Status:   {}", book.get_reading_status().as_str());

            if let Some(location_id) = book.location_id {
                let chain = repo.location_chain(location_id).await?;
                let breadcrumb: Vec<&str> = chain.iter().map(|l| l.name.as_str()).collect();
                println!("Location: {}", breadcrumb.join(" > "));
            } else {
                println!("Location: {}", book.location_level1);
            }
        }
        Commands::Delete { id } => {
            if repo.delete_book(id).await? {
                println!("Deleted book #{}", id);
            } else {
                println!("Nothing to do: no book #{}", id);
            }
        }
        Commands::Status { id, status } => {
            let status = match status.as_str() {
                "not_read" => ReadingStatus::NotRead,
                "reading" => ReadingStatus::Reading,
                "read" => ReadingStatus::Read,
                other => bail!("unknown reading status: {other}"),
            };
            if repo.set_reading_status(id, status).await? {
                println!("Updated book #{}", id);
            } else {
                println!("Nothing to do: no book #{}", id);
            }
        }
        Commands::Rooms => {
            for room in repo.room_suggestions().await? {
                println!("{}", room);
            }
        }
        Commands::Shelves { room } => {
            for shelf in repo.shelf_suggestions(&room).await? {
                println!("{}", shelf);
            }
        }
        Commands::Languages => {
            for item in repo.language_suggestions().await? {
                println!("{}  {}", item.code, item.name);
            }
        }
        Commands::Stats => {
            println!("By language:");
            for stat in repo.language_stats().await? {
                println!("  {:<8} {}", stat.key, stat.count);
            }
            println!("By room:");
            for stat in repo.room_stats().await? {
                println!("  {:<16} {}", stat.key, stat.count);
            }
        }
        Commands::Export => {
            let books = repo.list_books().await?;
            println!("{}", serde_json::to_string_pretty(&books)?);
        }
        Commands::Check => {
            let intact = repo.database().check_integrity().await?;
            println!("Integrity: {}", if intact { "ok" } else { "FAILED" });

            let report = repo.check_consistency().await?;
            println!(
                "Locations: {} checked, {} repaired, {} skipped",
                report.checked, report.repaired, report.skipped
            );
        }
    }

    repo.close().await?;
    Ok(())
}
