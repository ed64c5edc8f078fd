//! Database models for the catalog core
//!
//! Row types for the `books` and `locations` tables.
//!
//! # SQLite Adaptations
//! - `ReadingStatus` stored as TEXT (`not_read`/`reading`/`read`)
//! - Absent location levels stored as NULL, never as empty strings
//! - DateTime stored as TEXT, populated by `CURRENT_TIMESTAMP` defaults
//! - The location tree is adjacency-list shaped: `parent_id` is a nullable
//!   self-reference, NULL marking a root ("room")

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ============================================================================
// ENUMS
// ============================================================================

/// Reading progress of a catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadingStatus {
    NotRead,
    Reading,
    Read,
}

impl ReadingStatus {
    /// Decode from the persisted TEXT value
    ///
    /// Unknown values decode as `NotRead` so a hand-edited or future-version
    /// database still loads.
    pub fn from_str_lossy(value: &str) -> Self {
        match value {
            "reading" => ReadingStatus::Reading,
            "read" => ReadingStatus::Read,
            _ => ReadingStatus::NotRead,
        }
    }

    /// Persisted TEXT value
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingStatus::NotRead => "not_read",
            ReadingStatus::Reading => "reading",
            ReadingStatus::Read => "read",
        }
    }
}

impl Default for ReadingStatus {
    fn default() -> Self {
        ReadingStatus::NotRead
    }
}

// ============================================================================
// MAIN ENTITIES
// ============================================================================

/// A named node in the physical location tree
///
/// Roots (`parent_id == None`) are rooms; deeper nodes are shelves, rows,
/// positions. Nodes are created lazily the first time a path segment is seen
/// and are shared by every book whose path passes through them. They are never
/// deleted by the core.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Location {
    /// Primary key; `None` only for the transient sentinel (see [`Location::sentinel`])
    pub id: Option<i64>,
    pub name: String,
    /// `None` = root ("room")
    #[sqlx(default)]
    pub parent_id: Option<i64>,
}

impl Location {
    /// Transient, unpersisted placeholder for "no location specified"
    ///
    /// Returned by the tree store when asked to resolve a blank name; never
    /// written to storage.
    pub fn sentinel() -> Self {
        Self {
            id: None,
            name: String::new(),
            parent_id: None,
        }
    }

    /// True if this node has never been persisted
    pub fn is_transient(&self) -> bool {
        self.id.is_none()
    }

    /// True for room-level nodes
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Book entity - one catalog record
///
/// Carries both representations of its physical location: the flat
/// `location_level1..5` strings (display and legacy queries) and `location_id`,
/// the resolved leaf of the location tree. The repository keeps the two in
/// agreement on every write.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Book {
    /// Primary key (auto-increment)
    pub id: i64,

    pub title: String,
    pub authors: String,
    /// ISO-639-1-like code ("en", "ru", "zh")
    pub language: String,
    #[sqlx(default)]
    pub genre: Option<String>,

    // Flat location path: level 1 (room) is mandatory, deeper levels optional
    pub location_level1: String,
    #[sqlx(default)]
    pub location_level2: Option<String>,
    #[sqlx(default)]
    pub location_level3: Option<String>,
    #[sqlx(default)]
    pub location_level4: Option<String>,
    #[sqlx(default)]
    pub location_level5: Option<String>,

    /// Resolved leaf of the location tree; equals the root when no sub-levels
    /// are set. Nullable in the schema for pre-migration rows.
    #[sqlx(default)]
    pub location_id: Option<i64>,

    /// ReadingStatus as TEXT
    pub reading_status: String,

    // Timestamps
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// Get reading status as enum
    pub fn get_reading_status(&self) -> ReadingStatus {
        ReadingStatus::from_str_lossy(&self.reading_status)
    }

    /// Set reading status from enum
    pub fn set_reading_status(&mut self, status: ReadingStatus) {
        self.reading_status = status.as_str().to_string();
    }
}

// ============================================================================
// AGGREGATION ROWS
// ============================================================================

/// Key/count aggregation row (per-language, per-room statistics)
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct KeyCount {
    pub key: String,
    pub count: i64,
}

// ============================================================================
// NEW RECORD STRUCTS (for inserts)
// ============================================================================

/// New book record for insertion
///
/// Location levels are stored here as typed, but normalization (trimming,
/// blank ⇒ absent) happens in the repository before anything reaches storage.
/// New books always start as `not_read`; the schema default supplies it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub authors: String,
    pub language: String,
    pub genre: Option<String>,
    pub location_level1: String,
    pub location_level2: Option<String>,
    pub location_level3: Option<String>,
    pub location_level4: Option<String>,
    pub location_level5: Option<String>,
}

impl NewBook {
    pub fn new(title: String, authors: String, language: String, location_level1: String) -> Self {
        Self {
            title,
            authors,
            language,
            genre: None,
            location_level1,
            location_level2: None,
            location_level3: None,
            location_level4: None,
            location_level5: None,
        }
    }
}
