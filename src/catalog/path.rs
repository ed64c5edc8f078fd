//! Location path value type
//!
//! The five free-text location levels as entered by the user, before and
//! after normalization. Normalization trims whitespace and turns blank
//! sub-levels into "absent"; it never invents or reorders levels.

use crate::storage::models::Book;

/// Trim a level value; blank becomes absent
pub fn normalize_level(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// A five-level location path (room, then up to four optional sub-levels)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationPath {
    /// Room; mandatory for a valid path
    pub level1: String,
    pub level2: Option<String>,
    pub level3: Option<String>,
    pub level4: Option<String>,
    pub level5: Option<String>,
}

impl LocationPath {
    /// Path consisting only of a room
    pub fn new(level1: impl Into<String>) -> Self {
        Self {
            level1: level1.into(),
            ..Self::default()
        }
    }

    /// The path a book's flat columns currently describe
    pub fn from_book(book: &Book) -> Self {
        Self {
            level1: book.location_level1.clone(),
            level2: book.location_level2.clone(),
            level3: book.location_level3.clone(),
            level4: book.location_level4.clone(),
            level5: book.location_level5.clone(),
        }
    }

    /// Normalized copy: trimmed level1, blank sub-levels dropped to `None`
    ///
    /// A blank level1 stays an empty string here; whether that is an error is
    /// the caller's contract, not this type's.
    pub fn normalized(&self) -> Self {
        Self {
            level1: self.level1.trim().to_string(),
            level2: normalize_level(self.level2.as_deref()),
            level3: normalize_level(self.level3.as_deref()),
            level4: normalize_level(self.level4.as_deref()),
            level5: normalize_level(self.level5.as_deref()),
        }
    }

    /// Present sub-levels (2-5) in order, gaps skipped
    ///
    /// This is the resolution order: an absent level2 with a present level3
    /// yields level3 first, attaching it directly under the room.
    pub fn sub_levels(&self) -> impl Iterator<Item = &str> {
        [
            self.level2.as_deref(),
            self.level3.as_deref(),
            self.level4.as_deref(),
            self.level5.as_deref(),
        ]
        .into_iter()
        .flatten()
    }
}
