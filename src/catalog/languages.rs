//! Language reference data and suggestion ordering
//!
//! A fixed ISO-639-1-like reference table, ordered by how likely a home
//! library is to shelve books in the language (not alphabetically), plus the
//! autocomplete ordering rule: languages already present in the catalog come
//! first, in reference order, followed by everything else.

use serde::Serialize;

/// One reference-table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LanguageItem {
    /// ISO-639-1 code, canonical lowercase
    pub code: &'static str,
    pub name: &'static str,
}

/// Fixed language reference table, in suggestion base order
pub const ISO_639_1_LANGUAGES: &[LanguageItem] = &[
    LanguageItem { code: "ru", name: "Russian" },
    LanguageItem { code: "en", name: "English" },
    LanguageItem { code: "zh", name: "Chinese" },
    LanguageItem { code: "de", name: "German" },
    LanguageItem { code: "fr", name: "French" },
    LanguageItem { code: "es", name: "Spanish" },
    LanguageItem { code: "it", name: "Italian" },
    LanguageItem { code: "pt", name: "Portuguese" },
    LanguageItem { code: "ja", name: "Japanese" },
    LanguageItem { code: "ko", name: "Korean" },
    LanguageItem { code: "ar", name: "Arabic" },
    LanguageItem { code: "hi", name: "Hindi" },
    LanguageItem { code: "uk", name: "Ukrainian" },
    LanguageItem { code: "pl", name: "Polish" },
    LanguageItem { code: "nl", name: "Dutch" },
    LanguageItem { code: "sv", name: "Swedish" },
    LanguageItem { code: "no", name: "Norwegian" },
    LanguageItem { code: "fi", name: "Finnish" },
    LanguageItem { code: "da", name: "Danish" },
    LanguageItem { code: "cs", name: "Czech" },
    LanguageItem { code: "sk", name: "Slovak" },
    LanguageItem { code: "el", name: "Greek" },
    LanguageItem { code: "he", name: "Hebrew" },
    LanguageItem { code: "tr", name: "Turkish" },
    LanguageItem { code: "fa", name: "Persian" },
    LanguageItem { code: "th", name: "Thai" },
    LanguageItem { code: "vi", name: "Vietnamese" },
    LanguageItem { code: "id", name: "Indonesian" },
    LanguageItem { code: "hu", name: "Hungarian" },
    LanguageItem { code: "ro", name: "Romanian" },
    LanguageItem { code: "bg", name: "Bulgarian" },
    LanguageItem { code: "sr", name: "Serbian" },
    LanguageItem { code: "hr", name: "Croatian" },
    LanguageItem { code: "lt", name: "Lithuanian" },
    LanguageItem { code: "lv", name: "Latvian" },
    LanguageItem { code: "et", name: "Estonian" },
    LanguageItem { code: "ka", name: "Georgian" },
    LanguageItem { code: "hy", name: "Armenian" },
    LanguageItem { code: "kk", name: "Kazakh" },
];

/// Autocomplete ordering: catalog languages first, then the rest
///
/// `used` codes are matched against the reference table case-insensitively.
/// Both partitions keep reference-table order; codes absent from the table are
/// ignored. No duplicates.
pub fn suggestions<'a>(
    used: &[String],
    reference: &'a [LanguageItem],
) -> Vec<&'a LanguageItem> {
    let used_lower: Vec<String> = used.iter().map(|code| code.to_lowercase()).collect();
    let is_used = |item: &LanguageItem| used_lower.iter().any(|code| code == item.code);

    let mut ordered: Vec<&LanguageItem> = reference.iter().filter(|item| is_used(item)).collect();
    ordered.extend(reference.iter().filter(|item| !is_used(item)));
    ordered
}
