//! Core data types and enums for the Shoko scanner.
//!
//! This module defines the handoff contract between the scanner and whatever
//! persists its output:
//! - Library settings (`LibraryType`)
//! - Per-file results (`ParserInfo`, `MangaFormat`)
//! - Grouping keys (`ParsedSeries`) and the read-only snapshot of already known
//!   series (`KnownSeries`)
//! - Run statistics (`ScanStats`)

use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;

/// Sentinel for "no volume was parsed".
pub const DEFAULT_VOLUME: &str = "0";
/// Sentinel for "no chapter was parsed".
pub const DEFAULT_CHAPTER: &str = "0";

/// Selects which family of filename heuristics is applied to a library.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "specta", derive(specta::Type))]
pub enum LibraryType {
    #[default]
    Manga, // "Series v01 c001" style: volume before chapter, series first
    Comic, // "Series 001 (2012)" / "Series #12" style: issue numbers, tomes
}

/// Container format of a cataloged file, derived from its extension.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "specta", derive(specta::Type))]
pub enum MangaFormat {
    Archive,
    Image,
    Pdf,
    Epub,
    #[default]
    Unknown,
}

/// Everything the parser could learn about a single file from its name and
/// the folders between it and the library root.
///
/// A `ParserInfo` with an empty `series` is never handed out; the parser
/// returns `None` instead.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "specta", derive(specta::Type))]
pub struct ParserInfo {
    pub series: String,
    /// Volume number, a hyphenated range such as `"16-17"`, or [`DEFAULT_VOLUME`].
    pub volumes: String,
    /// Chapter number, a hyphenated range, or [`DEFAULT_CHAPTER`].
    pub chapters: String,
    /// Human facing label. For specials this is the raw file name.
    pub title: String,
    pub edition: Option<String>,
    pub format: MangaFormat,
    pub is_special: bool,
    pub filename: String,
    pub full_file_path: PathBuf,
}

impl ParserInfo {
    /// True when neither a volume nor a chapter was resolved.
    pub fn has_default_numbers(&self) -> bool {
        self.volumes == DEFAULT_VOLUME && self.chapters == DEFAULT_CHAPTER
    }
}

/// Grouping key of a scan: a normalized series name plus its format.
///
/// Identity is `(normalized_name, format)` only. `name` carries the first
/// spelling seen for the group and does not take part in comparisons.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "specta", derive(specta::Type))]
pub struct ParsedSeries {
    pub name: String,
    pub normalized_name: String,
    pub format: MangaFormat,
}

impl ParsedSeries {
    /// Builds a key for `name`, normalizing it with [`crate::parser::text::normalize`].
    pub fn new(name: &str, format: MangaFormat) -> Self {
        Self {
            name: name.to_string(),
            normalized_name: crate::parser::text::normalize(name),
            format,
        }
    }
}

impl PartialEq for ParsedSeries {
    fn eq(&self, other: &Self) -> bool {
        self.normalized_name == other.normalized_name && self.format == other.format
    }
}

impl Eq for ParsedSeries {}

impl Hash for ParsedSeries {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized_name.hash(state);
        self.format.hash(state);
    }
}

impl PartialOrd for ParsedSeries {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ParsedSeries {
    fn cmp(&self, other: &Self) -> Ordering {
        self.normalized_name
            .cmp(&other.normalized_name)
            .then(self.format.cmp(&other.format))
    }
}

/// A series that already exists in the catalog, as supplied by the
/// persistence layer. Only read during reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "specta", derive(specta::Type))]
pub struct KnownSeries {
    pub name: String,
    pub original_name: Option<String>,
    pub localized_name: Option<String>,
    pub format: MangaFormat,
}

impl KnownSeries {
    pub fn new(name: impl Into<String>, format: MangaFormat) -> Self {
        Self {
            name: name.into(),
            format,
            ..Default::default()
        }
    }

    /// All non-empty names this series is known by.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str())
            .chain(self.original_name.as_deref())
            .chain(self.localized_name.as_deref())
            .filter(|name| !name.is_empty())
    }
}

/// Counters and timestamps for one scan pass.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScanStats {
    pub files_found: usize,
    pub files_parsed: usize,
    /// Files the parser returned `None` for (cover images, unusable names).
    pub files_discarded: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl Default for ScanStats {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            files_found: 0,
            files_parsed: 0,
            files_discarded: 0,
            started_at: now,
            finished_at: now,
        }
    }
}

impl ScanStats {
    /// Wall clock duration of the scan in milliseconds.
    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}
