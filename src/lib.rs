//! Shoko - Comic/Manga Library Scanner
//!
//! This crate turns an unmanaged directory tree of comic, manga and ebook
//! files into a `Series -> Volume -> Chapter -> File` catalog, using nothing
//! but file names and folder paths.
//!
//! Data flows one way: the [`walker`] enumerates files, the [`parser`] reads
//! each one, and the [`aggregator`] groups the results into series. The
//! [`scanner`] ties the three together for a whole library.
//!
//! # Getting Started
//!
//! ```rust,no_run
//! use shoko::prelude::*;
//! use std::path::PathBuf;
//!
//! #[tokio::main]
//! async fn main() -> shoko::error::Result<()> {
//!     // 1. Configure the scan using the builder
//!     let config = ScannerConfig::builder()
//!         .library_type(LibraryType::Manga)
//!         .folders(vec![PathBuf::from("./manga")])
//!         .build()?;
//!
//!     // Optional: Run a pre-flight check
//!     config.preflight_check()?;
//!
//!     // 2. Scan the library
//!     let result = config.scan_library().await?;
//!
//!     // 3. Line the scan up against series the catalog already knows
//!     let known = vec![KnownSeries::new("Accel World", MangaFormat::Archive)];
//!     let reconciliation = result.reconcile(&known);
//!     println!(
//!         "{} matched, {} removed, {} new",
//!         reconciliation.matched.len(),
//!         reconciliation.removed.len(),
//!         reconciliation.new_series.len()
//!     );
//!
//!     Ok(())
//! }
//! ```
//!
//! Single files can be parsed without a scan through [`parser::parse`].

pub mod aggregator;
pub mod error;
pub mod parser;
pub mod path_utils;
pub mod scanner;
pub mod types;
pub mod walker;

// Publicly expose the main `ScannerConfig` struct and its builder
pub use scanner::ScannerConfig;
pub use scanner::ScannerConfigBuilder;

// Re-export core types for direct access
pub use aggregator::{LibraryScanResult, Reconciliation};
pub use types::{
    DEFAULT_CHAPTER, DEFAULT_VOLUME, KnownSeries, LibraryType, MangaFormat, ParsedSeries,
    ParserInfo, ScanStats,
};
pub use walker::{DirectoryWalker, WalkResult};

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types, allowing you to
/// import everything you need with a single `use shoko::prelude::*;` statement.
pub mod prelude {
    pub use super::{
        DEFAULT_CHAPTER, DEFAULT_VOLUME, DirectoryWalker, KnownSeries, LibraryScanResult,
        LibraryType, MangaFormat, ParsedSeries, ParserInfo, Reconciliation, ScanStats,
        ScannerConfig, ScannerConfigBuilder, WalkResult, error, parser, path_utils, types,
    };
    pub use regex::Regex;
    pub use std::path::{Path, PathBuf};
}
