use chrono::Utc;
use futures::future::try_join_all;
use log::{debug, info, warn};
use rayon::prelude::*;
use regex::{Regex, RegexBuilder};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::spawn_blocking;

use crate::aggregator::LibraryScanResult;
use crate::error::{Error, Result};
use crate::parser::{self, SUPPORTED_EXTENSIONS};
use crate::types::{LibraryType, ParserInfo, ScanStats};
use crate::walker::DirectoryWalker;

/// The library scan configuration, built declaratively using the builder pattern.
///
/// A scan walks every configured folder, parses each supported file and
/// groups the results into a [`LibraryScanResult`]:
///
/// - [`scan_library`](ScannerConfig::scan_library): async, folders scanned concurrently
/// - [`scan_library_blocking`](ScannerConfig::scan_library_blocking): same result without a runtime
///
/// ## Builder Pattern
///
/// ```rust,no_run
/// # use shoko::prelude::*;
/// # use std::path::PathBuf;
/// let config = ScannerConfig::builder()
///     .library_type(LibraryType::Manga)
///     .folders(vec![PathBuf::from("./manga")])
///     .build()
///     .expect("Invalid configuration");
/// ```
#[derive(Debug, Clone, derive_builder::Builder)]
#[builder(setter(into, strip_option), build_fn(validate = "Self::validate"))]
#[cfg_attr(feature = "specta", derive(specta::Type))]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ScannerConfig {
    /// Which family of filename heuristics to apply.
    #[builder(default)]
    pub library_type: LibraryType,

    /// Library root folders. Every file is parsed relative to the root it was found under.
    pub folders: Vec<PathBuf>,

    /// Regex matched against each file's extension (with leading dot, lowercased).
    ///
    /// Defaults to [`SUPPORTED_EXTENSIONS`]: archives, images and books.
    ///
    /// Example: `r"\.cbz|\.cbr"` to only pick up comic archives
    #[builder(default)]
    pub file_extensions_str: Option<String>,

    /// Regex for paths to leave out. Matched against the `/`-normalized path of
    /// every directory and file; a matching directory is not descended into.
    #[builder(default)]
    pub exclude_pattern_str: Option<String>,

    /// How many library folders are scanned at the same time.
    #[builder(default = "4")]
    pub max_concurrent_folders: usize,

    /// Worker threads used to walk a single folder.
    #[builder(default = "num_cpus::get().min(8)")]
    pub walker_threads: usize,
}

/// What a single root contributed to a scan.
struct RootScan {
    found: usize,
    infos: Vec<ParserInfo>,
}

impl ScannerConfig {
    /// Creates a new builder for configuring `ScannerConfig`.
    pub fn builder() -> ScannerConfigBuilder {
        ScannerConfigBuilder::default()
    }

    /// Performs validation checks on the configuration without touching the
    /// file system beyond existence checks.
    ///
    /// Folders that do not exist are only warned about: they scan as empty.
    /// Both scan entry points call this.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use shoko::prelude::*;
    /// # use std::path::PathBuf;
    /// # fn main() -> shoko::error::Result<()> {
    /// let config = ScannerConfig::builder()
    ///     .folders(vec![PathBuf::from("./manga")])
    ///     .build()?;
    ///
    /// config.preflight_check()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn preflight_check(&self) -> Result<&Self> {
        if self.folders.is_empty() {
            return Err(Error::Other(
                "At least one library folder is required".to_string(),
            ));
        }
        if let Some(empty) = self.folders.iter().find(|f| f.as_os_str().is_empty()) {
            return Err(Error::InvalidPath(
                empty.clone(),
                "Library folder must not be empty.".to_string(),
            ));
        }
        if self.walker_threads == 0 {
            return Err(Error::Other("walker_threads must be at least 1.".to_string()));
        }
        if self.max_concurrent_folders == 0 {
            return Err(Error::Other(
                "max_concurrent_folders must be at least 1.".to_string(),
            ));
        }

        for folder in self.folders.iter().filter(|f| !f.is_dir()) {
            warn!("Library folder {} does not exist", folder.display());
        }

        Ok(self)
    }

    /// Compiles the extension filter and the optional exclusion pattern.
    fn compile_patterns(&self) -> Result<(Regex, Option<Regex>)> {
        let extensions = self
            .file_extensions_str
            .as_deref()
            .unwrap_or(SUPPORTED_EXTENSIONS);
        let extension_regex = RegexBuilder::new(extensions)
            .case_insensitive(true)
            .build()?;
        let exclude_regex = self
            .exclude_pattern_str
            .as_deref()
            .map(Regex::new)
            .transpose()?;
        Ok((extension_regex, exclude_regex))
    }

    /// Walks and parses one root. Parsing runs on rayon and keeps walk order.
    fn scan_root(root: &Path, library_type: LibraryType, walker: &DirectoryWalker) -> Result<RootScan> {
        let walked = walker.walk(&[root])?;
        debug!("Found {} files in {}", walked.count, root.display());

        let parsed: Vec<Option<ParserInfo>> = walked
            .files
            .par_iter()
            .map(|file| parser::parse(file, root, library_type))
            .collect::<Result<_>>()?;

        Ok(RootScan {
            found: walked.count,
            infos: parsed.into_iter().flatten().collect(),
        })
    }

    /// Groups per-root results in folder order.
    fn aggregate(roots: Vec<RootScan>, mut stats: ScanStats) -> LibraryScanResult {
        let mut result = LibraryScanResult::new();
        for root in roots {
            stats.files_found += root.found;
            stats.files_parsed += root.infos.len();
            for info in root.infos {
                result.track_series(info);
            }
        }
        stats.files_discarded = stats.files_found - stats.files_parsed;
        stats.finished_at = Utc::now();

        info!(
            "Scan finished: {} series from {} files ({} discarded) in {} ms",
            result.len(),
            stats.files_found,
            stats.files_discarded,
            stats.elapsed_ms()
        );

        result.stats = stats;
        result
    }

    /// Scans every library folder and groups the parsed files into series.
    ///
    /// Folders are scanned concurrently, at most `max_concurrent_folders` at a
    /// time, each on a blocking thread. The grouping itself happens once all
    /// folders are done, in folder order, so repeated scans of an unchanged
    /// tree produce the same map.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use shoko::prelude::*;
    /// # use std::path::PathBuf;
    /// # #[tokio::main]
    /// # async fn main() -> shoko::error::Result<()> {
    /// let config = ScannerConfig::builder()
    ///     .folders(vec![PathBuf::from("./manga")])
    ///     .build()?;
    ///
    /// let result = config.scan_library().await?;
    /// for (series, files) in result.iter() {
    ///     println!("{} ({:?}): {} files", series.name, series.format, files.len());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn scan_library(&self) -> Result<LibraryScanResult> {
        self.preflight_check()?;
        let stats = ScanStats {
            started_at: Utc::now(),
            ..Default::default()
        };
        let (extension_regex, exclude_regex) = self.compile_patterns()?;

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent_folders));
        let mut handles = Vec::with_capacity(self.folders.len());

        for folder in &self.folders {
            let semaphore = Arc::clone(&semaphore);
            let root = folder.clone();
            let extension_regex = extension_regex.clone();
            let exclude_regex = exclude_regex.clone();
            let library_type = self.library_type;
            let threads = self.walker_threads;

            handles.push(tokio::spawn(async move {
                let _permit = semaphore.acquire().await?;
                // Directory reads and regex work are blocking
                let scanned = spawn_blocking(move || {
                    let walker = DirectoryWalker::new(&extension_regex, exclude_regex.as_ref(), threads);
                    Self::scan_root(&root, library_type, &walker)
                })
                .await??;
                Ok::<RootScan, Error>(scanned)
            }));
        }

        let roots = try_join_all(handles)
            .await?
            .into_iter()
            .collect::<Result<Vec<RootScan>>>()?;

        Ok(Self::aggregate(roots, stats))
    }

    /// Same as [`scan_library`](ScannerConfig::scan_library), one folder after
    /// another on the calling thread. Each walk still uses its own pool.
    pub fn scan_library_blocking(&self) -> Result<LibraryScanResult> {
        self.preflight_check()?;
        let stats = ScanStats {
            started_at: Utc::now(),
            ..Default::default()
        };
        let (extension_regex, exclude_regex) = self.compile_patterns()?;
        let walker = DirectoryWalker::new(&extension_regex, exclude_regex.as_ref(), self.walker_threads);

        let roots = self
            .folders
            .iter()
            .map(|folder| Self::scan_root(folder, self.library_type, &walker))
            .collect::<Result<Vec<RootScan>>>()?;

        Ok(Self::aggregate(roots, stats))
    }
}

impl ScannerConfigBuilder {
    fn validate(&self) -> std::result::Result<(), String> {
        if let Some(Some(s)) = &self.file_extensions_str {
            if Regex::new(s).is_err() {
                return Err(format!("Invalid file_extensions regex: {}", s));
            }
        }
        if let Some(Some(s)) = &self.exclude_pattern_str {
            if Regex::new(s).is_err() {
                return Err(format!("Invalid exclude_pattern regex: {}", s));
            }
        }
        if let Some(0) = self.walker_threads {
            return Err("walker_threads must be at least 1.".to_string());
        }
        if let Some(0) = self.max_concurrent_folders {
            return Err("max_concurrent_folders must be at least 1.".to_string());
        }

        Ok(())
    }
}
