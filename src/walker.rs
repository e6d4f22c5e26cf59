//! Parallel directory traversal.
//!
//! The walker fans out one unit of work per top-level subdirectory of a root
//! onto a bounded rayon pool. Every unit walks its subtree sequentially and
//! keeps its own result list; a single combine step joins them. Files lying
//! directly in the root are handled by the calling thread.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use log::{debug, warn};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use regex::Regex;

use crate::error::Result;
use crate::parser::rules::file_extension;
use crate::path_utils::{
    exceeds_max_path_length, get_file_name_lossy, is_excluded_directory_name,
    is_macos_metadata_file, normalize_path, path_to_string_lossy,
};

/// Files found by [`DirectoryWalker::walk`], sorted, and their count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkResult {
    pub files: Vec<PathBuf>,
    pub count: usize,
}

/// Enumerates files under library roots.
#[derive(Debug)]
pub struct DirectoryWalker<'a> {
    extension_regex: &'a Regex, // Matched against ".ext" of each file
    exclude_regex: Option<&'a Regex>, // Matched against the normalized path of every entry
    threads: usize,
}

impl<'a> DirectoryWalker<'a> {
    /// Creates a walker.
    ///
    /// # Arguments
    ///
    /// * `extension_regex` - Files whose extension (with leading dot) matches are reported
    /// * `exclude_regex` - Optional pattern; matching directories and files are skipped
    /// * `threads` - Size of the worker pool, at least 1
    pub fn new(extension_regex: &'a Regex, exclude_regex: Option<&'a Regex>, threads: usize) -> Self {
        Self {
            extension_regex,
            exclude_regex,
            threads: threads.max(1),
        }
    }

    fn build_pool(&self) -> Result<ThreadPool> {
        Ok(ThreadPoolBuilder::new().num_threads(self.threads).build()?)
    }

    /// Walks every root and returns the matching files, sorted.
    ///
    /// A root that does not exist or cannot be read contributes nothing.
    pub fn walk<P: AsRef<Path>>(&self, roots: &[P]) -> Result<WalkResult> {
        let pool = self.build_pool()?;
        let mut files = Vec::new();

        for root in roots {
            let root = root.as_ref();
            let (top_level_files, subdirectories) = self.split_root(root);
            files.extend(top_level_files);

            // Fan out per subdirectory, fan in by concatenation
            let nested: Vec<Vec<PathBuf>> = pool.install(|| {
                subdirectories
                    .par_iter()
                    .map(|directory| {
                        let mut local = Vec::new();
                        self.walk_unit(directory, &mut |file| local.push(file));
                        local
                    })
                    .collect()
            });
            files.extend(nested.into_iter().flatten());
        }

        files.par_sort_unstable();
        let count = files.len();
        Ok(WalkResult { files, count })
    }

    /// Walks one root and hands every matching file to `sink`.
    ///
    /// `sink` is called concurrently from the worker pool, in no particular
    /// order. Returns the number of files reported.
    pub fn traverse<F>(&self, root: &Path, sink: F) -> Result<usize>
    where
        F: Fn(&Path) + Sync,
    {
        let pool = self.build_pool()?;
        let (top_level_files, subdirectories) = self.split_root(root);

        for file in &top_level_files {
            sink(file);
        }

        let reported = AtomicUsize::new(top_level_files.len());
        pool.install(|| {
            subdirectories.par_iter().for_each(|directory| {
                let mut local = 0;
                self.walk_unit(directory, &mut |file| {
                    sink(&file);
                    local += 1;
                });
                reported.fetch_add(local, Ordering::Relaxed);
            })
        });

        Ok(reported.into_inner())
    }

    /// Reads a root once: matching files directly inside it, and the
    /// subdirectories that become units of work.
    fn split_root(&self, root: &Path) -> (Vec<PathBuf>, Vec<PathBuf>) {
        let mut files = Vec::new();
        let mut subdirectories = Vec::new();

        if !root.is_dir() {
            debug!("Library folder {} does not exist, skipping", root.display());
            return (files, subdirectories);
        }

        self.read_directory(root, &mut |path, is_dir| {
            if is_dir {
                subdirectories.push(path);
            } else {
                files.push(path);
            }
        });

        (files, subdirectories)
    }

    /// Walks `directory` and everything below it on the current thread.
    fn walk_unit(&self, directory: &Path, on_file: &mut dyn FnMut(PathBuf)) {
        let mut pending = vec![directory.to_path_buf()];
        while let Some(current) = pending.pop() {
            self.read_directory(&current, &mut |path, is_dir| {
                if is_dir {
                    pending.push(path);
                } else {
                    on_file(path);
                }
            });
        }
    }

    /// Lists one directory, reporting accepted subdirectories and matching
    /// files. Errors are logged and the directory is skipped.
    fn read_directory(&self, directory: &Path, accept: &mut dyn FnMut(PathBuf, bool)) {
        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Could not read directory {}: {}", directory.display(), e);
                return;
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Could not read an entry of {}: {}", directory.display(), e);
                    continue;
                }
            };
            let path = entry.path();

            if exceeds_max_path_length(&path) {
                debug!("Skipping over-long path under {}", directory.display());
                continue;
            }
            if self.is_custom_excluded(&path) {
                continue;
            }

            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            if is_dir {
                if !is_excluded_directory_name(&get_file_name_lossy(&path)) {
                    accept(path, true);
                }
            } else if self.is_matching_file(&path) {
                accept(path, false);
            }
        }
    }

    fn is_custom_excluded(&self, path: &Path) -> bool {
        self.exclude_regex
            .is_some_and(|regex| regex.is_match(&normalize_path(&path_to_string_lossy(path))))
    }

    fn is_matching_file(&self, path: &Path) -> bool {
        path.is_file()
            && !is_macos_metadata_file(path)
            && self
                .extension_regex
                .is_match(&file_extension(&path_to_string_lossy(path)))
    }
}
