//! Path utilities for separator-agnostic path handling.
//!
//! Library roots arrive from users and databases with `/` or `\` separators,
//! optional trailing separators and mixed-case drive letters. Everything in
//! this module works on paths normalized to `/` first, so comparisons and
//! folder-chain extraction behave the same on every platform.

use std::collections::BTreeMap;
use std::path::Path;

/// Maximum path length the walker will descend into or report.
#[cfg(windows)]
pub const MAX_PATH_LENGTH: usize = 260;
#[cfg(not(windows))]
pub const MAX_PATH_LENGTH: usize = 4096;

/// Folder names (case-insensitive substrings) that are never traversed.
/// NAS thumbnail stores, Finder metadata and package folders.
const BLACKLISTED_FOLDERS: [&str; 4] = ["@eadir", ".ds_store", ".qpkg", "__macosx"];

/// Folder name prefixes of NAS snapshot and recycle bins.
const BLACKLISTED_FOLDER_PREFIXES: [&str; 2] = ["@recently-snapshot", "@recycle"];

/// Prefix of AppleDouble metadata files.
const MACOS_METADATA_FILE_PREFIX: &str = "._";

/// Converts every `\` into `/`.
///
/// # Example
///
/// ```
/// assert_eq!(shoko::path_utils::normalize_path(r"C:\Manga\One"), "C:/Manga/One");
/// ```
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// Converts a path to a string with fallback to lossy conversion.
pub fn path_to_string_lossy(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

/// Gets the file name from a path with fallback to lossy conversion.
///
/// Returns an empty string when the path has no file name component.
pub fn get_file_name_lossy(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Gets the file name without its final extension, lossy.
pub fn get_file_stem_lossy(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// True when the path is longer than [`MAX_PATH_LENGTH`].
pub fn exceeds_max_path_length(path: &Path) -> bool {
    path.as_os_str().len() > MAX_PATH_LENGTH
}

/// Checks whether a single directory name must be skipped during traversal.
///
/// Hidden folders (leading `.`), NAS metadata folders such as `@eaDir`,
/// `.qpkg` package folders, `__MACOSX` and snapshot/recycle bins are excluded.
pub fn is_excluded_directory_name(name: &str) -> bool {
    if name.starts_with('.') {
        return true;
    }
    let lower = name.to_lowercase();
    BLACKLISTED_FOLDERS.iter().any(|folder| lower.contains(folder))
        || BLACKLISTED_FOLDER_PREFIXES
            .iter()
            .any(|prefix| lower.starts_with(prefix))
}

/// True for AppleDouble `._name` metadata files.
pub fn is_macos_metadata_file(path: &Path) -> bool {
    get_file_name_lossy(path).starts_with(MACOS_METADATA_FILE_PREFIX)
}

fn trim_trailing_separator(path: &str) -> &str {
    path.trim_end_matches('/')
}

/// Returns the part of `path` below `root`, without the joining separator.
///
/// Both arguments must already be normalized and trimmed. The comparison is
/// ASCII case-insensitive so `c:/manga` owns `C:/Manga/...`.
fn strip_root_prefix<'a>(path: &'a str, root: &str) -> Option<&'a str> {
    if path.len() < root.len() || !path.is_char_boundary(root.len()) {
        return None;
    }
    let (head, rest) = path.split_at(root.len());
    if !head.eq_ignore_ascii_case(root) {
        return None;
    }
    if rest.is_empty() {
        return Some(rest);
    }
    rest.strip_prefix('/')
}

/// True when `path` lies inside (or is) `root`. Separators and trailing
/// separators are ignored.
pub fn is_under_root(root: &str, path: &str) -> bool {
    let root = normalize_path(root);
    let path = normalize_path(path);
    strip_root_prefix(
        trim_trailing_separator(&path),
        trim_trailing_separator(&root),
    )
    .is_some()
}

/// Lists the folder names between `full_path` and `root_path`, innermost first.
///
/// `root_path` itself is excluded. Mixed `/` and `\` separators and trailing
/// separators on either argument are tolerated. A path outside `root_path`
/// yields an empty list, as does a file sitting directly in the root.
///
/// Without a trailing separator the last segment is taken to be a file when it
/// has an extension, and is dropped. That check is purely lexical, so a last
/// folder with a dot in its name (`Love Hina/Vol. 1`) is dropped as well; pass
/// `Love Hina/Vol. 1/` to keep it. Folders ending with a separator are always
/// kept.
///
/// # Example
///
/// ```
/// use shoko::path_utils::get_folders_till_root;
///
/// let folders = get_folders_till_root("C:/Manga/", "C:/Manga/Love Hina/Specials/Omake/");
/// assert_eq!(folders, vec!["Omake", "Specials", "Love Hina"]);
/// ```
pub fn get_folders_till_root(root_path: &str, full_path: &str) -> Vec<String> {
    let root = normalize_path(root_path);
    let root = trim_trailing_separator(&root);
    let normalized = normalize_path(full_path);
    let ends_with_separator = normalized.ends_with('/');
    let path = trim_trailing_separator(&normalized);

    let Some(relative) = strip_root_prefix(path, root) else {
        return Vec::new();
    };

    let mut segments: Vec<&str> = relative.split('/').filter(|s| !s.is_empty()).collect();
    if !ends_with_separator
        && segments
            .last()
            .is_some_and(|last| Path::new(last).extension().is_some())
    {
        segments.pop();
    }

    segments.into_iter().rev().map(str::to_string).collect()
}

/// Finds, for each file, the shallowest folder strictly below its owning
/// library root. Used to guess series root folders.
///
/// Files outside every root contribute nothing. A file sitting directly in a
/// root means the root itself is the only useful folder: the root is added
/// and the search stops. Keys are normalized with `/` and carry no trailing
/// separator; values are always empty.
///
/// # Example
///
/// ```
/// use shoko::path_utils::find_highest_directories_from_files;
///
/// let dirs = find_highest_directories_from_files(
///     &["C:/Manga/"],
///     &["C:/Manga/Love Hina/Vol. 01.cbz"],
/// );
/// assert_eq!(dirs.get("C:/Manga/Love Hina"), Some(&String::new()));
/// assert_eq!(dirs.len(), 1);
/// ```
pub fn find_highest_directories_from_files<R, F>(
    library_folders: &[R],
    file_paths: &[F],
) -> BTreeMap<String, String>
where
    R: AsRef<str>,
    F: AsRef<str>,
{
    let mut dirs = BTreeMap::new();

    for folder in library_folders {
        let folder = normalize_path(folder.as_ref());
        let folder = trim_trailing_separator(&folder);

        for file in file_paths {
            let file = normalize_path(file.as_ref());
            if strip_root_prefix(trim_trailing_separator(&file), folder).is_none() {
                continue;
            }

            let parts = get_folders_till_root(folder, &file);
            match parts.last() {
                Some(top) => {
                    dirs.entry(format!("{}/{}", folder, top))
                        .or_insert_with(String::new);
                }
                None => {
                    dirs.insert(folder.to_string(), String::new());
                    return dirs;
                }
            }
        }
    }

    dirs
}
