//! Filename/path parser.
//!
//! [`parse`] turns one file path into a [`ParserInfo`] using only the file
//! name and the folders between it and its library root. It never fails on
//! odd names: anything it cannot read degrades to "the cleaned file name is
//! the series".

pub mod rules;
pub mod text;

use crate::error::{Error, Result};
use crate::path_utils::{
    get_file_name_lossy, get_file_stem_lossy, get_folders_till_root, is_macos_metadata_file,
    normalize_path, path_to_string_lossy,
};
use crate::types::{DEFAULT_CHAPTER, DEFAULT_VOLUME, LibraryType, MangaFormat, ParserInfo};
use log::debug;
use rules::{
    COMIC_CHAPTER, COMIC_SERIES, COMIC_SPECIAL, COMIC_VOLUME, EDITION, MANGA_CHAPTER,
    MANGA_SERIES, MANGA_SPECIAL, MANGA_VOLUME, Rule, SPECIAL_MARKER, first_capture,
};
use std::ops::ControlFlow;
use std::path::Path;
use text::{clean_title, format_value};

pub use rules::{
    ARCHIVE_FILE_EXTENSIONS, BOOK_FILE_EXTENSIONS, IMAGE_FILE_EXTENSIONS, SUPPORTED_EXTENSIONS,
    is_archive, is_book, is_cover_image, is_epub, is_image, is_pdf, parse_format,
};

fn capture_number(rules: &[Rule], name: &str, group: &str, default: &str) -> String {
    match first_capture(rules, name, group) {
        Some(caps) => format_value(&caps[group], caps.name("Part").is_some()),
        None => default.to_string(),
    }
}

fn capture_token(rules: &[Rule], name: &str, group: &str) -> String {
    first_capture(rules, name, group)
        .map(|caps| caps[group].to_string())
        .unwrap_or_default()
}

/// Series name from the manga table, cleaned. Empty when nothing matched.
pub fn parse_series(name: &str) -> String {
    first_capture(&MANGA_SERIES, name, "Series")
        .map(|caps| clean_title(&caps["Series"], false))
        .unwrap_or_default()
}

/// Series name from the comic table, cleaned with the comic vocabulary.
pub fn parse_comic_series(name: &str) -> String {
    first_capture(&COMIC_SERIES, name, "Series")
        .map(|caps| clean_title(&caps["Series"], true))
        .unwrap_or_default()
}

pub fn parse_volume(name: &str) -> String {
    capture_number(&MANGA_VOLUME, name, "Volume", DEFAULT_VOLUME)
}

pub fn parse_comic_volume(name: &str) -> String {
    capture_number(&COMIC_VOLUME, name, "Volume", DEFAULT_VOLUME)
}

pub fn parse_chapter(name: &str) -> String {
    capture_number(&MANGA_CHAPTER, name, "Chapter", DEFAULT_CHAPTER)
}

pub fn parse_comic_chapter(name: &str) -> String {
    capture_number(&COMIC_CHAPTER, name, "Chapter", DEFAULT_CHAPTER)
}

/// Edition tag such as `Full Contact Edition`, `Omnibus` or `Uncensored`,
/// without surrounding brackets.
pub fn parse_edition(name: &str) -> String {
    capture_token(&EDITION, name, "Edition")
        .chars()
        .filter(|c| !matches!(c, '{' | '}' | '[' | ']' | '(' | ')'))
        .collect()
}

pub fn parse_manga_special(name: &str) -> String {
    capture_token(&MANGA_SPECIAL, name, "Special")
}

pub fn parse_comic_special(name: &str) -> String {
    capture_token(&COMIC_SPECIAL, name, "Special")
}

/// True when the name carries an `SPnn` marker.
pub fn has_special_marker(name: &str) -> bool {
    first_capture(&SPECIAL_MARKER, name, "Special").is_some()
}

/// The field extractors of one library mode.
#[derive(Clone, Copy)]
struct Heuristics {
    series: fn(&str) -> String,
    volume: fn(&str) -> String,
    chapter: fn(&str) -> String,
    special: fn(&str) -> String,
    is_comic: bool,
}

impl Heuristics {
    fn for_library(library_type: LibraryType) -> Self {
        match library_type {
            LibraryType::Manga => Self {
                series: parse_series,
                volume: parse_volume,
                chapter: parse_chapter,
                special: parse_manga_special,
                is_comic: false,
            },
            LibraryType::Comic => Self {
                series: parse_comic_series,
                volume: parse_comic_volume,
                chapter: parse_comic_chapter,
                special: parse_comic_special,
                is_comic: true,
            },
        }
    }
}

/// Epub files are read with the manga table first, falling back to the comic
/// table one field at a time.
fn epub_fields(name: &str) -> (String, String, String) {
    let series = Some(parse_series(name))
        .filter(|series| !series.is_empty())
        .unwrap_or_else(|| parse_comic_series(name));
    let volume = Some(parse_volume(name))
        .filter(|volume| volume != DEFAULT_VOLUME)
        .unwrap_or_else(|| parse_comic_volume(name));
    let chapter = Some(parse_chapter(name))
        .filter(|chapter| chapter != DEFAULT_CHAPTER)
        .unwrap_or_else(|| parse_comic_chapter(name));
    (series, volume, chapter)
}

/// One step of the folder fallback.
///
/// Folders carrying special vocabulary are skipped. Volume and chapter only
/// fill fields that are still at their sentinel. The outermost folder is the
/// series candidate; resolving a series from it ends the fold.
fn fold_folder(
    mut info: ParserInfo,
    folder: &str,
    is_outermost: bool,
    heuristics: &Heuristics,
) -> ControlFlow<ParserInfo, ParserInfo> {
    if !parse_manga_special(folder).is_empty() {
        return ControlFlow::Continue(info);
    }

    let volume = (heuristics.volume)(folder);
    let chapter = (heuristics.chapter)(folder);
    if (info.volumes.is_empty() || info.volumes == DEFAULT_VOLUME) && volume != DEFAULT_VOLUME {
        info.volumes = volume;
    }
    if (info.chapters.is_empty() || info.chapters == DEFAULT_CHAPTER) && chapter != DEFAULT_CHAPTER
    {
        info.chapters = chapter;
    }

    if is_outermost && folder != info.series {
        let series = parse_series(folder);
        if series.is_empty() {
            info.series = clean_title(folder, heuristics.is_comic);
            return ControlFlow::Break(info);
        }
        if info.series.is_empty() || !folder.contains(info.series.as_str()) {
            info.series = series;
            return ControlFlow::Break(info);
        }
    }

    ControlFlow::Continue(info)
}

/// Folds the folder chain (innermost first) into `info`.
pub(crate) fn fallback_from_folders(
    info: ParserInfo,
    folders: &[String],
    library_type: LibraryType,
) -> ParserInfo {
    let heuristics = Heuristics::for_library(library_type);
    let outermost = folders.len().saturating_sub(1);
    let folded = folders
        .iter()
        .enumerate()
        .try_fold(info, |info, (index, folder)| {
            fold_folder(info, folder, index == outermost, &heuristics)
        });

    match folded {
        ControlFlow::Continue(info) | ControlFlow::Break(info) => info,
    }
}

/// Parses a single file.
///
/// `root_path` is the library folder the file was found under; the folders
/// between the two feed the fallback when the file name alone does not name a
/// series. Both paths may use `/` or `\` separators. Returns `Ok(None)` for
/// cover images, AppleDouble `._` files and for the rare name that yields no
/// series at all.
///
/// # Errors
///
/// [`Error::InvalidArgument`] when `file_path` is empty.
///
/// # Example
///
/// ```
/// use shoko::parser::parse;
/// use shoko::types::LibraryType;
/// use std::path::Path;
///
/// let info = parse(
///     Path::new("/manga/Accel World v01.cbz"),
///     Path::new("/manga"),
///     LibraryType::Manga,
/// )?
/// .unwrap();
/// assert_eq!(info.series, "Accel World");
/// assert_eq!(info.volumes, "1");
/// # Ok::<(), shoko::error::Error>(())
/// ```
pub fn parse(
    file_path: &Path,
    root_path: &Path,
    library_type: LibraryType,
) -> Result<Option<ParserInfo>> {
    if file_path.as_os_str().is_empty() {
        return Err(Error::InvalidArgument(
            "file path must not be empty".to_string(),
        ));
    }

    // Separators are unified before any name is taken apart
    let full_path = normalize_path(&path_to_string_lossy(file_path));
    let root = normalize_path(&path_to_string_lossy(root_path));
    let normalized = Path::new(&full_path);
    let file_name = get_file_stem_lossy(normalized);
    let format = parse_format(&full_path);
    let heuristics = Heuristics::for_library(library_type);

    if is_macos_metadata_file(normalized) {
        debug!("Skipping metadata file {}", full_path);
        return Ok(None);
    }
    if format == MangaFormat::Image && is_cover_image(&full_path) {
        debug!("Skipping cover image {}", full_path);
        return Ok(None);
    }

    let (series, volumes, chapters) = if format == MangaFormat::Epub {
        epub_fields(&file_name)
    } else {
        (
            (heuristics.series)(&file_name),
            (heuristics.volume)(&file_name),
            (heuristics.chapter)(&file_name),
        )
    };

    let mut info = ParserInfo {
        series,
        volumes,
        chapters,
        format,
        filename: get_file_name_lossy(normalized),
        full_file_path: file_path.to_path_buf(),
        ..Default::default()
    };

    let folders = || get_folders_till_root(&root, &full_path);

    // Images never carry title information, the folders do
    if format == MangaFormat::Image {
        info.volumes = DEFAULT_VOLUME.to_string();
        info.chapters = DEFAULT_CHAPTER.to_string();
        info.series.clear();
    }

    if info.series.is_empty() || format == MangaFormat::Image {
        info = fallback_from_folders(info, &folders(), library_type);
    }

    let edition = parse_edition(&file_name);
    if !edition.is_empty() {
        info.series = clean_title(&info.series.replace(&edition, ""), heuristics.is_comic);
        info.edition = Some(edition);
    }

    // "v20 c171-180+Omake" has real numbers; only number-less files become specials
    let special = (heuristics.special)(&file_name);
    if info.has_default_numbers() && !special.is_empty() {
        info.is_special = true;
        info = as_special(info, &folders(), library_type);
    }

    if has_special_marker(&file_name) {
        info.is_special = true;
        info = as_special(info, &folders(), library_type);
    }

    if info.series.is_empty() {
        info.series = clean_title(&file_name, heuristics.is_comic);
    }

    // Pdfs may leave a literal ".pdf" inside the title
    let cut = info.series.len().saturating_sub(".pdf".len());
    if format == MangaFormat::Pdf
        && info.series.is_char_boundary(cut)
        && info.series[cut..].eq_ignore_ascii_case(".pdf")
    {
        info.series.truncate(cut);
    }

    if info.series.is_empty() {
        debug!("No series could be parsed from {}", full_path);
        return Ok(None);
    }

    info.title = if info.is_special {
        info.filename.clone()
    } else {
        info.chapters.clone()
    };

    Ok(Some(info))
}

/// Re-runs the folder fallback for a special. Only the series survives:
/// specials always carry sentinel numbers.
fn as_special(info: ParserInfo, folders: &[String], library_type: LibraryType) -> ParserInfo {
    let mut info = fallback_from_folders(info, folders, library_type);
    info.volumes = DEFAULT_VOLUME.to_string();
    info.chapters = DEFAULT_CHAPTER.to_string();
    info
}
