//! Unit tests for the file name parser.
//!
//! Parsing never touches the file system, so these run on made-up paths.

use shoko::error::Result;
use shoko::parser::{self, parse};
use shoko::parser::text::{max_number_from_range, min_number_from_range, pad_zeros};
use shoko::prelude::*;

fn parse_manga(file: &str) -> Result<Option<ParserInfo>> {
    parse(Path::new(file), Path::new("/manga"), LibraryType::Manga)
}

fn parse_comic(file: &str) -> Result<Option<ParserInfo>> {
    parse(Path::new(file), Path::new("/comics"), LibraryType::Comic)
}

#[test]
fn test_parse_series_and_volume() -> Result<()> {
    let info = parse_manga("/manga/Accel World v01.cbz")?.unwrap();
    assert_eq!(info.series, "Accel World");
    assert_eq!(info.volumes, "1");
    assert_eq!(info.chapters, DEFAULT_CHAPTER);
    assert_eq!(info.format, MangaFormat::Archive);
    assert_eq!(info.filename, "Accel World v01.cbz");
    assert_eq!(info.full_file_path, PathBuf::from("/manga/Accel World v01.cbz"));
    assert_eq!(info.title, info.chapters);
    assert!(!info.is_special);
    Ok(())
}

#[test]
fn test_volume_round_trips_through_padding() -> Result<()> {
    for n in [1u32, 9, 10, 42, 100] {
        let file = format!("/manga/Accel World v{:02}.cbz", n);
        let info = parse_manga(&file)?.unwrap();
        assert_eq!(info.volumes, n.to_string(), "{}", file);
        assert_eq!(pad_zeros(&info.volumes), format!("{:03}", n));
    }
    Ok(())
}

#[test]
fn test_volume_range() -> Result<()> {
    let info = parse_manga("/manga/Dance in the Vampire Bund v16-17 (Digital) (NiceDragon).cbz")?
        .unwrap();
    assert_eq!(info.series, "Dance in the Vampire Bund");
    assert_eq!(info.volumes, "16-17");
    assert_eq!(info.chapters, DEFAULT_CHAPTER);
    assert_eq!(min_number_from_range(&info.volumes), 16.0);
    assert_eq!(max_number_from_range(&info.volumes), 17.0);
    Ok(())
}

#[test]
fn test_special_takes_series_from_folder() -> Result<()> {
    let info = parse_manga("/manga/Love Hina/Love Hina - Special.cbz")?.unwrap();
    assert_eq!(info.series, "Love Hina");
    assert!(info.is_special);
    assert!(info.has_default_numbers());
    assert_eq!(info.title, "Love Hina - Special.cbz");
    Ok(())
}

#[test]
fn test_special_marker() -> Result<()> {
    let info = parse_manga("/manga/Grand Blue Dreaming/Grand Blue Dreaming - SP02.cbz")?.unwrap();
    assert_eq!(info.series, "Grand Blue Dreaming");
    assert!(info.is_special);
    assert_eq!(info.volumes, DEFAULT_VOLUME);
    assert_eq!(info.chapters, DEFAULT_CHAPTER);
    assert_eq!(info.title, info.filename);
    Ok(())
}

#[test]
fn test_edition_is_split_from_series() -> Result<()> {
    let info =
        parse_manga("/manga/Tenjo Tenge {Full Contact Edition} v01 (2011) (Digital) (ASTC).cbz")?
            .unwrap();
    assert_eq!(info.series, "Tenjo Tenge");
    assert_eq!(info.edition.as_deref(), Some("Full Contact Edition"));
    assert_eq!(info.volumes, "1");
    Ok(())
}

#[test]
fn test_cover_images_are_discarded() -> Result<()> {
    assert_eq!(parse_manga("/manga/Accel World/cover.jpg")?, None);
    assert_eq!(parse_manga("/manga/Accel World/folder.png")?, None);
    Ok(())
}

#[test]
fn test_images_take_everything_from_folders() -> Result<()> {
    let info = parse_manga("/manga/Accel World/Vol 1/001.jpg")?.unwrap();
    assert_eq!(info.format, MangaFormat::Image);
    assert_eq!(info.series, "Accel World");
    assert_eq!(info.volumes, "1");
    assert_eq!(info.chapters, DEFAULT_CHAPTER);
    Ok(())
}

#[test]
fn test_backslash_paths_are_split_into_folders() -> Result<()> {
    let info = parse(
        Path::new(r"C:\Manga\Accel World\Accel World v01.cbz"),
        Path::new(r"C:\Manga"),
        LibraryType::Manga,
    )?
    .unwrap();
    assert_eq!(info.series, "Accel World");
    assert_eq!(info.volumes, "1");
    assert_eq!(info.filename, "Accel World v01.cbz");
    assert_eq!(info.format, MangaFormat::Archive);

    // Images rely on the folder chain, which must survive the separators too
    let info = parse(
        Path::new(r"C:\Manga\Accel World\Vol 1\001.jpg"),
        Path::new(r"C:\Manga\"),
        LibraryType::Manga,
    )?
    .unwrap();
    assert_eq!(info.series, "Accel World");
    assert_eq!(info.volumes, "1");
    assert_eq!(info.filename, "001.jpg");

    assert_eq!(
        parse(
            Path::new(r"C:\Manga\Accel World\cover.jpg"),
            Path::new(r"C:\Manga"),
            LibraryType::Manga,
        )?,
        None
    );
    Ok(())
}

#[test]
fn test_macos_metadata_files_are_discarded() -> Result<()> {
    assert_eq!(parse_manga("/manga/Accel World/._001.png")?, None);
    assert_eq!(parse_manga("/manga/Accel World/._Accel World v01.cbz")?, None);
    Ok(())
}

#[test]
fn test_unparseable_name_falls_back_to_clean_file_name() -> Result<()> {
    let info = parse_manga("/manga/Nothing.pdf")?.unwrap();
    assert_eq!(info.series, "Nothing");
    assert_eq!(info.format, MangaFormat::Pdf);
    assert!(info.has_default_numbers());
    Ok(())
}

#[test]
fn test_pdf_suffix_is_stripped_from_series() -> Result<()> {
    let info = parse_manga("/manga/Nothing.pdf.pdf")?.unwrap();
    assert_eq!(info.series, "Nothing");
    Ok(())
}

#[test]
fn test_epub_uses_manga_heuristics() -> Result<()> {
    let info = parse_manga("/manga/Accel World v01.epub")?.unwrap();
    assert_eq!(info.format, MangaFormat::Epub);
    assert_eq!(info.series, "Accel World");
    assert_eq!(info.volumes, "1");
    Ok(())
}

#[test]
fn test_comic_issue_numbers() -> Result<()> {
    let info = parse_comic("/comics/Saga 001 (2012) (Digital) (Empire-Zone).cbr")?.unwrap();
    assert_eq!(info.series, "Saga");
    assert_eq!(info.chapters, "1");
    assert_eq!(info.volumes, DEFAULT_VOLUME);

    let info = parse_comic("/comics/Batman & Robin the Teen Wonder #12.cbz")?.unwrap();
    assert_eq!(info.series, "Batman & Robin the Teen Wonder");
    assert_eq!(info.chapters, "12");
    Ok(())
}

#[test]
fn test_field_parsers() {
    assert_eq!(parser::parse_volume("Kodomo no Jikan vol. 10"), "10");
    assert_eq!(parser::parse_chapter("Kodomo no Jikan vol. 10"), DEFAULT_CHAPTER);
    assert_eq!(parser::parse_chapter("Beelzebub 153b RHS"), "153.5");
    assert_eq!(parser::parse_chapter("Baketeriya ch01-05"), "1-5");
    assert_eq!(parser::parse_series("Baketeriya ch01-05"), "Baketeriya");
    assert_eq!(parser::parse_edition("To Love Ru v01 Uncensored (Ch.001-007)"), "Uncensored");
    assert!(parser::has_special_marker("Grand Blue Dreaming - SP02"));
    assert!(!parser::has_special_marker("Spice and Wolf v01"));
}
