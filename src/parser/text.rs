//! Normalization primitives shared by the parser and the aggregator.

use super::rules::{
    CLEANUP, COMIC_SPECIAL, EDITION, EMPTY_SPACE, EUROPEAN_COMIC, MANGA_SPECIAL, NORMALIZE,
    NUMBER_RANGE, RELEASE_GROUP, SPECIAL_TOKEN, strip_all,
};

/// Characters trimmed from both ends of a cleaned title.
const SPACES_AND_SEPARATORS: [char; 6] = ['\0', '\t', '\r', ' ', '-', ','];

/// Reduces a title to its comparison form: only letters, digits and `+` are
/// kept, then everything is lowercased.
///
/// # Example
///
/// ```
/// use shoko::parser::text::normalize;
///
/// assert_eq!(normalize("Accel World"), "accelworld");
/// assert_eq!(normalize("accel_world"), "accelworld");
/// ```
pub fn normalize(name: &str) -> String {
    NORMALIZE.replace_all(name, "").to_lowercase()
}

/// Strips leading zeros. A value made only of zeros becomes `"0"`, and a
/// decimal keeps a single zero before its point (`"00.5"` -> `"0.5"`).
pub fn remove_leading_zeroes(value: &str) -> String {
    let trimmed = value.trim_start_matches('0');
    if trimmed.is_empty() {
        "0".to_string()
    } else if trimmed.starts_with('.') {
        format!("0{}", trimmed)
    } else {
        trimmed.to_string()
    }
}

/// Appends `.5` to a whole number (`153b` is chapter 153.5).
pub fn add_chapter_part(value: &str) -> String {
    if value.contains('.') {
        value.to_string()
    } else {
        format!("{}.5", value)
    }
}

/// Formats a captured volume or chapter value.
///
/// Ranges have each endpoint stripped independently. A value with more than
/// one hyphen only keeps its first number. `has_part` marks a half chapter
/// and applies to the upper endpoint.
pub fn format_value(value: &str, has_part: bool) -> String {
    if !value.contains('-') {
        let value = if has_part { add_chapter_part(value) } else { value.to_string() };
        return remove_leading_zeroes(&value);
    }

    let tokens: Vec<&str> = value.split('-').collect();
    let from = remove_leading_zeroes(tokens[0]);
    if tokens.len() != 2 {
        return from;
    }

    let to = if has_part { add_chapter_part(tokens[1]) } else { tokens[1].to_string() };
    format!("{}-{}", from, remove_leading_zeroes(&to))
}

/// Cleans a raw series candidate into a display title.
///
/// Underscores become spaces, release groups, empty or `(Complete)` bracket
/// pairs, parenthesized text and edition tags are removed, as is special
/// vocabulary (the comic vocabulary plus European tags when `is_comic`).
/// Finally separators are trimmed from both ends and runs of whitespace
/// collapse to one space.
///
/// # Example
///
/// ```
/// use shoko::parser::text::clean_title;
///
/// assert_eq!(clean_title("[BAA]_Darker_than_Black_", false), "Darker than Black");
/// ```
pub fn clean_title(title: &str, is_comic: bool) -> String {
    let title = title.replace('_', " ");
    let title = strip_all(&RELEASE_GROUP, &title);
    let title = strip_all(&CLEANUP, &title);
    let title = strip_all(&EDITION, &title);
    let title = if is_comic {
        let title = strip_all(&COMIC_SPECIAL, &title);
        strip_all(&EUROPEAN_COMIC, &title)
    } else {
        strip_all(&MANGA_SPECIAL, &title)
    };

    let title = title.trim_matches(SPACES_AND_SEPARATORS.as_slice());
    EMPTY_SPACE.replace_all(title, " ").trim().to_string()
}

/// Pads a number (or each end of a range) to three digits so lexical order
/// matches numeric order. Values that are not whole numbers come back as is.
///
/// # Example
///
/// ```
/// use shoko::parser::text::pad_zeros;
///
/// assert_eq!(pad_zeros("4"), "004");
/// assert_eq!(pad_zeros("4-8"), "004-008");
/// assert_eq!(pad_zeros("100"), "100");
/// ```
pub fn pad_zeros(number: &str) -> String {
    match number.split_once('-') {
        Some((from, to)) => format!("{}-{}", perform_padding(from), perform_padding(to)),
        None => perform_padding(number),
    }
}

fn perform_padding(number: &str) -> String {
    match number.parse::<u64>() {
        Ok(num) if num < 10 => format!("00{}", num),
        Ok(num) if num < 100 => format!("0{}", num),
        _ => number.to_string(),
    }
}

fn range_numbers(range: &str) -> Option<Vec<f32>> {
    if !NUMBER_RANGE.is_match(range) {
        return None;
    }
    range
        .split('-')
        .map(|token| token.parse::<f32>().ok())
        .collect()
}

/// Lowest number of a range such as `"1-5"`; `0.0` when the input is not a range.
pub fn min_number_from_range(range: &str) -> f32 {
    range_numbers(range)
        .and_then(|numbers| numbers.into_iter().reduce(f32::min))
        .unwrap_or(0.0)
}

/// Highest number of a range such as `"1-5"`; `0.0` when the input is not a range.
pub fn max_number_from_range(range: &str) -> f32 {
    range_numbers(range)
        .and_then(|numbers| numbers.into_iter().reduce(f32::max))
        .unwrap_or(0.0)
}

/// Prepares a special's file name for display: underscores become spaces,
/// `SPnn` markers and the extension are dropped. Falls back to the input when
/// nothing would be left.
pub fn clean_special_title(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }
    let replaced = name.replace('_', " ");
    let cleaned = SPECIAL_TOKEN.replace_all(&replaced, "");
    let mut cleaned = cleaned.trim();
    if let Some(index) = cleaned.rfind('.').filter(|index| *index > 0) {
        cleaned = cleaned[..index].trim();
    }

    if cleaned.is_empty() {
        name.to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("Darker Than Black"), "darkerthanblack");
        assert_eq!(normalize("Darker Than Black - Something"), "darkerthanblacksomething");
        assert_eq!(normalize("Kuro-Kuro"), "kurokuro");
        assert_eq!(normalize("Hello+World"), "hello+world");
        assert_eq!(normalize("Śródmieście"), "śródmieście");
    }

    #[test]
    fn test_remove_leading_zeroes() {
        assert_eq!(remove_leading_zeroes("004"), "4");
        assert_eq!(remove_leading_zeroes("000"), "0");
        assert_eq!(remove_leading_zeroes(""), "0");
        assert_eq!(remove_leading_zeroes("00.5"), "0.5");
        assert_eq!(remove_leading_zeroes("100"), "100");
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value("016-017", false), "16-17");
        assert_eq!(format_value("001", false), "1");
        assert_eq!(format_value("153", true), "153.5");
        assert_eq!(format_value("01-02", true), "1-2.5");
        assert_eq!(format_value("1-2-3", false), "1");
    }

    #[test]
    fn test_clean_title() {
        assert_eq!(clean_title("Hippos_the_Great [Digital], ", false), "Hippos the Great");
        assert_eq!(clean_title("Tenjo Tenge {Full Contact Edition}", false), "Tenjo Tenge");
        assert_eq!(clean_title("Akame ga KILL! ZERO (2016-2019) (Digital)", false), "Akame ga KILL! ZERO");
        assert_eq!(clean_title("Grand Blue Dreaming -", false), "Grand Blue Dreaming");
        assert_eq!(clean_title("Love  Hina", false), "Love Hina");
        assert_eq!(clean_title("Asterix Hors Série", true), "Asterix");
    }

    #[test]
    fn test_pad_zeros() {
        assert_eq!(pad_zeros("1"), "001");
        assert_eq!(pad_zeros("10"), "010");
        assert_eq!(pad_zeros("1-2"), "001-002");
        assert_eq!(pad_zeros("1.5"), "1.5");
    }

    #[test]
    fn test_number_from_range() {
        assert_eq!(min_number_from_range("1-5"), 1.0);
        assert_eq!(max_number_from_range("1-5"), 5.0);
        assert_eq!(min_number_from_range("4"), 4.0);
        assert_eq!(max_number_from_range("0.5-1.5"), 1.5);
        assert_eq!(min_number_from_range("Vol 1"), 0.0);
        assert_eq!(max_number_from_range("1-"), 0.0);
    }

    #[test]
    fn test_clean_special_title() {
        assert_eq!(clean_special_title("Grand_Blue_Dreaming_SP02.cbz"), "Grand Blue Dreaming");
        assert_eq!(clean_special_title("Omake.cbz"), "Omake");
        assert_eq!(clean_special_title(""), "");
    }
}
