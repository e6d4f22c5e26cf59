//! Series aggregation and reconciliation.
//!
//! [`LibraryScanResult`] is the grouping map a scan hands to persistence:
//! `ParsedSeries -> files`, ordered by key. Grouping is a single-threaded
//! reduction over already parsed records, so nothing here locks.

use std::collections::BTreeMap;

use log::debug;

use crate::parser::rules::{RELEASE_GROUP, strip_all};
use crate::parser::text::normalize;
use crate::types::{KnownSeries, ParsedSeries, ParserInfo, ScanStats};

/// Output of a library scan: parsed files grouped per series and format.
///
/// No key ever maps to an empty list.
#[derive(Debug, Clone, Default)]
pub struct LibraryScanResult {
    series: BTreeMap<ParsedSeries, Vec<ParserInfo>>,
    pub stats: ScanStats,
}

/// How a scan lines up against the series already in the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reconciliation {
    /// Known series together with the scanned files that belong to them.
    pub matched: Vec<(KnownSeries, Vec<ParserInfo>)>,
    /// Known series with no files left on disk.
    pub removed: Vec<KnownSeries>,
    /// Scanned series that no known series claimed.
    pub new_series: Vec<ParsedSeries>,
}

/// Comparison form used when merging names: release groups are noise.
fn merge_key(name: &str) -> String {
    normalize(&strip_all(&RELEASE_GROUP, name))
}

impl LibraryScanResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves the canonical name for `info` against what was tracked so far.
    ///
    /// A group with the same normalized name and format wins first, then a
    /// group with the same normalized name under another format. The first
    /// spelling tracked for a group is its canonical name. Without a match
    /// the record keeps its own name.
    pub fn merge_name(&self, info: &ParserInfo) -> String {
        let wanted = merge_key(&info.series);
        let same_name = |key: &&ParsedSeries| merge_key(&key.name) == wanted;

        let existing = self
            .series
            .keys()
            .filter(same_name)
            .find(|key| key.format == info.format)
            .or_else(|| self.series.keys().find(same_name));

        match existing {
            Some(key) if !key.name.is_empty() => {
                if key.name != info.series {
                    debug!(
                        "Merging series name '{}' ({:?}) into '{}' ({:?})",
                        info.series, info.format, key.name, key.format
                    );
                }
                key.name.clone()
            }
            _ => info.series.clone(),
        }
    }

    /// Adds one parsed file, renaming it to its canonical series name first.
    /// Records without a series are ignored.
    pub fn track_series(&mut self, mut info: ParserInfo) {
        if info.series.is_empty() {
            return;
        }
        info.series = self.merge_name(&info);
        let key = ParsedSeries::new(&info.series, info.format);
        self.series.entry(key).or_default().push(info);
    }

    /// Files of this scan belonging to an already known series.
    ///
    /// Any of the known names may match a group's normalized name, but the
    /// format must be identical: a series stored as one format never absorbs
    /// files of another.
    pub fn get_infos_by_name(&self, known: &KnownSeries) -> Vec<ParserInfo> {
        self.keys_for(known)
            .flat_map(|key| self.series[key].iter().cloned())
            .collect()
    }

    fn keys_for<'s>(&'s self, known: &'s KnownSeries) -> impl Iterator<Item = &'s ParsedSeries> {
        let names: Vec<String> = known.names().map(normalize).collect();
        self.series.keys().filter(move |key| {
            key.format == known.format && names.iter().any(|name| *name == key.normalized_name)
        })
    }

    /// Lines this scan up against the read-only snapshot of known series.
    pub fn reconcile(&self, known: &[KnownSeries]) -> Reconciliation {
        let mut reconciliation = Reconciliation::default();
        let mut claimed: Vec<&ParsedSeries> = Vec::new();

        for series in known {
            let keys: Vec<&ParsedSeries> = self.keys_for(series).collect();
            if keys.is_empty() {
                reconciliation.removed.push(series.clone());
                continue;
            }
            let infos = keys
                .iter()
                .flat_map(|key| self.series[*key].iter().cloned())
                .collect();
            reconciliation.matched.push((series.clone(), infos));
            claimed.extend(keys);
        }

        reconciliation.new_series = self
            .series
            .keys()
            .filter(|key| !claimed.contains(key))
            .cloned()
            .collect();

        reconciliation
    }

    /// The grouping map.
    pub fn series(&self) -> &BTreeMap<ParsedSeries, Vec<ParserInfo>> {
        &self.series
    }

    pub fn get(&self, key: &ParsedSeries) -> Option<&Vec<ParserInfo>> {
        self.series.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ParsedSeries, &Vec<ParserInfo>)> {
        self.series.iter()
    }

    /// Number of series groups.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Number of files across all groups.
    pub fn total_files(&self) -> usize {
        self.series.values().map(Vec::len).sum()
    }

    pub fn into_series(self) -> BTreeMap<ParsedSeries, Vec<ParserInfo>> {
        self.series
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MangaFormat;

    fn info(series: &str, format: MangaFormat) -> ParserInfo {
        ParserInfo {
            series: series.to_string(),
            volumes: "1".to_string(),
            chapters: "0".to_string(),
            format,
            ..Default::default()
        }
    }

    #[test]
    fn test_same_format_spellings_merge() {
        let mut result = LibraryScanResult::new();
        result.track_series(info("Accel World", MangaFormat::Archive));
        result.track_series(info("accel world", MangaFormat::Archive));
        result.track_series(info("AccelWorld", MangaFormat::Archive));

        assert_eq!(result.len(), 1);
        let (key, files) = result.iter().next().unwrap();
        assert_eq!(key.name, "Accel World");
        assert_eq!(files.len(), 3);
        assert!(files.iter().all(|f| f.series == "Accel World"));
    }

    #[test]
    fn test_cross_format_merge_renames_but_keeps_format_groups() {
        let mut result = LibraryScanResult::new();
        result.track_series(info("Accel World", MangaFormat::Archive));
        result.track_series(info("Accel-World", MangaFormat::Epub));

        assert_eq!(result.len(), 2);
        let epub = result
            .get(&ParsedSeries::new("Accel World", MangaFormat::Epub))
            .unwrap();
        assert_eq!(epub[0].series, "Accel World");
    }

    #[test]
    fn test_release_group_is_ignored_when_merging() {
        let mut result = LibraryScanResult::new();
        result.track_series(info("Accel World", MangaFormat::Archive));
        let tagged = info("[Group] Accel World", MangaFormat::Archive);
        assert_eq!(result.merge_name(&tagged), "Accel World");
    }

    #[test]
    fn test_empty_series_is_never_tracked() {
        let mut result = LibraryScanResult::new();
        result.track_series(info("", MangaFormat::Archive));
        assert!(result.is_empty());
    }

    #[test]
    fn test_get_infos_by_name_requires_exact_format() {
        let mut result = LibraryScanResult::new();
        result.track_series(info("Accel World", MangaFormat::Archive));
        result.track_series(info("Accel World", MangaFormat::Pdf));
        result.track_series(info("Accel World", MangaFormat::Pdf));

        let pdf = KnownSeries::new("Accel World", MangaFormat::Pdf);
        assert_eq!(result.get_infos_by_name(&pdf).len(), 2);

        let archive = KnownSeries::new("Accel World", MangaFormat::Archive);
        assert_eq!(result.get_infos_by_name(&archive).len(), 1);

        let epub = KnownSeries::new("Accel World", MangaFormat::Epub);
        assert!(result.get_infos_by_name(&epub).is_empty());
    }

    #[test]
    fn test_get_infos_by_localized_name() {
        let mut result = LibraryScanResult::new();
        result.track_series(info("Sword Art Online", MangaFormat::Archive));

        let known = KnownSeries {
            name: "ソードアート・オンライン".to_string(),
            localized_name: Some("Sword Art Online".to_string()),
            format: MangaFormat::Archive,
            ..Default::default()
        };
        assert_eq!(result.get_infos_by_name(&known).len(), 1);
    }

    #[test]
    fn test_reconcile() {
        let mut result = LibraryScanResult::new();
        result.track_series(info("Accel World", MangaFormat::Archive));
        result.track_series(info("Love Hina", MangaFormat::Archive));

        let known = vec![
            KnownSeries::new("Accel World", MangaFormat::Archive),
            KnownSeries::new("Nothing", MangaFormat::Pdf),
        ];
        let reconciliation = result.reconcile(&known);

        assert_eq!(reconciliation.matched.len(), 1);
        assert_eq!(reconciliation.matched[0].0.name, "Accel World");
        assert_eq!(reconciliation.matched[0].1.len(), 1);
        assert_eq!(reconciliation.removed, vec![known[1].clone()]);
        assert_eq!(
            reconciliation.new_series,
            vec![ParsedSeries::new("Love Hina", MangaFormat::Archive)]
        );
    }
}
