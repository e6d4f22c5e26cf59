//! Ordered regex heuristic tables.
//!
//! Every table is a priority-ordered list of [`Rule`]s evaluated by
//! [`first_capture`]: the first rule whose named group captures a non-empty
//! value wins and later rules are never consulted. Reordering a table changes
//! what the parser returns.
//!
//! The `regex` crate has no lookaround. Leading negative lookaheads such as
//! `^(?!Vol)` are expressed as prefix guards on the rule, and the few
//! lookbehinds that matter are expressed as capture rejections. All tables are
//! case-insensitive and compiled once.

use crate::path_utils::{get_file_name_lossy, is_macos_metadata_file};
use crate::types::MangaFormat;
use lazy_static::lazy_static;
use regex::{Captures, Regex, RegexBuilder};
use std::path::Path;

/// Extensions (with leading dot) treated as page images.
pub const IMAGE_FILE_EXTENSIONS: &str = r"^(\.png|\.jpeg|\.jpg|\.webp|\.gif)";
/// Extensions treated as comic archives.
pub const ARCHIVE_FILE_EXTENSIONS: &str =
    r"\.cbz|\.zip|\.rar|\.cbr|\.tar.gz|\.7zip|\.7z|\.cb7|\.cbt";
/// Extensions treated as books.
pub const BOOK_FILE_EXTENSIONS: &str = r"\.epub|\.pdf";
/// Everything the walker collects by default.
pub const SUPPORTED_EXTENSIONS: &str = r"\.cbz|\.zip|\.rar|\.cbr|\.tar.gz|\.7zip|\.7z|\.cb7|\.cbt|^(\.png|\.jpeg|\.jpg|\.webp|\.gif)|\.epub|\.pdf";

/// One entry of a heuristic table.
pub struct Rule {
    regex: Regex,
    /// The rule is skipped for text starting with any of these (ASCII case-insensitive).
    not_prefixed: &'static [&'static str],
    /// A match for which this returns true is ignored.
    reject: Option<fn(&Captures) -> bool>,
}

impl Rule {
    fn new(pattern: &str) -> Self {
        Self {
            regex: compile(pattern),
            not_prefixed: &[],
            reject: None,
        }
    }

    fn unless_prefixed(mut self, prefixes: &'static [&'static str]) -> Self {
        self.not_prefixed = prefixes;
        self
    }

    fn rejecting(mut self, reject: fn(&Captures) -> bool) -> Self {
        self.reject = Some(reject);
        self
    }

    /// True when the prefix guards allow this rule to run on `text`.
    pub fn applies_to(&self, text: &str) -> bool {
        !self
            .not_prefixed
            .iter()
            .any(|prefix| starts_with_ignore_ascii_case(text, prefix))
    }

    /// All accepted matches of this rule on `text`, honoring guards.
    pub fn captures_iter<'t>(&self, text: &'t str) -> impl Iterator<Item = Captures<'t>> {
        let allowed = self.applies_to(text);
        self.regex
            .captures_iter(text)
            .take_while(move |_| allowed)
            .filter(move |caps| !self.reject.is_some_and(|reject| reject(caps)))
    }

    /// Removes every accepted match of this rule from `text`.
    pub fn strip(&self, text: &str) -> String {
        if !self.applies_to(text) {
            return text.to_string();
        }
        self.regex.replace_all(text, "").into_owned()
    }
}

fn compile(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .unwrap()
}

fn starts_with_ignore_ascii_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Stand-in for `(?<!Vol)(?<!Vol.)` in front of a separator: the captured
/// series must not end in a volume keyword.
fn series_ends_with_volume_keyword(caps: &Captures) -> bool {
    let Some(series) = caps.name("Series") else {
        return false;
    };
    let lower = series.as_str().to_lowercase();
    let mut chars = lower.chars();
    chars.next_back();
    lower.ends_with("vol") || chars.as_str().ends_with("vol")
}

/// Walks `rules` in order and returns the first match whose `group` captured
/// a non-empty value.
///
/// This is the single "try in order, first success wins" helper shared by
/// every field extraction.
pub fn first_capture<'t>(rules: &[Rule], text: &'t str, group: &str) -> Option<Captures<'t>> {
    rules
        .iter()
        .flat_map(|rule| rule.captures_iter(text))
        .find(|caps| caps.name(group).is_some_and(|m| !m.as_str().is_empty()))
}

/// Applies every rule of `rules` as a removal, trimming between passes.
pub fn strip_all(rules: &[Rule], text: &str) -> String {
    rules
        .iter()
        .fold(text.to_string(), |title, rule| rule.strip(&title).trim().to_string())
}

lazy_static! {
    pub static ref MANGA_VOLUME: Vec<Rule> = vec![
        // Dance in the Vampire Bund v16-17
        Rule::new(r"(?P<Series>.*)(\b|_)v(?P<Volume>\d+-?\d+)( |_)"),
        // NEEDLESS_Vol.4_-Simeon_6_v2[SugoiSugoi].rar
        Rule::new(r"(?P<Series>.*)(\b|_)(vol\.?)(?P<Volume>\d+(-\d+)?)"),
        // Historys Strongest Disciple Kenichi_v11_c90-98.zip
        Rule::new(r"(?P<Series>.*)(\b|_)v(?P<Volume>\d+(-\d+)?)"),
        // Kodomo no Jikan vol. 10, One Piece - Digital Colored Comics Vol. 20.5-21.5 Ch. 177
        Rule::new(r"(?P<Series>.*)(\b|_)(vol\.? ?)(?P<Volume>\d+(\.\d)?(-\d+)?(\.\d)?)"),
        // Killing Bites Vol. 0001 Ch. 0001 - Galactica Scanlations (gb)
        Rule::new(r"(vol\.? ?)(?P<Volume>\d+(\.\d)?)"),
        // Tonikaku Cawaii [Volume 11].cbz
        Rule::new(r"(volume )(?P<Volume>\d+(\.\d)?)"),
        // Tower Of God S01 014 (CBT) (digital).cbz
        Rule::new(r"(?P<Series>.*)(\b|_)?(S(?P<Volume>\d+))"),
        // vol_001-1.cbz
        Rule::new(r"(vol_)(?P<Volume>\d+(\.\d)?)"),
        // 幽游白书完全版 第03卷 天下, 阿衰online 第1册
        Rule::new(r"第(?P<Volume>\d+)(卷|册)"),
        Rule::new(r"(卷|册)(?P<Volume>\d+)"),
        // 제n권, n권, 63권#200.zip
        Rule::new(r"제?(?P<Volume>\d+)권"),
        // 시즌n, n시즌
        Rule::new(r"시즌(?P<Volume>\d+\-?\d+)"),
        Rule::new(r"(?P<Volume>\d+(\-|~)?\d+?)시즌"),
        Rule::new(r"시즌(?P<Volume>\d+(\-|~)?\d+?)"),
        // n巻
        Rule::new(r"(?P<Volume>\d+(?:(\-)\d+)?)巻"),
    ];

    pub static ref MANGA_SERIES: Vec<Rule> = vec![
        // Grand Blue Dreaming - SP02
        Rule::new(r"(?P<Series>.*)(\b|_|-|\s)(?:sp)\d"),
        // [SugoiSugoi]_NEEDLESS_Vol.2_-_Disk_The_Informant_5_[ENG].rar
        Rule::new(r"^(?P<Series>.*)( |_)Vol\.?(\d+|tbd)"),
        // Mad Chimera World - Volume 005 - Chapter 026.cbz
        Rule::new(r"(?P<Series>.+?)(\s|_|-)+(?:Vol(ume|\.)?(\s|_|-)+\d+)(\s|_|-)+(?:(Ch|Chapter|Ch)\.?)(\s|_|-)+(?P<Chapter>\d+)"),
        // Ichiban_Ushiro_no_Daimaou_v04_ch34_[VISCANS].zip, VanDread-v01-c01.zip
        Rule::new(r"(?P<Series>.*)(\b|_)v(?P<Volume>\d+-?\d*)(\s|_|-)"),
        // Gokukoku no Brynhildr - c001-008 (v01) [TrinityBAKumA], Black Bullet - v4 c17 [batoto]
        Rule::new(r"(?P<Series>.*)( - )(?:v|vo|c|chapters)\d"),
        // Kedouin Makoto - Corpse Party Musume, Chapter 19 [Dametrans].zip
        Rule::new(r"(?P<Series>.*)(?:, Chapter )(?P<Chapter>\d+)"),
        // Please Go Home, Akutsu-San! - Chapter 038.5 - Volume Announcement.cbz
        Rule::new(r"(?P<Series>.+?)(\s|_|-)(\s|_|-)((?:Chapter)|(?:Ch\.))(\s|_|-)(?P<Chapter>\d+)"),
        // [dmntsf.net] One Piece - Digital Colored Comics Vol. 20 Ch. 177 - 30 Million vs 81 Million.cbz
        Rule::new(r"(?P<Series>.*) (\b|_|-)(vol)\.?(\s|-|_)?\d+"),
        // [xPearse] Kyochuu Rettou Volume 1 [English] [Manga] [Volume Scans]
        Rule::new(r"(?P<Series>.*) (\b|_|-)(vol)(ume)"),
        // Knights of Sidonia c000 (S2 LE BD Omake - BLAME!) [Habanero Scans]
        Rule::new(r"(?P<Series>.*)(\bc\d+\b)"),
        // Tonikaku Cawaii [Volume 11], Darling in the FranXX - Volume 01.cbz
        Rule::new(r"(?P<Series>.*)(?: _|-|\[|\()\s?vol(ume)?"),
        // Momo The Blood Taker - Chapter 027 Violent Emotion.cbz
        Rule::new(r"^(?P<Series>.+?)(?:(ch(apter|\.)(\b|_|-|\s))|sp)\d").unless_prefixed(&["vol"]),
        // Historys Strongest Disciple Kenichi_v11_c90-98.zip, Killing Bites Vol. 0001 Ch. 0001
        Rule::new(r"^(?P<Series>.*) (\b|_|-)(v|ch\.?|c|s)\d+").unless_prefixed(&["vol"]),
        // Hinowa ga CRUSH! 018 (2019) (Digital) (LuCaZ).cbz
        Rule::new(r"(?P<Series>.*)\s+(?P<Chapter>\d+)\s+(?:\(\d{4}\))\s"),
        // Goblin Slayer - Brand New Day 006.5 (2019) (Digital) (danke-Empire)
        Rule::new(r"(?P<Series>.*) (-)?(?P<Chapter>\d+(?:.\d+|-\d+)?) \(\d{4}\)"),
        // Noblesse - Episode 429 (74 Pages).7z
        Rule::new(r"(?P<Series>.*)(\s|_)(?:Episode|Ep\.?)(\s|_)(?P<Chapter>\d+(?:.\d+|-\d+)?)"),
        // Akame ga KILL! ZERO (2016-2019) (Digital) (LuCaZ)
        Rule::new(r"(?P<Series>.*)\(\d"),
        // Tonikaku Kawaii (Ch 59-67) (Ongoing)
        Rule::new(r"(?P<Series>.*)(\s|_)\((c\s|ch\s|chapter\s)"),
        // Fullmetal Alchemist chapters 101-108
        Rule::new(r"(?P<Series>.+?)(\s|_|\-)+?chapters(\s|_|\-)+?\d+(\s|_|\-)+?"),
        // It's Witching Time! 001 (Digital) (Anonymous1234)
        Rule::new(r"(?P<Series>.+?)(\s|_|\-)+?\d+(\s|_|\-)\("),
        // Ichinensei_ni_Nacchattara_v01_ch01_[Taruby]_v1.1.zip, must precede the next rule
        Rule::new(r"(?P<Series>.*)(v|s)\d+(-\d+)?(_|\s)"),
        // [Suihei Kiki]_Kasumi_Otoko_no_Ko_[Taruby]_v1.1.zip
        Rule::new(r"(?P<Series>.*)(v|s)\d+(-\d+)?"),
        // Black Bullet (very loose, keep towards the bottom)
        Rule::new(r"(?P<Series>.*)(_)(v|vo|c|volume)( |_)\d+"),
        // [Hidoi]_Amaenaideyo_MS_vol01_chp02.rar
        Rule::new(r"(?P<Series>.*)( |_)(vol\d+)?( |_)(?:Chp\.? ?\d+)"),
        // Mahoutsukai to Deshi no Futekisetsu na Kankei Chp. 1
        Rule::new(r"(?P<Series>.*)( |_)(?:Chp.? ?\d+)"),
        // Corpse Party -The Anthology- Sachikos game of love Hysteric Birthday 2U Chapter 01
        Rule::new(r"^(?P<Series>.*)( |_)Chapter( |_)(\d+)").unless_prefixed(&["vol"]),
        // Fullmetal Alchemist chapters 101-108.cbz
        Rule::new(r"^(?P<Series>.*)( |_)(chapters( |_)?)\d+-?\d*").unless_prefixed(&["vol"]),
        // Umineko no Naku Koro ni - Episode 1 - Legend of the Golden Witch #1
        Rule::new(r"^(?P<Series>.*)( |_)(episode|chapter|(ch\.?) ?)\d+-?\d*").unless_prefixed(&["vol"]),
        // Baketeriya ch01-05.zip
        Rule::new(r"^(?P<Series>.*)ch\d+-?\d?").unless_prefixed(&["vol"]),
        // Magi - Ch.252-005.cbz
        Rule::new(r"(?P<Series>.*)( ?- ?)Ch\.\d+-?\d*"),
        // [BAA]_Darker_than_Black_Omake-1.zip
        Rule::new(r"^(?P<Series>.*)(-)\d+-?\d*").unless_prefixed(&["vol"]),
        // Kodoja #001 (March 2016)
        Rule::new(r"(?P<Series>.*)(\s|_|-)#"),
        // Akiiro Bousou Biyori - 01.jpg, Beelzebub_172_RHS.zip, Cynthia the Mission 29.rar
        Rule::new(r"^(?P<Series>.+?)(\s|_)(ch|chapter)?\.?\d+-?\d*").unless_prefixed(&["vol", "chapter"]),
        // [BAA]_Darker_than_Black_c1 (very greedy, keep close to last)
        Rule::new(r"^(?P<Series>.*)( |_|-)(ch?)\d+").unless_prefixed(&["vol"]),
        // n巻
        Rule::new(r"(?P<Series>.+?)第(?P<Volume>\d+(?:(\-)\d+)?)巻"),
    ];

    pub static ref MANGA_CHAPTER: Vec<Rule> = vec![
        // Historys Strongest Disciple Kenichi v11 c90-98.zip, ...c90.5-100.5
        Rule::new(r"\b(c|ch)(\.?\s?)(?P<Chapter>(\d+(\.\d)?)-?(\d+(\.\d)?)?)"),
        // [Suihei Kiki] Kasumi Otoko no Ko [Taruby] v1.1.zip
        Rule::new(r"v\d+\.(?P<Chapter>\d+(?:.\d+|-\d+)?)"),
        // Umineko no Naku Koro ni - Episode 3 - Banquet of the Golden Witch #02.cbz
        Rule::new(r"^(?P<Series>.*)\s#(?P<Chapter>\d+)"),
        // Green Worldz - Chapter 027, Kimi no Koto ga Daidaidaidaidaisuki na 100-nin no Kanojo Chapter 11-10
        Rule::new(r"^(?P<Series>.*)\s?\sChapter\s(?P<Chapter>\d+(?:\.?[\d-]+)?)")
            .unless_prefixed(&["vol"])
            .rejecting(series_ends_with_volume_keyword),
        // Hinowa ga CRUSH! 018 (2019) (Digital) (LuCaZ).cbz, Hinowa ga CRUSH! 018.5 (2019)
        Rule::new(r"^(?P<Series>.+?)\s(\d\s)?(?P<Chapter>\d+(?:\.\d+|-\d+)?)(?P<Part>b)?(?:\s\(\d{4}\))?\b")
            .unless_prefixed(&["vol"])
            .rejecting(series_ends_with_volume_keyword),
        // Tower Of God S01 014 (CBT) (digital).cbz
        Rule::new(r"(?P<Series>.*)\sS(?P<Volume>\d+)\s(?P<Chapter>\d+(?:.\d+|-\d+)?)"),
        // Beelzebub 01 [Noodles].zip, Beelzebub 153b RHS.zip
        Rule::new(r"^[^v]*\s(?P<Chapter>\.?\d+(?:.\d+|-\d+)?)(?P<Part>b)?(\s|\[|\()"),
        // Yumekui-Merry DKThias Chapter21.zip
        Rule::new(r"Chapter(?P<Chapter>\d+(-\d+)?)"),
        // [Hidoi] Amaenaideyo MS vol01 chp02.rar
        Rule::new(r"(?P<Series>.*)\s(vol\d+)?\sChp\.? ?(?P<Chapter>\d+)"),
        // Vol 1 Chapter 2
        Rule::new(r"(?P<Volume>((vol|volume|v))?\s?\.?\d+)\s(Chp|Chapter)\.?\s?(?P<Chapter>\d+)"),
        // 【TFO汉化&Petit汉化】迷你偶像漫画第25话
        Rule::new(r"第(?P<Chapter>\d+)话"),
        // 가디언즈 오브 갤럭시 죽음의 보석.E0008.7화#44
        Rule::new(r"제?(?P<Chapter>\d+\.?\d+)(화|장)"),
        // [ハレム]ナナとカオル ～高校生のSMごっこ～　第1話
        Rule::new(r"第?(?P<Chapter>\d+(?:.\d+|-\d+)?)話"),
    ];

    pub static ref COMIC_SERIES: Vec<Rule> = vec![
        // Tintin - T22 Vol 714 pour Sydney
        Rule::new(r"(?P<Series>.+?)\s?(\b|_|-)\s?((vol|tome|t)\.?)(?P<Volume>\d+(-\d+)?)"),
        // Invincible Vol 01 Family matters (2005) (Digital)
        Rule::new(r"(?P<Series>.+?)(\b|_)((vol|tome|t)\.?)(\s|_)(?P<Volume>\d+(-\d+)?)"),
        // Batman Beyond 2.0 001 (2013)
        Rule::new(r"^(?P<Series>.+?\S\.\d) (?P<Chapter>\d+)"),
        // 04 - Asterix the Gladiator (1964) (Digital-Empire) (WebP by Doc MaKS)
        Rule::new(r"^(?P<Volume>\d+)\s(-\s|_)(?P<Series>.*(\d{4})?)( |_)(\(|\d+)"),
        // 01 Spider-Man & Wolverine 01.cbr
        Rule::new(r"^(?P<Volume>\d+)\s(?:-\s)(?P<Series>.*) (\d+)?"),
        // Batman & Wildcat (1 of 3)
        Rule::new(r"(?P<Series>.*(\d{4})?)( |_)(?:\((?P<Volume>\d+) of \d+)"),
        // Teen Titans v1 001 (1966-02) (digital) (OkC.O.M.P.U.T.O.-Novus), Aldebaran-Antares-t6
        Rule::new(r"^(?P<Series>.+?)(?: |_|-)(v|t)\d+"),
        // Amazing Man Comics chapter 25
        Rule::new(r"^(?P<Series>.+?)(?: |_)c(hapter) \d+"),
        // Amazing Man Comics issue #25
        Rule::new(r"^(?P<Series>.+?)(?: |_)i(ssue) #\d+"),
        // Batman Wayne Family Adventures - Ep. 001 - Moving In
        Rule::new(r"^(?P<Series>.+?)(\s|_|-)(?:Ep\.?)(\s|_|-)+\d+"),
        // Batgirl Vol.2000 #57 (December, 2004)
        Rule::new(r"^(?P<Series>.+?)Vol\.?\s?#?(?:\d+)"),
        // Batman & Robin the Teen Wonder #0
        Rule::new(r"^(?P<Series>.*)(?: |_)#\d+"),
        // Batman & Catwoman - Trail of the Gun 01, Batman & Grendel (1996) 01 - Devil's Bones
        Rule::new(r"^(?P<Series>.+?)(?: \d+)"),
        // Scott Pilgrim 02 - Scott Pilgrim vs. The World (2005)
        Rule::new(r"^(?P<Series>.+?)(?: |_)(?P<Chapter>\d+)"),
        // The First Asterix Frieze (WebP by Doc MaKS), but not a "(2005)" year tag
        Rule::new(r"^(?P<Series>.*)(?: |_)\((?:\D|\d\D|\d{2}\D|\d{3}\D|\d{0,3}$)"),
        // spawn-123, spawn-chapter-123
        Rule::new(r"^(?P<Series>.+?)-(chapter-)?(?P<Chapter>\d+)"),
        // Must be last: Batman & Daredevil - King of New York
        Rule::new(r"^(?P<Series>.*)"),
    ];

    pub static ref COMIC_VOLUME: Vec<Rule> = vec![
        // Teen Titans v1 001 (1966-02) (digital) (OkC.O.M.P.U.T.O.-Novus)
        Rule::new(r"^(?P<Series>.*)(?: |_)(t|v)(?P<Volume>\d+)"),
        // Batgirl Vol.2000 #57 (December, 2004)
        Rule::new(r"^(?P<Series>.+?)(?:\s|_)(v|vol|tome|t)\.?(\s|_)?(?P<Volume>\d+)"),
        Rule::new(r"第(?P<Volume>\d+)(卷|册)"),
        Rule::new(r"(卷|册)(?P<Volume>\d+)"),
        Rule::new(r"제?(?P<Volume>\d+)권"),
        Rule::new(r"(?P<Volume>\d+(?:(\-)\d+)?)巻"),
    ];

    pub static ref COMIC_CHAPTER: Vec<Rule> = vec![
        // Batman & Wildcat (1 of 3)
        Rule::new(r"(?P<Series>.*(\d{4})?)( |_)(?:\((?P<Chapter>\d+) of \d+)"),
        // Batman Beyond 04 (of 6) (1999)
        Rule::new(r"(?P<Series>.+?)(?P<Chapter>\d+)(\s|_|-)?\(of"),
        // Batman Beyond 2.0 001 (2013)
        Rule::new(r"^(?P<Series>.+?\S\.\d) (?P<Chapter>\d+)"),
        // Teen Titans v1 001 (1966-02) (digital) (OkC.O.M.P.U.T.O.-Novus)
        Rule::new(r"^(?P<Series>.+?)(?: |_)v(?P<Volume>\d+)(?: |_)(c? ?)(?P<Chapter>(\d+(\.\d)?)-?(\d+(\.\d)?)?)(c? ?)"),
        // Batman & Robin the Teen Wonder #0
        Rule::new(r"^(?P<Series>.+?)(?:\s|_)#(?P<Chapter>\d+)"),
        // Batman 2016 - Chapter 01, Batman 2016 - Issue 01, Batman 2016 - Issue #01
        Rule::new(r"^(?P<Series>.+?)((c(hapter)?)|issue)(_|\s)#?(?P<Chapter>(\d+(\.\d)?)-?(\d+(\.\d)?)?)"),
        // Invincible 070.5 - Invincible Returns 1 (2010) (digital) (Minutemen-InnerDemons).cbr
        Rule::new(r"^(?P<Series>.+?)(?:\s|_)(c? ?(chapter)?)(?P<Chapter>(\d+(\.\d)?)-?(\d+(\.\d)?)?)(c? ?)-"),
        // Batgirl Vol.2000 #57 (December, 2004)
        Rule::new(r"^(?P<Series>.+?)(?:vol\.?\d+)\s#(?P<Chapter>\d+)"),
        // Batman & Catwoman - Trail of the Gun 01, Batman & Grendel (1996) 01 - Devil's Bones
        Rule::new(r"^(?P<Series>.+?)(?: (?P<Chapter>\d+))"),
        // Saga 001 (2012) (Digital) (Empire-Zone)
        Rule::new(r"(?P<Series>.+?)(?: |_)(c? ?)(?P<Chapter>(\d+(\.\d)?)-?(\d+(\.\d)?)?)\s\(\d{4}"),
        // Amazing Man Comics chapter 25
        Rule::new(r"^(?P<Series>.+?)( |_)c(hapter)( |_)(?P<Chapter>\d*)").unless_prefixed(&["vol"]),
        // Amazing Man Comics issue #25
        Rule::new(r"^(?P<Series>.+?)( |_)i(ssue)( |_) #(?P<Chapter>\d*)").unless_prefixed(&["vol"]),
        // spawn-123, spawn-chapter-123
        Rule::new(r"^(?P<Series>.+?)-(chapter-)?(?P<Chapter>\d+)"),
    ];

    /// Bracketed scanlation/release group tags: [TrinityBAKumA Finella&anon], [BAA]_, [batoto]
    pub static ref RELEASE_GROUP: Vec<Rule> = vec![
        Rule::new(r"\[(?P<subgroup>\S(?:.*?\S)??)\](?:_|-|\s|\.)?"),
    ];

    pub static ref EDITION: Vec<Rule> = vec![
        // Tenjo Tenge {Full Contact Edition} v01 (2011) (Digital) (ASTC).cbz
        Rule::new(r"[\{\[\(](?P<Edition>[^\}\]\)]*?Edition)[\}\]\)]"),
        // Omnibus, Omnibus Edition
        Rule::new(r"\b(?P<Edition>Omnibus(( |_)?Edition)?)\b"),
        // To Love Ru v01 Uncensored (Ch.001-007)
        Rule::new(r"\b(?P<Edition>Uncensored)\b"),
    ];

    /// Empty bracket pairs, `(Complete)` markers and anything parenthesized.
    pub static ref CLEANUP: Vec<Rule> = vec![
        Rule::new(r"(?P<Cleanup>(\{\}|\[\]|\(\)))"),
        Rule::new(r"(?P<Cleanup>(\{Complete\}|\[Complete\]|\(Complete\)))"),
        Rule::new(r"\(.*\)"),
    ];

    pub static ref MANGA_SPECIAL: Vec<Rule> = vec![
        Rule::new(r"\b(?P<Special>Specials?|One[- ]?Shot|Omake|Extra(?:\sChapter)?|Art Collection|Side Stories|Bonus)\b"),
    ];

    pub static ref COMIC_SPECIAL: Vec<Rule> = vec![
        Rule::new(r"\b(?P<Special>Specials?|One[- ]?Shot|\d.+?(\W|-)Annual|Annual(\W|-)\d.+?|Extra(?:\sChapter)?|Book \d.+?|Compendium \d.+?|Omnibus \d.+?|TPB|FCBD \d.+?|Absolute \d.+?|Preview \d.+?|Art Collection|Side\sStories|Bonus|Hors[- ]S[eé]rie|T?HS)\b"),
    ];

    pub static ref EUROPEAN_COMIC: Vec<Rule> = vec![
        Rule::new(r"\b(?P<Special>Bd(\s|-)Fr)\b"),
    ];

    /// `SP02` style markers that force a file to be a special.
    pub static ref SPECIAL_MARKER: Vec<Rule> = vec![
        Rule::new(r"\b(?P<Special>SP\d+)\b"),
    ];

    pub static ref SPECIAL_TOKEN: Regex = compile(r"SP\d+");
    pub static ref NORMALIZE: Regex = compile(r"[^\p{L}0-9\+]");
    pub static ref EMPTY_SPACE: Regex = compile(r"\s{2,}");
    pub static ref NUMBER_RANGE: Regex = compile(r"^[\d\-.]+$");

    static ref IMAGE_REGEX: Regex = compile(IMAGE_FILE_EXTENSIONS);
    static ref ARCHIVE_REGEX: Regex = compile(ARCHIVE_FILE_EXTENSIONS);
    static ref BOOK_REGEX: Regex = compile(BOOK_FILE_EXTENSIONS);
}

/// The extension of `path` with its leading dot, lowercased. `.tar.gz` is
/// treated as a single extension. Empty when there is none.
pub fn file_extension(path: &str) -> String {
    let lower = path.to_lowercase();
    if lower.ends_with(".tar.gz") {
        return ".tar.gz".to_string();
    }
    Path::new(&lower)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

pub fn is_archive(path: &str) -> bool {
    ARCHIVE_REGEX.is_match(&file_extension(path))
}

pub fn is_book(path: &str) -> bool {
    BOOK_REGEX.is_match(&file_extension(path))
}

/// True for page images. AppleDouble `._` files never count as images.
pub fn is_image(path: &str) -> bool {
    !is_macos_metadata_file(Path::new(path)) && IMAGE_REGEX.is_match(&file_extension(path))
}

pub fn is_epub(path: &str) -> bool {
    file_extension(path) == ".epub"
}

pub fn is_pdf(path: &str) -> bool {
    file_extension(path) == ".pdf"
}

/// Classifies a file by extension.
pub fn parse_format(path: &str) -> MangaFormat {
    if is_archive(path) {
        MangaFormat::Archive
    } else if is_image(path) {
        MangaFormat::Image
    } else if is_epub(path) {
        MangaFormat::Epub
    } else if is_pdf(path) {
        MangaFormat::Pdf
    } else {
        MangaFormat::Unknown
    }
}

/// True for images named like cover art: `cover.jpg`, `folder.png`,
/// `Vol1_cover.webp`. Back covers (`backcover`, `back_cover`, `back-cover`)
/// are regular pages.
pub fn is_cover_image(path: &str) -> bool {
    is_image(path) && has_cover_token(&get_file_name_lossy(Path::new(path)))
}

fn has_cover_token(file_name: &str) -> bool {
    let lower = file_name.to_ascii_lowercase();
    ["cover", "folder"].iter().any(|token| {
        lower.match_indices(token).any(|(start, _)| {
            let prefix = &lower[..start];
            let next = lower[start + token.len()..].chars().next();
            let previous = prefix.chars().next_back();

            let followed_by_word = next.is_some_and(|c| c.is_alphanumeric() || c == '_');
            let preceded_by_word =
                previous.is_some_and(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '[');
            let back_cover = prefix.ends_with("back_") || prefix.ends_with("back-");

            !followed_by_word && !preceded_by_word && !back_cover
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_capture_respects_table_order() {
        // Rule 2 ("Vol.") fires before rule 3 ("v") would see "v2"
        let caps = first_capture(&MANGA_VOLUME, "NEEDLESS_Vol.4_-Simeon_6_v2", "Volume").unwrap();
        assert_eq!(&caps["Volume"], "4");
    }

    #[test]
    fn test_prefix_guard_skips_rule() {
        let guarded = Rule::new(r"^(?P<Series>.*)ch\d+").unless_prefixed(&["vol"]);
        assert!(guarded.captures_iter("Vol 1 ch01").next().is_none());
        assert!(guarded.captures_iter("Baketeriya ch01").next().is_some());
    }

    #[test]
    fn test_volume_keyword_rejection() {
        assert!(first_capture(&MANGA_CHAPTER, "Kodomo no Jikan vol. 10", "Chapter").is_none());
        let caps = first_capture(&MANGA_CHAPTER, "Hinowa ga CRUSH! 018 (2019) (Digital) (LuCaZ)", "Chapter").unwrap();
        assert_eq!(&caps["Chapter"], "018");
    }

    #[test]
    fn test_release_group_is_lazy() {
        let stripped = strip_all(&RELEASE_GROUP, "[BAA]_Darker than Black [v2]");
        assert_eq!(stripped, "Darker than Black");
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("a/b/Accel World v1.CBZ"), ".cbz");
        assert_eq!(file_extension("a/b/pack.tar.gz"), ".tar.gz");
        assert_eq!(file_extension("a/b/noext"), "");
    }

    #[test]
    fn test_parse_format() {
        assert_eq!(parse_format("x/Accel World v1.cbz"), MangaFormat::Archive);
        assert_eq!(parse_format("x/Accel World v1.7z"), MangaFormat::Archive);
        assert_eq!(parse_format("x/001.jpg"), MangaFormat::Image);
        assert_eq!(parse_format("x/Book.epub"), MangaFormat::Epub);
        assert_eq!(parse_format("x/Book.PDF"), MangaFormat::Pdf);
        assert_eq!(parse_format("x/notes.txt"), MangaFormat::Unknown);
        assert_eq!(parse_format("x/._001.jpg"), MangaFormat::Unknown);
    }

    #[test]
    fn test_is_cover_image() {
        assert!(is_cover_image("cover.jpg"));
        assert!(is_cover_image("folder.png"));
        assert!(is_cover_image("Vol1_cover.webp"));
        assert!(is_cover_image("!cover.png"));
        assert!(!is_cover_image("backcover.png"));
        assert!(!is_cover_image("back_cover.png"));
        assert!(!is_cover_image("back-cover.png"));
        assert!(!is_cover_image("covers.jpg"));
        assert!(!is_cover_image("cover.cbz"));
    }
}
