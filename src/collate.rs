use crate::item::Item;
use crate::mode::SortKey;
use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::OnceCell;
use regex::Regex;
use std::cmp::Ordering;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// One primary-strength collation element.
///
/// Variant order is the collation order between classes: punctuation and
/// whitespace sort before digit runs, digit runs before letters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Element {
    Symbol(char),
    /// Digit run with leading zeros stripped, keyed by (digit count, digits)
    /// so that comparison follows numeric value without parsing.
    Number(usize, String),
    Letter(char),
}

fn fold(name: &str) -> impl Iterator<Item = char> + '_ {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

fn collation_elements(name: &str) -> Vec<Element> {
    let mut out = Vec::new();
    let mut digits = String::new();

    for ch in fold(name) {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }
        flush_digits(&mut digits, &mut out);
        if ch.is_alphanumeric() {
            out.push(Element::Letter(ch));
        } else {
            out.push(Element::Symbol(ch));
        }
    }
    flush_digits(&mut digits, &mut out);
    out
}

fn flush_digits(digits: &mut String, out: &mut Vec<Element>) {
    if digits.is_empty() {
        return;
    }
    let significant = digits.trim_start_matches('0').to_string();
    out.push(Element::Number(significant.len(), significant));
    digits.clear();
}

/// Natural, case- and accent-insensitive comparison of two file names.
///
/// Embedded digit runs compare by numeric value, so `img2` sorts before
/// `img10`. Names differing only in case, diacritics or leading zeros of a
/// number compare `Equal`.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_elements(a).cmp(&collation_elements(b))
}

pub fn compare_ascending(a: &Item, b: &Item) -> Ordering {
    compare_names(a.name(), b.name())
}

pub fn compare_descending(a: &Item, b: &Item) -> Ordering {
    compare_ascending(b, a)
}

/// Ascending comparison under `key`.
///
/// Under [`SortKey::Date`], names carrying a date come first; the rest keep
/// admission order after them.
pub fn compare_by(key: SortKey, a: &Item, b: &Item) -> Ordering {
    match key {
        SortKey::Name => compare_ascending(a, b),
        SortKey::Size => a.size().cmp(&b.size()),
        SortKey::Upload => a.id().cmp(&b.id()),
        SortKey::Date => match (date_in_name(a.name()), date_in_name(b.name())) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.id().cmp(&b.id()),
        },
    }
}

fn ymd_regex() -> Option<&'static Regex> {
    static YMD_RE: OnceCell<Option<Regex>> = OnceCell::new();
    YMD_RE
        .get_or_init(|| {
            Regex::new(r"(\d{4})[._-]?(\d{2})[._-]?(\d{2})(?:[._ -]?(\d{2})(\d{2})?(\d{2})?)?").ok()
        })
        .as_ref()
}

fn mdy_regex() -> Option<&'static Regex> {
    static MDY_RE: OnceCell<Option<Regex>> = OnceCell::new();
    MDY_RE
        .get_or_init(|| Regex::new(r"(\d{2})[._-](\d{2})[._-](\d{4})").ok())
        .as_ref()
}

fn part(caps: &regex::Captures<'_>, i: usize) -> Option<u32> {
    caps.get(i).map_or(Some(0), |m| m.as_str().parse().ok())
}

/// First valid date in a file name: `YYYYMMDD[HHMMSS]` with optional `._-`
/// separators, else `MM-DD-YYYY`. Impossible dates are skipped; an
/// impossible time falls back to midnight.
pub fn date_in_name(name: &str) -> Option<NaiveDateTime> {
    if let Some(re) = ymd_regex() {
        for caps in re.captures_iter(name) {
            let year = caps[1].parse().ok()?;
            let date = NaiveDate::from_ymd_opt(year, part(&caps, 2)?, part(&caps, 3)?);
            let at = date.and_then(|d| {
                let timed = match (part(&caps, 4), part(&caps, 5), part(&caps, 6)) {
                    (Some(h), Some(m), Some(s)) => d.and_hms_opt(h, m, s),
                    _ => None,
                };
                timed.or_else(|| d.and_hms_opt(0, 0, 0))
            });
            if at.is_some() {
                return at;
            }
        }
    }
    let caps = mdy_regex()?.captures(name)?;
    let date = NaiveDate::from_ymd_opt(caps[3].parse().ok()?, part(&caps, 1)?, part(&caps, 2)?)?;
    date.and_hms_opt(0, 0, 0)
}
