//! Comparators over extracted sort keys.
//!
//! A comparator is a plain `fn(&str, &str) -> Ordering` wrapped in a
//! [`Comparator`] that remembers its registry name and column kind. Built-ins:
//!
//! - `alpha`: multi-level collation over base letters, then accents, then case
//!   (lowercase first), so accented letters sort next to their base letter
//! - `numeric`: strips everything but digits, `.` and `-`, then compares the
//!   parsed float. Keys that do not parse sort after every number and compare
//!   equal to each other.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Three-way comparison over two sort keys.
pub type CompareFn = fn(&str, &str) -> Ordering;

/// How a column's keys are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Alphabetic,
    Numeric,
    /// Registered by the embedding application
    Custom,
}

/// A named comparison rule.
#[derive(Clone)]
pub struct Comparator {
    name: String,
    kind: ColumnKind,
    func: CompareFn,
}

impl fmt::Debug for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Comparator")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

impl PartialEq for Comparator {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.kind == other.kind
    }
}

impl Comparator {
    pub fn new(name: impl Into<String>, kind: ColumnKind, func: CompareFn) -> Self {
        Self {
            name: name.into(),
            kind,
            func,
        }
    }

    pub fn alpha() -> Self {
        Self::new("alpha", ColumnKind::Alphabetic, compare_alpha)
    }

    pub fn numeric() -> Self {
        Self::new("numeric", ColumnKind::Numeric, compare_numeric)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        (self.func)(a, b)
    }
}

/// Name → comparator lookup used for `sorttable_<name>` annotations.
#[derive(Debug, Clone)]
pub struct ComparatorRegistry {
    comparators: BTreeMap<String, Comparator>,
}

impl Default for ComparatorRegistry {
    fn default() -> Self {
        let mut registry = Self {
            comparators: BTreeMap::new(),
        };
        registry.insert(Comparator::alpha());
        registry.insert(Comparator::numeric());
        registry
    }
}

impl ComparatorRegistry {
    /// Registry holding the built-in `alpha` and `numeric` comparators.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a custom comparator, replacing any existing one of that name.
    pub fn register(mut self, name: impl Into<String>, func: CompareFn) -> Self {
        self.insert(Comparator::new(name, ColumnKind::Custom, func));
        self
    }

    pub fn insert(&mut self, comparator: Comparator) {
        self.comparators
            .insert(comparator.name().to_string(), comparator);
    }

    pub fn get(&self, name: &str) -> Option<&Comparator> {
        self.comparators.get(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.comparators.keys().map(String::as_str)
    }
}

/// Collation-style text ordering, compared level by level:
///
/// 1. base letters: canonical decomposition with combining marks dropped,
///    case-folded (`é` sorts with `e`, `Å` with `a`)
/// 2. accents: unaccented before accented
/// 3. case: lowercase before uppercase
/// 4. raw code points, so distinct keys never compare equal
pub fn compare_alpha(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .flat_map(char::to_lowercase)
        .cmp(base_letters(b).flat_map(char::to_lowercase))
        .then_with(|| {
            a.nfd()
                .flat_map(char::to_lowercase)
                .cmp(b.nfd().flat_map(char::to_lowercase))
        })
        .then_with(|| {
            base_letters(a)
                .map(char::is_uppercase)
                .cmp(base_letters(b).map(char::is_uppercase))
        })
        .then_with(|| a.cmp(b))
}

/// Canonically decomposed characters of `s` without combining marks.
fn base_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().filter(|&c| !is_combining_mark(c))
}

/// Numeric ordering over the digits embedded in each key.
pub fn compare_numeric(a: &str, b: &str) -> Ordering {
    let (x, y) = (numeric_value(a), numeric_value(b));
    match (x.is_nan(), y.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => x.total_cmp(&y),
    }
}

/// Value a key sorts by under [`compare_numeric`]; `NaN` when nothing parses.
pub fn numeric_value(key: &str) -> f64 {
    let stripped: String = key
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    parse_float_prefix(&stripped)
}

/// Parse the longest prefix of `s` that forms a decimal float
/// (`-?digits[.digits]`), the way lenient float parsing reads `"1.2.3"` as
/// `1.2` and `"4-5"` as `4`.
fn parse_float_prefix(s: &str) -> f64 {
    let bytes = s.as_bytes();
    let mut end = 0;
    if bytes.first() == Some(&b'-') {
        end = 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return f64::NAN;
    }
    let value: f64 = s[..end].trim_end_matches('.').parse().unwrap_or(f64::NAN);
    // -0 and 0 must compare equal under total_cmp.
    if value == 0.0 {
        0.0
    } else {
        value
    }
}
