//! Spreadsheet column labels and column ranges.
//!
//! Reports always name columns the way the exported file shows them in a
//! spreadsheet (`A`, `B`, … `Z`, `AA`, …), so every position the survey code
//! hands to an operator goes through [`column_label`].

use regex::Regex;
use serde::{Deserialize, Deserializer};
use std::{fmt, ops::Range, str::FromStr};

use crate::error::{Result, SurveyError};

const LETTERS: usize = 26;

/// Bijective base-26 label for a 0-based column index (0 → `A`, 26 → `AA`).
pub fn column_label(n: usize) -> String {
    let mut acc = Vec::new();
    let mut rest = n;
    loop {
        acc.push(b'A' + (rest % LETTERS) as u8);
        rest /= LETTERS;
        if rest == 0 {
            break;
        }
        // no zero digit in a bijective numeral
        rest -= 1;
    }
    acc.reverse();
    String::from_utf8(acc).unwrap_or_default()
}

/// Signed entry point for offsets computed by callers.
/// A negative index means the caller mis-tracked an offset.
pub fn checked_column_label(n: i64) -> Result<String> {
    usize::try_from(n)
        .map(column_label)
        .map_err(|_| SurveyError::NegativeColumn(n))
}

/// Inverse of [`column_label`]. Case-insensitive; `None` for anything that is
/// not a non-empty run of ASCII letters.
pub fn column_index(label: &str) -> Option<usize> {
    if label.is_empty() || !label.bytes().all(|b| b.is_ascii_alphabetic()) {
        return None;
    }
    let mut n: usize = 0;
    for b in label.bytes() {
        let digit = (b.to_ascii_uppercase() - b'A') as usize + 1;
        n = n.checked_mul(LETTERS)?.checked_add(digit)?;
    }
    Some(n - 1)
}

/// Half-open column range; `end: None` runs to the last column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnRange {
    pub start: usize,
    pub end: Option<usize>,
}

impl ColumnRange {
    pub fn new(start: usize, end: Option<usize>) -> Self {
        Self { start, end }
    }

    pub fn starting_at(start: usize) -> Self {
        Self { start, end: None }
    }

    /// Clamp against a table `width`, the way a Python slice would.
    pub fn resolve(&self, width: usize) -> Range<usize> {
        let end = self.end.unwrap_or(width).min(width);
        let start = self.start.min(end);
        start..end
    }
}

impl fmt::Display for ColumnRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) => write!(f, "{}:{}", self.start, end),
            None => write!(f, "{}:", self.start),
        }
    }
}

fn parse_bound(raw: &str, is_end: bool) -> Option<Option<usize>> {
    if raw.is_empty() {
        return Some(None);
    }
    if let Ok(n) = raw.parse::<usize>() {
        return Some(Some(n));
    }
    // spreadsheet labels name a column, so an end label includes it
    let idx = column_index(raw)?;
    Some(Some(if is_end { idx + 1 } else { idx }))
}

impl FromStr for ColumnRange {
    type Err = SurveyError;

    /// Accepts `start:end` where each bound is a 0-based number or a
    /// spreadsheet label: `"17:"`, `"R:"`, `"R:AB"`, `":5"`, `"3:10"`.
    fn from_str(s: &str) -> Result<Self> {
        let pattern =
            Regex::new(r"^\s*([A-Za-z]+|\d+)?\s*:\s*([A-Za-z]+|\d+)?\s*$").expect("static regex");
        let invalid = || SurveyError::InvalidRange(s.to_string());
        let caps = pattern.captures(s).ok_or_else(invalid)?;
        let start = caps.get(1).map_or("", |m| m.as_str());
        let end = caps.get(2).map_or("", |m| m.as_str());

        let start = parse_bound(start, false).ok_or_else(invalid)?.unwrap_or(0);
        let end = parse_bound(end, true).ok_or_else(invalid)?;
        Ok(ColumnRange { start, end })
    }
}

impl<'de> Deserialize<'de> for ColumnRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
