//! Post-processing for frequency tables: display aliases for labels, and
//! pushing rows such as "Other" to the end.

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, path::Path};

use crate::tally::{FrequencyRow, FrequencyTable};

/// Label → display alias.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasMap(BTreeMap<String, String>);

impl AliasMap {
    pub fn get(&self, label: &str) -> Option<&str> {
        self.0.get(label).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Load from a `.json` file, or YAML for any other extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text =
            fs::read_to_string(path).with_context(|| format!("reading alias file {:?}", path))?;
        let is_json = path
            .extension()
            .and_then(|s| s.to_str())
            .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            serde_json::from_str(&text).with_context(|| format!("parsing {:?}", path))
        } else {
            serde_yaml::from_str(&text).with_context(|| format!("parsing {:?}", path))
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AliasMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Copy of `table` with an `alias` column: the mapped value where the label
/// has one, otherwise the label itself.
pub fn alias_labels(table: &FrequencyTable, aliases: &AliasMap) -> FrequencyTable {
    let column = table
        .labels()
        .iter()
        .map(|label| aliases.get(label).unwrap_or(label).to_string())
        .collect();
    table.with_aliases(column)
}

/// Copy of `table` with the rows matching `predicate` moved to the end.
/// Both groups keep their relative order.
pub fn move_to_bottom<F>(table: &FrequencyTable, predicate: F) -> FrequencyTable
where
    F: Fn(&FrequencyRow<'_>) -> bool,
{
    let (bottom, top): (Vec<usize>, Vec<usize>) =
        (0..table.len()).partition(|&i| table.row(i).map_or(false, |row| predicate(&row)));
    let order: Vec<usize> = top.into_iter().chain(bottom).collect();
    table.reordered(&order)
}

/// Predicate matching rows whose label matches `pattern`.
pub fn matching(pattern: &Regex) -> impl Fn(&FrequencyRow<'_>) -> bool + '_ {
    move |row| pattern.is_match(row.label)
}
