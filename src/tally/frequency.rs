// src/tally/frequency.rs
use arrow::{
    array::{ArrayRef, StringArray, UInt64Array},
    datatypes::{DataType, Field, Schema},
    error::ArrowError,
    record_batch::RecordBatch,
};
use serde::{Serialize, Serializer};
use std::{collections::HashMap, sync::Arc};

/// Choice-frequency table: one row per distinct response, with its count and,
/// once relabelled, an alias.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    labels: Vec<String>,
    counts: Vec<u64>,
    aliases: Option<Vec<String>>,
}

/// A borrowed view of one row of a [`FrequencyTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrequencyRow<'a> {
    pub label: &'a str,
    pub count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<&'a str>,
}

impl FrequencyTable {
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let (labels, counts) = pairs.into_iter().map(|(l, c)| (l.into(), c)).unzip();
        Self {
            labels,
            counts,
            aliases: None,
        }
    }

    /// Count `values` in one pass. Labels keep first-seen order unless
    /// `sort` is set, in which case they are ordered ascending.
    pub(crate) fn tabulate<'a, I>(values: I, sort: bool) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut slots: HashMap<&str, usize> = HashMap::new();
        let mut labels: Vec<&str> = Vec::new();
        let mut counts: Vec<u64> = Vec::new();
        for value in values {
            match slots.get(value) {
                Some(&slot) => counts[slot] += 1,
                None => {
                    slots.insert(value, labels.len());
                    labels.push(value);
                    counts.push(1);
                }
            }
        }

        let mut order: Vec<usize> = (0..labels.len()).collect();
        if sort {
            order.sort_by(|&a, &b| labels[a].cmp(labels[b]));
        }
        Self::from_pairs(order.into_iter().map(|i| (labels[i], counts[i])))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn aliases(&self) -> Option<&[String]> {
        self.aliases.as_deref()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn get(&self, label: &str) -> Option<u64> {
        self.labels
            .iter()
            .position(|l| l == label)
            .map(|i| self.counts[i])
    }

    pub fn row(&self, i: usize) -> Option<FrequencyRow<'_>> {
        Some(FrequencyRow {
            label: self.labels.get(i)?,
            count: self.counts[i],
            alias: self.aliases.as_ref().map(|a| a[i].as_str()),
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = FrequencyRow<'_>> + '_ {
        (0..self.len()).filter_map(move |i| self.row(i))
    }

    pub fn pairs(&self) -> Vec<(&str, u64)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.counts.iter().copied())
            .collect()
    }

    /// Same rows with an `alias` column attached.
    pub(crate) fn with_aliases(&self, aliases: Vec<String>) -> Self {
        debug_assert_eq!(aliases.len(), self.len());
        Self {
            labels: self.labels.clone(),
            counts: self.counts.clone(),
            aliases: Some(aliases),
        }
    }

    /// Rows in the order given by `order`, a permutation of `0..len`.
    pub(crate) fn reordered(&self, order: &[usize]) -> Self {
        Self {
            labels: order.iter().map(|&i| self.labels[i].clone()).collect(),
            counts: order.iter().map(|&i| self.counts[i]).collect(),
            aliases: self
                .aliases
                .as_ref()
                .map(|a| order.iter().map(|&i| a[i].clone()).collect()),
        }
    }

    /// Arrow form: `labels`, `counts` and, when present, `alias`.
    pub fn to_record_batch(&self) -> Result<RecordBatch, ArrowError> {
        let mut fields = vec![
            Field::new("labels", DataType::Utf8, false),
            Field::new("counts", DataType::UInt64, false),
        ];
        let mut columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from_iter_values(&self.labels)),
            Arc::new(UInt64Array::from(self.counts.clone())),
        ];
        if let Some(aliases) = &self.aliases {
            fields.push(Field::new("alias", DataType::Utf8, false));
            columns.push(Arc::new(StringArray::from_iter_values(aliases)));
        }
        RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)
    }
}

impl Serialize for FrequencyTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows())
    }
}
