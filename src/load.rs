// src/load.rs
//! Reads a Qualtrics CSV export into a [`SurveyTable`].
//!
//! A Qualtrics export carries three header lines: internal question ids, the
//! question text, and an import-id row. The question text is the header, the
//! import-id row is dropped, and so are responses recorded while previewing
//! the survey.

use anyhow::{Context, Result};
use arrow::{
    array::{ArrayRef, StringArray},
    datatypes::{DataType, Field, Schema},
    record_batch::{RecordBatch, RecordBatchOptions},
};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::{collections::HashMap, fs::File, io::Read, path::Path, sync::Arc};
use tracing::{debug, info};

use crate::error::SurveyError;

/// One response per row, one question per column. Every column is nullable
/// `Utf8`; an empty cell in the file is null.
pub type SurveyTable = RecordBatch;

/// How to find the header and which rows to throw away.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// 0-based line holding the question text.
    pub header_row: usize,
    /// Rows right after the header that are not responses.
    pub metadata_rows: usize,
    /// Column whose value marks a preview response.
    pub response_type_column: String,
    /// Value of `response_type_column` for preview responses.
    pub preview_value: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            header_row: 1,
            metadata_rows: 1,
            response_type_column: "Response Type".into(),
            preview_value: "Survey Preview".into(),
        }
    }
}

impl LoadOptions {
    pub fn with_header_row(mut self, header_row: usize) -> Self {
        self.header_row = header_row;
        self
    }
}

/// Load a survey export from disk.
#[tracing::instrument(level = "info", skip(path, options), fields(path = %path.as_ref().display()))]
pub fn read_survey<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<SurveyTable> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open survey file: {:?}", path.as_ref()))?;
    parse_survey(file, options)
        .with_context(|| format!("Failed to load survey file: {:?}", path.as_ref()))
}

/// Parse a survey export from any reader.
pub fn parse_survey<R: Read>(reader: R, options: &LoadOptions) -> Result<SurveyTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = rdr.records().enumerate();

    // 1) skip to the header line
    let headers = loop {
        let (idx, result) = records
            .next()
            .with_context(|| format!("no header at line {}", options.header_row))?;
        let record = result.with_context(|| format!("CSV parse error at record {}", idx))?;
        if idx == options.header_row {
            break mangle_duplicates(name_unnamed(record.iter()));
        }
    };
    let width = headers.len();

    let response_type = headers
        .iter()
        .position(|h| *h == options.response_type_column)
        .ok_or_else(|| SurveyError::MissingColumn(options.response_type_column.clone()))?;

    // 2) gather responses column by column
    let mut columns: Vec<Vec<Option<String>>> = vec![Vec::new(); width];
    let mut skipped_metadata = 0;
    let mut previews = 0;
    for (idx, result) in records {
        let record = result.with_context(|| format!("CSV parse error at record {}", idx))?;
        if skipped_metadata < options.metadata_rows {
            skipped_metadata += 1;
            continue;
        }
        if record.len() > width {
            return Err(SurveyError::TooManyFields {
                record: idx,
                found: record.len(),
                width,
            })
            .with_context(|| format!("CSV parse error at record {}", idx));
        }
        if record.get(response_type) == Some(options.preview_value.as_str()) {
            previews += 1;
            continue;
        }
        for (i, column) in columns.iter_mut().enumerate() {
            let cell = record.get(i).filter(|c| !c.is_empty());
            column.push(cell.map(str::to_string));
        }
    }
    debug!(previews, skipped_metadata, "dropped non-response rows");

    let num_rows = columns.first().map_or(0, Vec::len);
    let fields: Vec<Field> = headers
        .iter()
        .map(|name| Field::new(name, DataType::Utf8, true))
        .collect();
    let arrays: Vec<ArrayRef> = columns
        .into_iter()
        .map(|cells| Arc::new(StringArray::from(cells)) as ArrayRef)
        .collect();
    let batch = RecordBatch::try_new_with_options(
        Arc::new(Schema::new(fields)),
        arrays,
        &RecordBatchOptions::new().with_row_count(Some(num_rows)),
    )
    .context("building survey record batch")?;

    info!(
        responses = batch.num_rows(),
        columns = batch.num_columns(),
        "survey loaded"
    );
    Ok(batch)
}

/// Blank header cells become `Unnamed: <column>`.
fn name_unnamed<'a>(cells: impl Iterator<Item = &'a str>) -> Vec<String> {
    cells
        .enumerate()
        .map(|(i, name)| {
            if name.trim().is_empty() {
                format!("Unnamed: {}", i)
            } else {
                name.to_string()
            }
        })
        .collect()
}

/// Make header names unique: the second `Q` becomes `Q.1`, the third `Q.2`.
fn mangle_duplicates(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(headers.len());
    for name in headers {
        let mut candidate = name.clone();
        while let Some(count) = seen.get_mut(&candidate) {
            *count += 1;
            candidate = format!("{}.{}", name, count);
        }
        seen.insert(candidate.clone(), 0);
        out.push(candidate);
    }
    out
}
