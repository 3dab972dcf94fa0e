// Fixtures shared by unit tests.

use arrow::{
    array::{ArrayRef, StringArray},
    datatypes::{DataType, Field, Schema},
    record_batch::{RecordBatch, RecordBatchOptions},
};
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::load::SurveyTable;

pub(crate) fn init_test_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,surveytab=debug")),
        )
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Build a survey table from a header and string rows; `""` is a null cell.
pub(crate) fn survey_table(headers: &[&str], rows: &[&[&str]]) -> SurveyTable {
    let fields: Vec<Field> = headers
        .iter()
        .map(|h| Field::new(*h, DataType::Utf8, true))
        .collect();
    let columns: Vec<ArrayRef> = (0..headers.len())
        .map(|i| {
            let cells: Vec<Option<&str>> = rows
                .iter()
                .map(|row| row.get(i).copied().filter(|c| !c.is_empty()))
                .collect();
            Arc::new(StringArray::from(cells)) as ArrayRef
        })
        .collect();
    RecordBatch::try_new_with_options(
        Arc::new(Schema::new(fields)),
        columns,
        &RecordBatchOptions::new().with_row_count(Some(rows.len())),
    )
    .expect("valid test table")
}

/// `n` filler columns named `Meta0..` followed by `questions`, every row
/// answered with the given cells.
pub(crate) fn padded_table(n: usize, questions: &[&str], rows: &[&[&str]]) -> SurveyTable {
    let filler: Vec<String> = (0..n).map(|i| format!("Meta{}", i)).collect();
    let mut headers: Vec<&str> = filler.iter().map(String::as_str).collect();
    headers.extend_from_slice(questions);

    let padded: Vec<Vec<&str>> = rows
        .iter()
        .map(|row| {
            let mut cells = vec!["meta"; n];
            cells.extend_from_slice(row);
            cells
        })
        .collect();
    let padded: Vec<&[&str]> = padded.iter().map(Vec::as_slice).collect();
    survey_table(&headers, &padded)
}
