//! # surveytab
//!
//! Choice-frequency tables for Qualtrics survey exports.
//!
//! A survey is loaded once ([`load::read_survey`]) and narrowed to the
//! question columns as a [`Dataset`]. Free-text "Other" columns can be
//! reported and dropped with [`Dataset::pop_other`] while every report keeps
//! naming columns by their spreadsheet position in the exported file.
//! Single-answer and "select all that apply" questions are tabulated into
//! [`FrequencyTable`]s, which can be relabelled, reordered, rendered and
//! exported.

pub mod columns;
pub mod dataset;
pub mod error;
pub mod load;
pub mod output;
pub mod plan;
pub mod relabel;
pub mod tally;

#[cfg(test)]
pub(crate) mod testing;

pub use columns::{checked_column_label, column_index, column_label, ColumnRange};
pub use dataset::{ColumnOrigin, Dataset, PoppedColumn};
pub use error::SurveyError;
pub use load::{parse_survey, read_survey, LoadOptions, SurveyTable};
pub use relabel::{alias_labels, move_to_bottom, AliasMap};
pub use tally::{
    count_multi_choice, count_single_choice, FrequencyRow, FrequencyTable, QuestionKind, Splitter,
};
