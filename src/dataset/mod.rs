// src/dataset/mod.rs
//! A survey table restricted to a column range, with the bookkeeping needed to
//! name every retained column by its position in the exported file.

mod report;

use arrow::{array::StringArray, record_batch::RecordBatch};
use std::ops::Range;
use tracing::debug;

use crate::{
    columns::ColumnRange,
    error::{Result, SurveyError},
    load::SurveyTable,
    tally::{self, FrequencyTable, QuestionKind, Splitter},
};

pub use report::PoppedColumn;

/// Where a retained column came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnOrigin {
    /// 0-based column in the exported file.
    pub source_column: usize,
    /// 1-based question number within the dataset it was built into.
    pub question_number: usize,
}

#[derive(Debug, Clone)]
pub struct Dataset {
    table: RecordBatch,
    /// Question text, parallel to `table`'s columns.
    questions: Vec<String>,
    /// Provenance, parallel to `table`'s columns.
    origins: Vec<ColumnOrigin>,
    /// `None` for a dataset built from a file; the parent-relative range for a section.
    local_range: Option<ColumnRange>,
    /// Range of the exported file the root dataset was built from.
    origin_range: ColumnRange,
    /// Columns popped since construction.
    removed: usize,
}

impl Dataset {
    /// Keep the columns of a loaded survey that fall in `range`.
    pub fn new(table: SurveyTable, range: ColumnRange) -> Result<Self> {
        let span = range.resolve(table.num_columns());
        let origins = span
            .clone()
            .enumerate()
            .map(|(i, source_column)| ColumnOrigin {
                source_column,
                question_number: i + 1,
            })
            .collect();
        let dataset = Self::assemble(&table, span, origins, None, range)?;
        dataset.report_init();
        Ok(dataset)
    }

    /// A new dataset over `range` of this dataset's current columns.
    ///
    /// The section keeps the file positions of its columns and owns its table:
    /// popping from it leaves `self` untouched.
    pub fn section(&self, range: ColumnRange) -> Result<Self> {
        let span = range.resolve(self.table.num_columns());
        let origins = self.origins[span.clone()]
            .iter()
            .enumerate()
            .map(|(i, origin)| ColumnOrigin {
                source_column: origin.source_column,
                question_number: i + 1,
            })
            .collect();
        let dataset = Self::assemble(&self.table, span, origins, Some(range), self.origin_range)?;
        dataset.report_init();
        Ok(dataset)
    }

    fn assemble(
        table: &RecordBatch,
        span: Range<usize>,
        origins: Vec<ColumnOrigin>,
        local_range: Option<ColumnRange>,
        origin_range: ColumnRange,
    ) -> Result<Self> {
        let indices: Vec<usize> = span.collect();
        let table = table.project(&indices)?;
        let questions = table
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect();
        Ok(Self {
            table,
            questions,
            origins,
            local_range,
            origin_range,
            removed: 0,
        })
    }

    pub fn table(&self) -> &RecordBatch {
        &self.table
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn origins(&self) -> &[ColumnOrigin] {
        &self.origins
    }

    pub fn local_range(&self) -> Option<ColumnRange> {
        self.local_range
    }

    pub fn origin_range(&self) -> ColumnRange {
        self.origin_range
    }

    pub fn removed_count(&self) -> usize {
        self.removed
    }

    pub fn num_responses(&self) -> usize {
        self.table.num_rows()
    }

    pub fn num_questions(&self) -> usize {
        self.questions.len()
    }

    fn position(&self, column: &str) -> Result<usize> {
        self.questions
            .iter()
            .position(|q| q == column)
            .ok_or_else(|| SurveyError::ColumnNotFound(column.to_string()))
    }

    fn text_at(&self, ind: usize) -> Result<&StringArray> {
        self.table
            .column(ind)
            .as_any()
            .downcast_ref::<StringArray>()
            .ok_or_else(|| SurveyError::NotText(self.questions[ind].clone()))
    }

    /// Cells of the column named `column`.
    pub fn column(&self, column: &str) -> Result<&StringArray> {
        self.text_at(self.position(column)?)
    }

    /// 0-based column of `column` in the exported file.
    pub fn source_column(&self, column: &str) -> Result<usize> {
        Ok(self.origins[self.position(column)?].source_column)
    }

    pub fn count_single_choice(&self, column: &str, sort: bool) -> Result<FrequencyTable> {
        let cells = self.column(column)?;
        Ok(tally::count_single_choice(cells.iter(), sort))
    }

    pub fn count_multi_choice(&self, column: &str, sort: bool) -> Result<FrequencyTable> {
        self.count_multi_choice_with(column, sort, &Splitter::default())
    }

    pub fn count_multi_choice_with(
        &self,
        column: &str,
        sort: bool,
        splitter: &Splitter,
    ) -> Result<FrequencyTable> {
        let cells = self.column(column)?;
        Ok(tally::count_multi_choice(cells.iter(), sort, splitter))
    }

    /// Tabulate `column` according to its `kind`.
    pub fn count(
        &self,
        column: &str,
        kind: QuestionKind,
        sort: bool,
        splitter: &Splitter,
    ) -> Result<FrequencyTable> {
        debug!(column, %kind, sort, "tabulating");
        match kind {
            QuestionKind::Single => self.count_single_choice(column, sort),
            QuestionKind::Multi => self.count_multi_choice_with(column, sort, splitter),
        }
    }

    /// Numbered question listing, `"1. <question>"` onwards.
    pub fn question_list(&self) -> Vec<String> {
        self.questions
            .iter()
            .enumerate()
            .map(|(i, q)| format!("{}. {}", i + 1, q))
            .collect()
    }

    /// Remove a column (typically an "Other, please specify" free-text
    /// column), reporting its file position and its responses first.
    pub fn pop_other(&mut self, column: &str) -> Result<PoppedColumn> {
        let ind = self.position(column)?;
        let origin = self.origins[ind];
        let responses: Vec<String> = self
            .text_at(ind)?
            .iter()
            .flatten()
            .map(str::to_string)
            .collect();

        self.table.remove_column(ind);
        let question = self.questions.remove(ind);
        self.origins.remove(ind);
        self.removed += 1;

        let popped = PoppedColumn {
            question_number: origin.question_number,
            source_column: origin.source_column,
            question,
            responses,
        };
        popped.report();
        Ok(popped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{init_test_logging, padded_table, survey_table};
    use anyhow::Result;

    fn scenario() -> Result<Dataset> {
        init_test_logging();
        let table = padded_table(17, &["Q1", "Q2"], &[&["x", "a,b"], &["y", "a"]]);
        Ok(Dataset::new(table, ColumnRange::starting_at(17))?)
    }

    fn five_questions() -> Dataset {
        init_test_logging();
        let table = padded_table(
            3,
            &["A", "B", "C", "D", "E"],
            &[&["a1", "", "c1", "d1", ""], &["a2", "b2", "", "d2", ""]],
        );
        Dataset::new(table, ColumnRange::starting_at(3)).unwrap()
    }

    #[test]
    fn scenario_counts_and_pop() -> Result<()> {
        let mut ds = scenario()?;
        assert_eq!(ds.questions(), ["Q1", "Q2"]);
        assert_eq!(ds.num_responses(), 2);
        assert_eq!(ds.local_range(), None);
        assert_eq!(ds.origin_range(), ColumnRange::starting_at(17));

        assert_eq!(
            ds.count_single_choice("Q1", true)?.pairs(),
            vec![("x", 1), ("y", 1)]
        );
        assert_eq!(
            ds.count_multi_choice("Q2", true)?.pairs(),
            vec![("a", 2), ("b", 1)]
        );

        let popped = ds.pop_other("Q1")?;
        assert_eq!(ds.questions(), ["Q2"]);
        assert_eq!(popped.source_column, 17);
        assert_eq!(popped.column_label(), "R");
        assert_eq!(popped.question_number, 1);
        assert_eq!(popped.responses, vec!["x", "y"]);
        assert_eq!(ds.removed_count(), 1);
        assert_eq!(ds.table().num_columns(), 1);
        Ok(())
    }

    #[test]
    fn left_to_right_pops_match_offset_formula() -> Result<()> {
        let mut ds = five_questions();
        let c0 = ds.origin_range().start;
        for name in ["B", "D"] {
            let ind = ds.questions().iter().position(|q| q == name).unwrap();
            let expected = c0 + ind + ds.removed_count();
            let popped = ds.pop_other(name)?;
            assert_eq!(popped.source_column, expected);
            assert_eq!(popped.question_number, ind + ds.removed_count());
        }
        assert_eq!(ds.questions(), ["A", "C", "E"]);
        Ok(())
    }

    #[test]
    fn any_pop_order_reports_original_columns() -> Result<()> {
        let original = ["A", "B", "C", "D", "E"];
        for order in [["E", "A", "C"], ["C", "B", "A"], ["D", "E", "B"]] {
            let mut ds = five_questions();
            for name in order {
                let popped = ds.pop_other(name)?;
                let idx = original.iter().position(|q| *q == name).unwrap();
                assert_eq!(popped.source_column, 3 + idx, "popping {name}");
                assert_eq!(popped.question_number, idx + 1);
            }
            assert_eq!(ds.num_questions(), 2);
            assert_eq!(ds.table().num_columns(), 2);
            assert_eq!(ds.origins().len(), 2);
        }
        Ok(())
    }

    #[test]
    fn pop_reports_no_responses_for_empty_column() -> Result<()> {
        let mut ds = five_questions();
        let popped = ds.pop_other("E")?;
        assert!(popped.responses.is_empty());
        assert_eq!(popped.response_line(), "Responses: None");
        let popped = ds.pop_other("B")?;
        assert_eq!(popped.responses, vec!["b2"]);
        assert_eq!(popped.response_line(), r#"Responses: ["b2"]"#);
        Ok(())
    }

    #[test]
    fn unknown_column_is_not_found() {
        let mut ds = five_questions();
        for result in [
            ds.count_single_choice("Z", true),
            ds.count_multi_choice("Z", true),
        ] {
            assert!(matches!(result, Err(SurveyError::ColumnNotFound(c)) if c == "Z"));
        }
        assert!(matches!(
            ds.pop_other("Z"),
            Err(SurveyError::ColumnNotFound(_))
        ));
        assert_eq!(ds.num_questions(), 5);
        assert_eq!(ds.removed_count(), 0);
    }

    #[test]
    fn popped_column_cannot_be_counted() -> Result<()> {
        let mut ds = five_questions();
        ds.pop_other("A")?;
        assert!(matches!(
            ds.count_single_choice("A", true),
            Err(SurveyError::ColumnNotFound(_))
        ));
        assert!(matches!(
            ds.pop_other("A"),
            Err(SurveyError::ColumnNotFound(_))
        ));
        Ok(())
    }

    #[test]
    fn section_is_independent_of_parent() -> Result<()> {
        let parent = five_questions();
        let before = parent.table().clone();
        let mut section = parent.section(ColumnRange::new(1, Some(4)))?;
        assert_eq!(section.questions(), ["B", "C", "D"]);
        assert_eq!(section.local_range(), Some(ColumnRange::new(1, Some(4))));
        assert_eq!(section.origin_range(), parent.origin_range());

        section.pop_other("C")?;
        section.pop_other("B")?;
        assert_eq!(section.questions(), ["D"]);
        assert_eq!(parent.questions(), ["A", "B", "C", "D", "E"]);
        assert_eq!(parent.table(), &before);
        assert_eq!(parent.removed_count(), 0);
        Ok(())
    }

    #[test]
    fn section_reports_file_columns() -> Result<()> {
        let parent = five_questions();
        let mut section = parent.section(ColumnRange::starting_at(2))?;
        let popped = section.pop_other("D")?;
        // D is the fourth question, three filler columns in front
        assert_eq!(popped.source_column, 6);
        assert_eq!(popped.question_number, 2);
        assert_eq!(section.source_column("E")?, 7);
        Ok(())
    }

    #[test]
    fn section_after_parent_pops_stays_correct() -> Result<()> {
        let mut parent = five_questions();
        parent.pop_other("B")?;
        let mut section = parent.section(ColumnRange::starting_at(1))?;
        assert_eq!(section.questions(), ["C", "D", "E"]);
        let popped = section.pop_other("D")?;
        assert_eq!(popped.source_column, 6);
        Ok(())
    }

    #[test]
    fn nested_sections_keep_origin() -> Result<()> {
        let parent = five_questions();
        let outer = parent.section(ColumnRange::starting_at(1))?;
        let inner = outer.section(ColumnRange::new(2, Some(4)))?;
        assert_eq!(inner.questions(), ["D", "E"]);
        assert_eq!(inner.source_column("D")?, 6);
        assert_eq!(inner.origin_range(), ColumnRange::starting_at(3));
        Ok(())
    }

    #[test]
    fn question_list_is_numbered_from_one() {
        let ds = five_questions();
        let list = ds.question_list();
        assert_eq!(list.len(), 5);
        assert_eq!(list[0], "1. A");
        assert_eq!(list[4], "5. E");
        ds.show_question_list();
    }

    #[test]
    fn bounded_range_and_empty_selection() -> Result<()> {
        init_test_logging();
        let table = survey_table(&["a", "b", "c"], &[&["1", "2", "3"]]);
        let ds = Dataset::new(table.clone(), ColumnRange::new(1, Some(2)))?;
        assert_eq!(ds.questions(), ["b"]);
        assert_eq!(ds.source_column("b")?, 1);

        let empty = Dataset::new(table, ColumnRange::starting_at(10))?;
        assert_eq!(empty.num_questions(), 0);
        assert_eq!(empty.num_responses(), 1);
        Ok(())
    }

    #[test]
    fn pop_last_column_keeps_row_count() -> Result<()> {
        init_test_logging();
        let table = survey_table(&["only"], &[&["x"], &[""], &["y"]]);
        let mut ds = Dataset::new(table, ColumnRange::default())?;
        let popped = ds.pop_other("only")?;
        assert_eq!(popped.responses, vec!["x", "y"]);
        assert_eq!(ds.num_questions(), 0);
        assert_eq!(ds.num_responses(), 3);
        Ok(())
    }
}
