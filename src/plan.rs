//! YAML analysis plan: one file describing a whole survey session.
//!
//! ```yaml
//! file: census.csv
//! range: "R:"
//! pop_other:
//!   - "Other - Text"
//! output_dir: tables
//! questions:
//!   - column: "Which of the following fund you?"
//!     kind: multi
//!     aliases: { GSR: Researcher }
//!     bottom: "^Other"
//!     output: funding.csv
//! ```

use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{info, instrument};

use crate::{
    columns::ColumnRange,
    dataset::{Dataset, PoppedColumn},
    load::{read_survey, LoadOptions, SurveyTable},
    output::write_table,
    relabel::{alias_labels, matching, move_to_bottom, AliasMap},
    tally::{FrequencyTable, QuestionKind, Splitter},
};

/// First column holding answers in a Qualtrics export (`R`); the columns
/// before it are response metadata.
pub const DEFAULT_FIRST_QUESTION: usize = 17;

fn default_range() -> ColumnRange {
    ColumnRange::starting_at(DEFAULT_FIRST_QUESTION)
}

fn default_sort() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Plan {
    pub file: PathBuf,
    #[serde(default)]
    pub load: LoadOptions,
    #[serde(default = "default_range")]
    pub range: ColumnRange,
    /// Free-text columns to report and drop before tabulating.
    #[serde(default)]
    pub pop_other: Vec<String>,
    /// How multi-choice cells are split into selections.
    #[serde(default)]
    pub splitter: Splitter,
    /// Base directory for relative question outputs.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub questions: Vec<QuestionPlan>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuestionPlan {
    pub column: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub kind: QuestionKind,
    #[serde(default = "default_sort")]
    pub sort: bool,
    #[serde(default)]
    pub aliases: AliasMap,
    /// Regex; rows whose label matches go to the bottom.
    #[serde(default)]
    pub bottom: Option<String>,
    #[serde(default)]
    pub output: Option<PathBuf>,
}

/// Result of one planned question.
#[derive(Debug, Clone)]
pub struct QuestionReport {
    pub column: String,
    pub title: String,
    pub table: FrequencyTable,
    pub written: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct PlanReport {
    pub popped: Vec<PoppedColumn>,
    pub questions: Vec<QuestionReport>,
}

impl Plan {
    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).context("parsing analysis plan")
    }

    /// Read a plan file. Relative paths inside it are taken relative to the
    /// plan's own directory.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).with_context(|| format!("reading plan {:?}", path))?;
        let mut plan = Self::from_yaml(&text).with_context(|| format!("in {:?}", path))?;
        if let Some(base) = path.parent() {
            plan.rebase(base);
        }
        Ok(plan)
    }

    fn rebase(&mut self, base: &Path) {
        if self.file.is_relative() {
            self.file = base.join(&self.file);
        }
        let output_dir = match self.output_dir.take() {
            Some(dir) if dir.is_relative() => base.join(dir),
            Some(dir) => dir,
            None => base.to_path_buf(),
        };
        self.output_dir = Some(output_dir);
    }

    /// Load the survey named by the plan and run it.
    #[instrument(level = "info", skip(self), fields(file = %self.file.display()))]
    pub fn run(&self) -> Result<PlanReport> {
        let table = read_survey(&self.file, &self.load)?;
        self.run_on(table)
    }

    /// Run the plan against an already loaded survey.
    pub fn run_on(&self, table: SurveyTable) -> Result<PlanReport> {
        let mut dataset = Dataset::new(table, self.range)?;

        let mut popped = Vec::with_capacity(self.pop_other.len());
        for column in &self.pop_other {
            popped.push(
                dataset
                    .pop_other(column)
                    .with_context(|| format!("popping {:?}", column))?,
            );
        }

        let splitter = self.splitter;
        let mut questions = Vec::with_capacity(self.questions.len());
        for question in &self.questions {
            questions.push(self.run_question(&dataset, question, &splitter)?);
        }

        info!(
            popped = popped.len(),
            questions = questions.len(),
            "plan completed"
        );
        Ok(PlanReport { popped, questions })
    }

    fn run_question(
        &self,
        dataset: &Dataset,
        question: &QuestionPlan,
        splitter: &Splitter,
    ) -> Result<QuestionReport> {
        let mut table = dataset
            .count(&question.column, question.kind, question.sort, splitter)
            .with_context(|| format!("tabulating {:?}", question.column))?;

        if !question.aliases.is_empty() {
            table = alias_labels(&table, &question.aliases);
        }
        if let Some(pattern) = &question.bottom {
            let pattern =
                Regex::new(pattern).with_context(|| format!("bad bottom pattern {:?}", pattern))?;
            table = move_to_bottom(&table, matching(&pattern));
        }

        let written = match &question.output {
            Some(out) => {
                let out = match &self.output_dir {
                    Some(dir) if out.is_relative() => dir.join(out),
                    _ => out.clone(),
                };
                write_table(&table, &out)?;
                Some(out)
            }
            None => None,
        };

        Ok(QuestionReport {
            column: question.column.clone(),
            title: question
                .title
                .clone()
                .unwrap_or_else(|| question.column.clone()),
            table,
            written,
        })
    }
}
