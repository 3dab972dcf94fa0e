// src/tally/mod.rs
//! Choice-frequency tabulation for single-answer and multi-answer questions.

pub mod frequency;
pub mod multi;
pub mod single;

use serde::Deserialize;
use std::{fmt, str::FromStr};

pub use frequency::{FrequencyRow, FrequencyTable};
pub use multi::{count_multi_choice, Splitter};
pub use single::count_single_choice;

/// How a question's cells encode the answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    #[default]
    Single,
    Multi,
}

impl QuestionKind {
    pub fn as_str(&self) -> &str {
        match self {
            QuestionKind::Single => "single",
            QuestionKind::Multi => "multi",
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" => Ok(QuestionKind::Single),
            "multi" => Ok(QuestionKind::Multi),
            other => Err(format!("unknown question kind '{}'", other)),
        }
    }
}
