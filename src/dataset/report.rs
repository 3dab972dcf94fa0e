use tracing::{info, warn};

use super::Dataset;
use crate::columns::column_label;

/// What `pop_other` removed, with the position it had in the exported file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoppedColumn {
    pub question_number: usize,
    pub source_column: usize,
    pub question: String,
    /// Non-empty cells, in row order.
    pub responses: Vec<String>,
}

impl PoppedColumn {
    pub fn column_label(&self) -> String {
        column_label(self.source_column)
    }

    pub fn response_line(&self) -> String {
        if self.responses.is_empty() {
            "Responses: None".to_string()
        } else {
            format!("Responses: {:?}", self.responses)
        }
    }

    pub(super) fn report(&self) {
        info!(
            "Popping Q{} (column {}): {}",
            self.question_number,
            self.column_label(),
            self.question
        );
        info!("{}", self.response_line());
    }
}

impl Dataset {
    pub(super) fn report_init(&self) {
        let (Some(first), Some(last)) = (self.origins.first(), self.origins.last()) else {
            warn!(range = %self.origin_range, "no columns selected");
            return;
        };
        info!(
            column = %column_label(first.source_column),
            question = %self.questions[0],
            "data recorded from"
        );
        info!(
            column = %column_label(last.source_column),
            question = %self.questions[self.questions.len() - 1],
            "data recorded to"
        );
        info!(
            responses = self.num_responses(),
            questions = self.num_questions(),
            "initialization completed"
        );
    }

    /// Log the numbered question listing.
    pub fn show_question_list(&self) {
        for line in self.question_list() {
            info!("{}", line);
        }
    }
}
