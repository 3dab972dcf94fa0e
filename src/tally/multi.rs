use serde::Deserialize;

use super::FrequencyTable;

/// How a "select all that apply" cell is broken into selections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Splitter {
    pub delimiter: char,
    /// Strip whitespace around each selection. Off by default, so `"A, C"`
    /// selects `"A"` and `" C"`.
    pub trim: bool,
}

impl Default for Splitter {
    fn default() -> Self {
        Self {
            delimiter: ',',
            trim: false,
        }
    }
}

impl Splitter {
    pub fn trimmed() -> Self {
        Self {
            trim: true,
            ..Self::default()
        }
    }

    pub fn split<'a>(&self, cell: &'a str) -> Vec<&'a str> {
        cell.split(self.delimiter)
            .map(|s| if self.trim { s.trim() } else { s })
            .collect()
    }

    /// One list of selections per row; a null cell selects nothing.
    pub fn selections<'a, I>(&self, cells: I) -> Vec<Vec<&'a str>>
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        cells
            .into_iter()
            .map(|cell| cell.map(|c| self.split(c)).unwrap_or_default())
            .collect()
    }
}

/// Frequencies for a multi-answer question. A response contributes once to
/// every option it selected.
pub fn count_multi_choice<'a, I>(cells: I, sort: bool, splitter: &Splitter) -> FrequencyTable
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let selections = splitter.selections(cells);
    FrequencyTable::tabulate(selections.iter().flatten().copied(), sort)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CELLS: [Option<&str>; 5] = [
        Some("TA,GSR"),
        None,
        Some("GSR"),
        Some("Fellowship,TA,GSR"),
        Some("Loans"),
    ];

    #[test]
    fn each_selection_is_counted() {
        let table = count_multi_choice(CELLS, true, &Splitter::default());
        assert_eq!(
            table.pairs(),
            vec![("Fellowship", 1), ("GSR", 3), ("Loans", 1), ("TA", 2)]
        );
    }

    #[test]
    fn counts_sum_to_selections() {
        let splitter = Splitter::default();
        let selections: usize = splitter.selections(CELLS).iter().map(Vec::len).sum();
        assert_eq!(selections, 7);
        assert_eq!(
            count_multi_choice(CELLS, false, &splitter).total(),
            selections as u64
        );
    }

    #[test]
    fn selections_are_jagged_per_row() {
        let rows = Splitter::default().selections(CELLS);
        assert_eq!(rows.len(), CELLS.len());
        assert_eq!(rows[0], vec!["TA", "GSR"]);
        assert!(rows[1].is_empty());
        assert_eq!(rows[3].len(), 3);
    }

    #[test]
    fn unsorted_follows_row_major_first_occurrence() {
        let table = count_multi_choice(CELLS, false, &Splitter::default());
        assert_eq!(table.labels(), ["TA", "GSR", "Fellowship", "Loans"]);
    }

    #[test]
    fn whitespace_is_literal_unless_trimmed() {
        let cells = [Some("A, C"), Some("C")];
        let literal = count_multi_choice(cells, true, &Splitter::default());
        assert_eq!(literal.pairs(), vec![(" C", 1), ("A", 1), ("C", 1)]);

        let trimmed = count_multi_choice(cells, true, &Splitter::trimmed());
        assert_eq!(trimmed.pairs(), vec![("A", 1), ("C", 2)]);
    }

    #[test]
    fn empty_selection_between_delimiters_is_kept() {
        let table = count_multi_choice([Some("a,,b")], true, &Splitter::default());
        assert_eq!(table.pairs(), vec![("", 1), ("a", 1), ("b", 1)]);
    }

    #[test]
    fn custom_delimiter() {
        let splitter = Splitter {
            delimiter: ';',
            trim: false,
        };
        let table = count_multi_choice([Some("a;b"), Some("a,b")], true, &splitter);
        assert_eq!(table.pairs(), vec![("a", 1), ("a,b", 1), ("b", 1)]);
    }
}
