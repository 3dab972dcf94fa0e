use super::FrequencyTable;

/// Frequencies for a question with one answer per response.
///
/// Null cells are not a label and never count toward one; a column with no
/// answers gives an empty table.
pub fn count_single_choice<'a, I>(cells: I, sort: bool) -> FrequencyTable
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    FrequencyTable::tabulate(cells.into_iter().flatten(), sort)
}
