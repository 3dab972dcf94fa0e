use prettytable::{format, Cell, Row, Table};

use crate::tally::FrequencyTable;

/// Box-drawn rendering of a frequency table with a total row.
pub fn render(table: &FrequencyTable, title: Option<&str>) -> String {
    let aliased = table.aliases().is_some();
    let mut out = Table::new();
    out.set_format(*format::consts::FORMAT_BOX_CHARS);

    if let Some(title) = title {
        out.set_titles(Row::new(vec![Cell::new(title).style_spec(if aliased {
            "bH3"
        } else {
            "bH2"
        })]));
        out.add_row(header(aliased));
    } else {
        out.set_titles(header(aliased));
    }

    for row in table.rows() {
        let mut cells = vec![
            Cell::new(row.label),
            Cell::new(&row.count.to_string()).style_spec("r"),
        ];
        if let Some(alias) = row.alias {
            cells.push(Cell::new(alias));
        }
        out.add_row(Row::new(cells));
    }

    let mut total = vec![
        Cell::new("Total").style_spec("b"),
        Cell::new(&table.total().to_string()).style_spec("br"),
    ];
    if aliased {
        total.push(Cell::new(""));
    }
    out.add_row(Row::new(total));

    out.to_string()
}

fn header(aliased: bool) -> Row {
    let mut cells = vec![
        Cell::new("labels").style_spec("bFg"),
        Cell::new("counts").style_spec("bFg"),
    ];
    if aliased {
        cells.push(Cell::new("alias").style_spec("bFg"));
    }
    Row::new(cells)
}

/// Box-drawn listing of numbered lines, e.g. a question list.
pub fn render_list(title: &str, lines: &[String]) -> String {
    let mut out = Table::new();
    out.set_format(*format::consts::FORMAT_BOX_CHARS);
    out.set_titles(Row::new(vec![Cell::new(title).style_spec("bFg")]));
    for line in lines {
        out.add_row(Row::new(vec![Cell::new(line)]));
    }
    out.to_string()
}
