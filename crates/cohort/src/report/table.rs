//! Bordered table layout in the dataframe `show()` style.

use crate::query::ResultTable;
use crate::schema::Value;

/// Cells longer than this are cut to `MAX_CELL_WIDTH - 3` chars plus `...`.
pub const MAX_CELL_WIDTH: usize = 20;

fn cell(value: &Value) -> String {
    shorten(value.to_string())
}

fn shorten(text: String) -> String {
    if text.chars().count() > MAX_CELL_WIDTH {
        let kept: String = text.chars().take(MAX_CELL_WIDTH - 3).collect();
        format!("{}...", kept)
    } else {
        text
    }
}

/// Render a result table: right-aligned cells between `+---+` borders,
/// followed by `only showing top N rows` when rows were cut.
pub fn render_table(table: &ResultTable) -> String {
    let header: Vec<String> = table.columns.iter().map(|c| shorten(c.clone())).collect();
    let body: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.iter().map(cell).collect())
        .collect();

    let widths: Vec<usize> = header
        .iter()
        .enumerate()
        .map(|(i, h)| {
            body.iter()
                .filter_map(|r| r.get(i))
                .map(|c| c.chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
                .max(3)
        })
        .collect();

    let border = {
        let mut line = String::from("+");
        for w in &widths {
            line.push_str(&"-".repeat(*w));
            line.push('+');
        }
        line
    };
    let line = |cells: &[String]| {
        let mut out = String::from("|");
        for (c, w) in cells.iter().zip(&widths) {
            out.push_str(&format!("{:>width$}|", c, width = w));
        }
        out
    };

    let mut out = Vec::with_capacity(body.len() + 4);
    out.push(border.clone());
    out.push(line(&header));
    out.push(border.clone());
    for row in &body {
        out.push(line(row));
    }
    out.push(border);
    if table.is_truncated() {
        let n = table.rows.len();
        out.push(format!(
            "only showing top {} {}",
            n,
            if n == 1 { "row" } else { "rows" }
        ));
    }

    let mut rendered = out.join("\n");
    rendered.push('\n');
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_layout() {
        let table = ResultTable::new(
            vec!["StudentID".to_string(), "GPA".to_string()],
            vec![
                vec![Value::from("S1"), Value::Float(3.5)],
                vec![Value::from("S2"), Value::Null],
            ],
        );
        let expected = "\
+---------+----+
|StudentID| GPA|
+---------+----+
|       S1| 3.5|
|       S2|null|
+---------+----+
";
        assert_eq!(render_table(&table), expected);
    }

    #[test]
    fn test_render_truncation_footer() {
        let table = ResultTable::new(
            vec!["n".to_string()],
            (0..7).map(|i| vec![Value::Int(i)]).collect(),
        )
        .truncated(5);
        let rendered = render_table(&table);

        assert!(rendered.ends_with("only showing top 5 rows\n"));
        assert_eq!(rendered.lines().count(), 10);
    }

    #[test]
    fn test_long_cells_are_cut() {
        let table = ResultTable::new(
            vec!["InternshipCompany".to_string()],
            vec![vec![Value::from("Consolidated Widgets Incorporated")]],
        );
        let rendered = render_table(&table);
        assert!(rendered.contains("|Consolidated Widg...|"));
    }
}
