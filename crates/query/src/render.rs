use serde_json::Value;
use tabled::{Table, settings::Style};

use crate::schema::ResultRow;

pub const NO_RESULTS: &str = "No results found";

/// Render rows as a box-drawn table. Columns come from the first row; later
/// rows missing one of those keys get an empty cell.
pub fn render_results(rows: Option<&[ResultRow]>) -> String {
    let rows = match rows {
        Some(rows) if !rows.is_empty() => rows,
        _ => return NO_RESULTS.to_string(),
    };

    let columns: Vec<&String> = rows[0].keys().collect();

    let mut data: Vec<Vec<String>> = Vec::with_capacity(rows.len() + 1);
    data.push(columns.iter().map(|column| column.to_string()).collect());
    for row in rows {
        data.push(
            columns
                .iter()
                .map(|column| row.get(*column).map(format_value).unwrap_or_default())
                .collect(),
        );
    }

    Table::from_iter(data).with(Style::rounded()).to_string()
}

/// Strings print bare, everything else as compact JSON.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn row(pairs: &[(&str, Value)]) -> ResultRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_no_rows_prints_notice() {
        assert_eq!(render_results(None), NO_RESULTS);
        assert_eq!(render_results(Some(&[])), NO_RESULTS);
    }

    #[test]
    fn test_table_layout() {
        let rows = vec![
            row(&[("name", json!("Ada")), ("age", json!(36))]),
            row(&[("name", json!("Grace Hopper")), ("age", json!(null))]),
        ];

        let expected = "\
╭──────────────┬──────╮
│ name         │ age  │
├──────────────┼──────┤
│ Ada          │ 36   │
│ Grace Hopper │ null │
╰──────────────┴──────╯";
        assert_eq!(render_results(Some(&rows)), expected);
    }

    #[test]
    fn test_columns_follow_first_row() {
        let rows = vec![
            row(&[("a", json!(1))]),
            row(&[("b", json!(2))]),
        ];

        let rendered = render_results(Some(&rows));
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[1], "│ a │");
        assert_eq!(lines[3], "│ 1 │");
        assert_eq!(lines[4], "│   │");
    }

    #[test]
    fn test_wide_characters_keep_columns_aligned() {
        let rows = vec![
            row(&[("city", json!("東京")), ("n", json!(1))]),
            row(&[("city", json!("Oslo")), ("n", json!(2))]),
        ];

        let rendered = render_results(Some(&rows));
        let lines: Vec<&str> = rendered.lines().collect();

        // 東京 is two characters but four terminal columns wide
        assert_eq!(lines[1], "│ city │ n │");
        assert_eq!(lines[3], "│ 東京 │ 1 │");
        assert_eq!(lines[4], "│ Oslo │ 2 │");
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&json!("plain")), "plain");
        assert_eq!(format_value(&json!(1.5)), "1.5");
        assert_eq!(format_value(&json!(["x", 1])), r#"["x",1]"#);
        assert_eq!(format_value(&json!({"k": true})), r#"{"k":true}"#);
    }
}
