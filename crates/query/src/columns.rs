//! Recovers result column order from the Cypher text.
//!
//! The driver hands rows back as hash maps, so the order of the `RETURN`
//! projection is lost by the time a row is decoded. Neo4j names each column
//! after its alias, or after the expression text when there is no alias, so
//! the projection itself tells us the order.

use crate::schema::ResultRow;

const CLAUSE_ENDINGS: [&str; 4] = ["ORDER", "SKIP", "LIMIT", "UNION"];

/// Column names of the last top-level `RETURN` clause, in projection order.
/// Empty when there is no such clause or it projects `*`.
pub fn return_columns(cypher: &str) -> Vec<String> {
    let upper = cypher.to_ascii_uppercase();
    let mask = top_level_mask(cypher);

    let Some(start) = keyword_positions(&upper, &mask, "RETURN").last().copied() else {
        return Vec::new();
    };
    let body_start = start + "RETURN".len();

    let mut body_end = cypher.len();
    for keyword in CLAUSE_ENDINGS {
        if let Some(&pos) = keyword_positions(&upper, &mask, keyword)
            .iter()
            .find(|&&pos| pos > body_start)
        {
            body_end = body_end.min(pos);
        }
    }
    if let Some(pos) = cypher[body_start..body_end]
        .char_indices()
        .find(|(i, c)| *c == ';' && mask[body_start + i])
        .map(|(i, _)| body_start + i)
    {
        body_end = pos;
    }

    let mut body = cypher[body_start..body_end].trim();
    let body_upper = body.to_ascii_uppercase();
    if body_upper.starts_with("DISTINCT")
        && !body[8..].starts_with(|c: char| c.is_alphanumeric() || c == '_')
    {
        body = body[8..].trim();
    }
    if body.is_empty() || body == "*" {
        return Vec::new();
    }

    split_top_level(body)
        .into_iter()
        .map(column_name)
        .filter(|name| !name.is_empty())
        .collect()
}

/// Re-key `row` so `columns` come first, in order. Keys the projection did
/// not name keep their existing relative order after those.
pub fn order_columns(row: ResultRow, columns: &[String]) -> ResultRow {
    if columns.is_empty() {
        return row;
    }

    let mut ordered = ResultRow::new();
    for column in columns {
        if let Some(value) = row.get(column) {
            ordered.insert(column.clone(), value.clone());
        }
    }
    for (key, value) in row {
        if !ordered.contains_key(&key) {
            ordered.insert(key, value);
        }
    }
    ordered
}

fn column_name(item: &str) -> String {
    let upper = item.to_ascii_uppercase();
    let mask = top_level_mask(item);

    let name = match keyword_positions(&upper, &mask, "AS").last() {
        Some(&pos) => item[pos + 2..].trim(),
        None => item.trim(),
    };

    // `a`.b keeps its backticks as the column name; a bare `alias` does not
    match name.strip_prefix('`').and_then(|n| n.strip_suffix('`')) {
        Some(inner) if !inner.contains('`') => inner.to_string(),
        _ => name.to_string(),
    }
}

/// Per byte, whether it sits outside every bracket pair and quoted span.
fn top_level_mask(text: &str) -> Vec<bool> {
    let mut mask = vec![false; text.len()];
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        let top_level = depth == 0 && quote.is_none();

        match quote {
            Some(q) => {
                if escaped {
                    escaped = false;
                } else if c == '\\' && q != '`' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
            }
            None => match c {
                '\'' | '"' | '`' => quote = Some(c),
                '(' | '[' | '{' => depth += 1,
                ')' | ']' | '}' => depth = depth.saturating_sub(1),
                _ => {}
            },
        }

        // the opening and closing characters themselves count as nested
        let top_level = top_level && depth == 0 && quote.is_none();
        for flag in &mut mask[i..i + c.len_utf8()] {
            *flag = top_level;
        }
    }

    mask
}

fn keyword_positions(upper: &str, mask: &[bool], keyword: &str) -> Vec<usize> {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';

    upper
        .match_indices(keyword)
        .map(|(pos, _)| pos)
        .filter(|&pos| mask[pos])
        .filter(|&pos| !upper[..pos].chars().next_back().is_some_and(is_word))
        .filter(|&pos| !upper[pos + keyword.len()..].chars().next().is_some_and(is_word))
        .collect()
}

fn split_top_level(body: &str) -> Vec<&str> {
    let mask = top_level_mask(body);
    let mut items = Vec::new();
    let mut start = 0;

    for (i, c) in body.char_indices() {
        if c == ',' && mask[i] {
            items.push(&body[start..i]);
            start = i + 1;
        }
    }
    items.push(&body[start..]);
    items
}
