//! Minimal RFC 4180 text codec shared by the readings loader and the
//! evidence log. Quoted fields may contain commas, quotes and newlines.

/// Formats one row, quoting fields that need it, without a line terminator.
///
/// # Examples
///
/// ```
/// use hermia_common::csv::format_row;
///
/// let row = format_row(&["a", "b,c", "say \"hi\""]);
/// assert_eq!(row, r#"a,"b,c","say ""hi""""#);
/// ```
pub fn format_row<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|f| quote(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

fn quote(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Parses text into rows of fields. Blank lines are skipped and a trailing
/// newline is optional.
pub fn parse(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                row.push(std::mem::take(&mut field));
                push_row(&mut rows, std::mem::take(&mut row));
            }
            _ => field.push(c),
        }
    }
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        push_row(&mut rows, row);
    }
    rows
}

fn push_row(rows: &mut Vec<Vec<String>>, row: Vec<String>) {
    let blank = row.len() == 1 && row[0].trim().is_empty();
    if !blank {
        rows.push(row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_rows() {
        let rows = parse("ts,vibration\n2024-01-01 00:00:00,0.5\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], vec!["2024-01-01 00:00:00", "0.5"]);
    }

    #[test]
    fn parses_quoted_fields_with_separators() {
        let rows = parse("a,\"x, y\",\"multi\nline\",\"q\"\"q\"\r\nnext,,end");
        assert_eq!(rows[0], vec!["a", "x, y", "multi\nline", "q\"q"]);
        assert_eq!(rows[1], vec!["next", "", "end"]);
    }

    #[test]
    fn skips_blank_lines() {
        let rows = parse("a,b\n\n\nc,d\n");
        assert_eq!(rows, vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn formatted_row_parses_back() {
        let fields = ["vibration >= 0.8 (value=1.3, 3/5, high) | x", "plain"];
        let line = format_row(&fields);
        assert_eq!(parse(&line), vec![fields.to_vec()]);
    }
}
