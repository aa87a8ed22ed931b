//! Text rendering of query results.
//!
//! Results are serialized to the tuple-list form the rest of the pipeline
//! expects: `[(1, 'a'), (2, 'b')]`, with single-element rows rendered as
//! one-tuples (`[(42,)]`) and zero rows as the empty string.

/// Render decoded rows into the tuple-list text form.
pub fn format_rows(rows: &[Vec<String>]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let tuples: Vec<String> = rows.iter().map(|row| format_tuple(row)).collect();
    format!("[{}]", tuples.join(", "))
}

fn format_tuple(values: &[String]) -> String {
    if values.len() == 1 {
        format!("({},)", values[0])
    } else {
        format!("({})", values.join(", "))
    }
}

/// Quote a text value, doubling embedded quotes.
pub fn quote_text(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Render rows as a tab-separated block with a header line. Used for the
/// sample rows appended to schema descriptions.
pub fn format_table(columns: &[String], rows: &[Vec<String>]) -> String {
    let mut lines = vec![columns.join("\t")];
    lines.extend(rows.iter().map(|row| row.join("\t")));
    lines.join("\n")
}
