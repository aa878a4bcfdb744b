//! Text parsing for payload sub-fields.
//!
//! List fields are comma-separated. Empty elements are kept, so `"a,,b,"`
//! yields four entries. Numbers that do not parse become `0`.

/// Split a comma-separated field, trimming each element.
pub fn split_list(text: &str) -> Vec<String> {
    text.split(',').map(|item| item.trim().to_string()).collect()
}

/// Coerce a numeric field. Anything that is not a finite number is `0`.
pub fn coerce_number(text: &str) -> f64 {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

/// Split a comma-separated field of numbers.
pub fn parse_numbers(text: &str) -> Vec<f64> {
    text.split(',').map(coerce_number).collect()
}

/// Split table rows: one row per line, cells separated by commas.
pub fn parse_rows(text: &str) -> Vec<Vec<String>> {
    text.split('\n')
        .map(|line| split_list(line.strip_suffix('\r').unwrap_or(line)))
        .collect()
}

/// Render a list back into its editable form.
pub fn join_list<T: ToString>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render table rows back into their editable form.
pub fn join_rows(rows: &[Vec<String>]) -> String {
    rows.iter().map(|row| join_list(row)).collect::<Vec<_>>().join("\n")
}
