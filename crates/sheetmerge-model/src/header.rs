use std::collections::HashSet;

use crate::Value;

/// Turn a sheet's header row into unique column names.
///
/// - Header cells are rendered with their canonical text form.
/// - A blank header at position `i` becomes `Unnamed: i`.
/// - A repeated name `x` becomes `x.1`, `x.2`, ... in order of appearance,
///   skipping suffixes that are already taken.
pub fn header_names(cells: &[Value]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(cells.len());
    let mut out = Vec::with_capacity(cells.len());

    for (idx, cell) in cells.iter().enumerate() {
        let base = if cell.is_blank_text() {
            format!("Unnamed: {idx}")
        } else {
            cell.to_string()
        };

        let mut name = base.clone();
        let mut suffix = 1usize;
        while seen.contains(&name) {
            name = format!("{base}.{suffix}");
            suffix += 1;
        }

        seen.insert(name.clone());
        out.push(name);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_headers_get_positional_names() {
        let names = header_names(&[Value::from("id"), Value::Blank, Value::from("  ")]);
        assert_eq!(names, vec!["id", "Unnamed: 1", "Unnamed: 2"]);
    }

    #[test]
    fn duplicates_get_numeric_suffixes() {
        let names = header_names(&[
            Value::from("a"),
            Value::from("a"),
            Value::from("a.1"),
            Value::from("a"),
        ]);
        assert_eq!(names, vec!["a", "a.1", "a.1.1", "a.2"]);
    }

    #[test]
    fn numeric_headers_render_as_text() {
        let names = header_names(&[Value::Number(2024.0), Value::Boolean(true)]);
        assert_eq!(names, vec!["2024", "TRUE"]);
    }
}
