use std::collections::HashMap;

use sheetmerge_model::{Table, Value};

use crate::{normalize_key, ColumnRole, MergeError, NormalizedKey, TableSide};

/// Normalized key -> chosen source value, built once per merge.
///
/// Entries are kept in insertion (source row) order. For each key the first
/// non-null value wins; later rows never replace an existing entry, and a null
/// value never claims a key.
#[derive(Clone, Debug, Default)]
pub struct LookupIndex {
    entries: Vec<(NormalizedKey, Value)>,
    positions: HashMap<NormalizedKey, usize>,
}

impl LookupIndex {
    /// Build the index from `source`.
    ///
    /// Both columns are validated before any row is scanned.
    pub fn build(source: &Table, key_column: &str, value_column: &str) -> Result<Self, MergeError> {
        let key_col = require_column(source, key_column, ColumnRole::SourceKey)?;
        let value_col = require_column(source, value_column, ColumnRole::SourceValue)?;

        let mut index = Self::default();
        for row in source.rows() {
            index.offer(normalize_key(row.get(key_col)), row.get(value_col));
        }

        log::debug!(
            "built lookup index with {} keys from {} source rows",
            index.len(),
            source.row_count()
        );
        Ok(index)
    }

    fn offer(&mut self, key: NormalizedKey, value: &Value) {
        if value.is_null() || self.positions.contains_key(&key) {
            return;
        }
        self.positions.insert(key.clone(), self.entries.len());
        self.entries.push((key, value.clone()));
    }

    pub fn lookup(&self, key: &NormalizedKey) -> Option<&Value> {
        let pos = *self.positions.get(key)?;
        self.entries.get(pos).map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in the order their keys first appeared with a non-null value.
    pub fn iter(&self) -> impl Iterator<Item = (&NormalizedKey, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }
}

fn require_column(source: &Table, column: &str, role: ColumnRole) -> Result<usize, MergeError> {
    source
        .column_index(column)
        .ok_or_else(|| MergeError::ColumnNotFound {
            column: column.to_string(),
            role,
            side: TableSide::Source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(rows: Vec<Vec<Value>>) -> Table {
        Table::from_rows(["key", "val"], rows).unwrap()
    }

    fn get(index: &LookupIndex, key: &str) -> Option<Value> {
        index.lookup(&normalize_key(&Value::from(key))).cloned()
    }

    #[test]
    fn first_occurrence_wins_after_normalization() {
        let table = source(vec![
            vec![Value::from("A"), Value::from(1.0)],
            vec![Value::from("a"), Value::from(2.0)],
        ]);
        let index = LookupIndex::build(&table, "key", "val").unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(get(&index, "A"), Some(Value::from(1.0)));
    }

    #[test]
    fn null_values_do_not_claim_keys() {
        let table = source(vec![
            vec![Value::from("X"), Value::Blank],
            vec![Value::from("X"), Value::from(7.0)],
            vec![Value::from("x"), Value::Blank],
        ]);
        let index = LookupIndex::build(&table, "key", "val").unwrap();
        assert_eq!(get(&index, "x"), Some(Value::from(7.0)));
    }

    #[test]
    fn entries_keep_source_order() {
        let table = source(vec![
            vec![Value::from("b"), Value::from(1.0)],
            vec![Value::from("a"), Value::Blank],
            vec![Value::from("c"), Value::from(3.0)],
            vec![Value::from("a"), Value::from(4.0)],
        ]);
        let index = LookupIndex::build(&table, "key", "val").unwrap();
        let keys: Vec<&str> = index.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["b", "c", "a"]);
    }

    #[test]
    fn blank_keys_collapse_to_one_entry() {
        let table = source(vec![
            vec![Value::Blank, Value::from("first")],
            vec![Value::from("  "), Value::from("second")],
        ]);
        let index = LookupIndex::build(&table, "key", "val").unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(get(&index, ""), Some(Value::from("first")));
    }

    #[test]
    fn missing_columns_fail_with_role() {
        let table = source(Vec::new());
        assert_eq!(
            LookupIndex::build(&table, "nope", "val").unwrap_err(),
            MergeError::ColumnNotFound {
                column: "nope".to_string(),
                role: ColumnRole::SourceKey,
                side: TableSide::Source,
            }
        );
        assert_eq!(
            LookupIndex::build(&table, "key", "nope").unwrap_err(),
            MergeError::ColumnNotFound {
                column: "nope".to_string(),
                role: ColumnRole::SourceValue,
                side: TableSide::Source,
            }
        );
    }

    #[test]
    fn lookup_misses_are_none() {
        let index = LookupIndex::default();
        assert!(index.is_empty());
        assert_eq!(get(&index, "anything"), None);
    }
}
