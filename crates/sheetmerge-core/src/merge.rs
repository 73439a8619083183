use serde::{Deserialize, Serialize};
use sheetmerge_model::{Table, Value};

use crate::{normalize_key, ColumnRole, LookupIndex, MergeError, TableSide};

/// How a looked-up value is applied to the destination's target column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillPolicy {
    /// Always replace the target cell.
    ///
    /// Rows whose key has no match are set to blank, even if the target cell
    /// already held a value.
    #[default]
    Overwrite,
    /// Only replace target cells that are blank or whitespace-only.
    FillEmptyOnly,
}

/// Column names driving a merge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeSpec {
    /// Key column in the source table.
    pub source_key: String,
    /// Column copied out of the source table when keys match.
    pub source_value: String,
    /// Key column in the destination table.
    pub dest_key: String,
    /// Column written in the destination table; created if missing.
    pub dest_target: String,
}

impl MergeSpec {
    pub fn new(
        source_key: impl Into<String>,
        source_value: impl Into<String>,
        dest_key: impl Into<String>,
        dest_target: impl Into<String>,
    ) -> Self {
        Self {
            source_key: source_key.into(),
            source_value: source_value.into(),
            dest_key: dest_key.into(),
            dest_target: dest_target.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStats {
    /// Destination rows whose normalized key resolved to a source value.
    pub matched: usize,
    /// Destination row count.
    pub total: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MergeResult {
    pub table: Table,
    pub stats: MatchStats,
}

/// Copy `spec.source_value` from `source` into `spec.dest_target` of a copy of
/// `dest`, matching rows by normalized key.
///
/// All column preconditions are checked before any row work; on error `dest`
/// is untouched and nothing is produced. Row order and every column other than
/// the target are preserved verbatim.
pub fn merge(
    source: &Table,
    dest: &Table,
    spec: &MergeSpec,
    policy: FillPolicy,
) -> Result<MergeResult, MergeError> {
    check_source_column(source, &spec.source_key, ColumnRole::SourceKey)?;
    check_source_column(source, &spec.source_value, ColumnRole::SourceValue)?;
    let key_col = dest
        .column_index(&spec.dest_key)
        .ok_or_else(|| MergeError::ColumnNotFound {
            column: spec.dest_key.clone(),
            role: ColumnRole::DestinationKey,
            side: TableSide::Destination,
        })?;

    let index = LookupIndex::build(source, &spec.source_key, &spec.source_value)?;

    let mut table = dest.clone();
    if !table.has_column(&spec.dest_target) {
        log::info!(
            "target column '{}' does not exist in the destination; creating it",
            spec.dest_target
        );
    }
    let target_col = table.ensure_column(&spec.dest_target);

    let mut matched = 0usize;
    for row in table.rows_mut() {
        // Read the key before writing: the target may be the key column itself.
        let key = normalize_key(row.get(key_col));
        let found = index.lookup(&key);
        if found.is_some() {
            matched += 1;
        }

        let apply = match policy {
            FillPolicy::Overwrite => true,
            FillPolicy::FillEmptyOnly => row.get(target_col).is_blank_text(),
        };
        if apply {
            row.set(target_col, found.cloned().unwrap_or(Value::Blank));
        }
    }

    let stats = MatchStats {
        matched,
        total: table.row_count(),
    };
    log::debug!("matched {}/{} destination rows", stats.matched, stats.total);

    Ok(MergeResult { table, stats })
}

fn check_source_column(source: &Table, column: &str, role: ColumnRole) -> Result<(), MergeError> {
    if source.has_column(column) {
        Ok(())
    } else {
        Err(MergeError::ColumnNotFound {
            column: column.to_string(),
            role,
            side: TableSide::Source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_may_be_the_key_column() {
        let source = Table::from_rows(
            ["k", "v"],
            [vec![Value::from("a"), Value::from("A-value")]],
        )
        .unwrap();
        let dest = Table::from_rows(["k"], [vec![Value::from("A")], vec![Value::from("z")]]).unwrap();

        let result = merge(
            &source,
            &dest,
            &MergeSpec::new("k", "v", "k", "k"),
            FillPolicy::Overwrite,
        )
        .unwrap();

        assert_eq!(
            result.table.column_values("k").unwrap(),
            vec![&Value::from("A-value"), &Value::Blank]
        );
        assert_eq!(result.stats, MatchStats { matched: 1, total: 2 });
    }

    #[test]
    fn empty_destination_yields_zero_stats() {
        let source = Table::from_rows(["k", "v"], Vec::<Vec<Value>>::new()).unwrap();
        let dest = Table::new(["k"]).unwrap();
        let result = merge(
            &source,
            &dest,
            &MergeSpec::new("k", "v", "k", "t"),
            FillPolicy::FillEmptyOnly,
        )
        .unwrap();
        assert_eq!(result.stats, MatchStats::default());
        assert_eq!(result.table.columns(), &["k", "t"]);
    }
}
