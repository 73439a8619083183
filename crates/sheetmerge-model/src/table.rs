use thiserror::Error;

use crate::Value;

static BLANK: Value = Value::Blank;

/// Errors that can occur when creating or mutating a table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),
    #[error("row {row} has {width} cells but the table only declares {columns} columns")]
    RowTooWide {
        row: usize,
        width: usize,
        columns: usize,
    },
}

/// One record of a [`Table`].
///
/// Cells are stored positionally, aligned with the owning table's column list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row {
    cells: Vec<Value>,
}

impl Row {
    /// Cell at `column`, or [`Value::Blank`] past the end of the row.
    pub fn get(&self, column: usize) -> &Value {
        self.cells.get(column).unwrap_or(&BLANK)
    }

    /// Replace the cell at `column`. Returns false if the column is out of range.
    pub fn set(&mut self, column: usize, value: Value) -> bool {
        match self.cells.get_mut(column) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    pub fn cells(&self) -> &[Value] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// An in-memory sheet: ordered, uniquely named columns and ordered rows.
///
/// Every row has exactly one cell per declared column; short rows are padded
/// with [`Value::Blank`] on insert so missing cells are never absent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Create an empty table with the given column names.
    pub fn new<I, S>(columns: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for name in columns {
            let name = name.into();
            if out.contains(&name) {
                return Err(TableError::DuplicateColumn(name));
            }
            out.push(name);
        }
        Ok(Self {
            columns: out,
            rows: Vec::new(),
        })
    }

    /// Convenience constructor used heavily by tests and fixtures.
    pub fn from_rows<C, S, R, V>(columns: C, rows: R) -> Result<Self, TableError>
    where
        C: IntoIterator<Item = S>,
        S: Into<String>,
        R: IntoIterator<Item = Vec<V>>,
        V: Into<Value>,
    {
        let mut table = Self::new(columns)?;
        for row in rows {
            table.push_row(row.into_iter().map(Into::into))?;
        }
        Ok(table)
    }

    /// Append a row. Short rows are padded with blanks; rows wider than the
    /// column list are rejected.
    pub fn push_row<I>(&mut self, values: I) -> Result<(), TableError>
    where
        I: IntoIterator<Item = Value>,
    {
        let mut cells: Vec<Value> = values.into_iter().collect();
        if cells.len() > self.columns.len() {
            return Err(TableError::RowTooWide {
                row: self.rows.len(),
                width: cells.len(),
                columns: self.columns.len(),
            });
        }
        cells.resize(self.columns.len(), Value::Blank);
        self.rows.push(Row { cells });
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Position of a column by exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cell at (`row`, `column`) by column name.
    pub fn cell(&self, row: usize, column: &str) -> Option<&Value> {
        let col = self.column_index(column)?;
        self.rows.get(row).map(|r| r.get(col))
    }

    /// All cells of one column, in row order.
    pub fn column_values(&self, column: &str) -> Option<Vec<&Value>> {
        let col = self.column_index(column)?;
        Some(self.rows.iter().map(|r| r.get(col)).collect())
    }

    /// Return the index of `name`, appending it (filled with blanks) if absent.
    pub fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(idx) = self.column_index(name) {
            return idx;
        }
        self.columns.push(name.to_string());
        for row in &mut self.rows {
            row.cells.push(Value::Blank);
        }
        self.columns.len() - 1
    }

    /// Replace the cell at (`row`, `column`). Returns false if either is out of range.
    pub fn set_cell(&mut self, row: usize, column: usize, value: Value) -> bool {
        match self.rows.get_mut(row) {
            Some(r) => r.set(column, value),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_rows_are_padded_with_blanks() {
        let mut table = Table::new(["a", "b", "c"]).unwrap();
        table.push_row([Value::from("x")]).unwrap();
        assert_eq!(
            table.rows()[0].cells(),
            &[Value::from("x"), Value::Blank, Value::Blank]
        );
    }

    #[test]
    fn wide_rows_are_rejected() {
        let mut table = Table::new(["a"]).unwrap();
        let err = table
            .push_row([Value::from(1.0), Value::from(2.0)])
            .unwrap_err();
        assert_eq!(
            err,
            TableError::RowTooWide {
                row: 0,
                width: 2,
                columns: 1
            }
        );
    }

    #[test]
    fn duplicate_columns_are_rejected() {
        assert_eq!(
            Table::new(["a", "a"]).unwrap_err(),
            TableError::DuplicateColumn("a".to_string())
        );
    }

    #[test]
    fn row_get_past_end_is_blank() {
        let row = Row::default();
        assert_eq!(row.get(3), &Value::Blank);
    }
}
