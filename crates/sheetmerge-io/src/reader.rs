use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use sheetmerge_model::{header_names, ResolvedSheet, SheetSelector, Table, Value};

use crate::SheetStoreError;

/// An open workbook on disk.
///
/// The format (`.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods`) is detected from the
/// file. The underlying reader is released when the store is dropped.
pub struct SheetStore {
    path: PathBuf,
    workbook: Sheets<BufReader<File>>,
    sheet_names: Vec<String>,
}

impl std::fmt::Debug for SheetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetStore")
            .field("path", &self.path)
            .field("sheet_names", &self.sheet_names)
            .finish_non_exhaustive()
    }
}

impl SheetStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SheetStoreError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(SheetStoreError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let workbook = open_workbook_auto(path).map_err(|source| SheetStoreError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let sheet_names = workbook.sheet_names();
        log::debug!(
            "opened {} ({} sheets: {})",
            path.display(),
            sheet_names.len(),
            sheet_names.join(", ")
        );

        Ok(Self {
            path: path.to_path_buf(),
            workbook,
            sheet_names,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sheet names in workbook order.
    pub fn sheet_names(&self) -> &[String] {
        &self.sheet_names
    }

    pub fn resolve(&self, selector: &SheetSelector) -> Result<ResolvedSheet, SheetStoreError> {
        let resolved =
            selector
                .resolve(&self.sheet_names)
                .map_err(|source| SheetStoreError::Resolve {
                    path: self.path.clone(),
                    source,
                })?;
        log::debug!(
            "resolved sheet selector {selector} to '{}' (#{}) in {}",
            resolved.name,
            resolved.index,
            self.path.display()
        );
        Ok(resolved)
    }

    /// Load one sheet as a table.
    ///
    /// The first row of the sheet's used range is the header; the remaining rows
    /// are data. An empty sheet yields a table with no columns and no rows.
    pub fn read_table(&mut self, sheet: &ResolvedSheet) -> Result<Table, SheetStoreError> {
        let range = self
            .workbook
            .worksheet_range(&sheet.name)
            .map_err(|source| SheetStoreError::Read {
                path: self.path.clone(),
                sheet: sheet.name.clone(),
                source,
            })?;

        let layout_err = |source| SheetStoreError::Layout {
            path: self.path.clone(),
            sheet: sheet.name.clone(),
            source,
        };

        let mut rows = range.rows();
        let Some(header) = rows.next() else {
            log::warn!(
                "sheet '{}' in {} is empty",
                sheet.name,
                self.path.display()
            );
            return Ok(Table::default());
        };

        let header: Vec<Value> = header.iter().map(convert_cell).collect();
        let mut table = Table::new(header_names(&header)).map_err(layout_err)?;
        for row in rows {
            table
                .push_row(row.iter().map(convert_cell))
                .map_err(layout_err)?;
        }

        log::debug!(
            "read sheet '{}' from {}: {} columns, {} rows",
            sheet.name,
            self.path.display(),
            table.columns().len(),
            table.row_count()
        );
        Ok(table)
    }

    /// Load every sheet, in workbook order.
    pub fn read_all(&mut self) -> Result<Vec<(String, Table)>, SheetStoreError> {
        let names = self.sheet_names.clone();
        let mut out = Vec::with_capacity(names.len());
        for (index, name) in names.into_iter().enumerate() {
            let table = self.read_table(&ResolvedSheet {
                index,
                name: name.clone(),
            })?;
            out.push((name, table));
        }
        Ok(out)
    }
}

fn convert_cell(value: &Data) -> Value {
    match value {
        Data::Empty => Value::Blank,
        Data::String(v) if v.is_empty() => Value::Blank,
        Data::String(v) => Value::String(v.clone()),
        Data::Int(v) => Value::Number(*v as f64),
        Data::Float(v) => Value::Number(*v),
        Data::Bool(v) => Value::Boolean(*v),
        // Durations and Excel's phantom 1900-02-29 (serial 60) have no calendar
        // date; they keep their raw serial.
        Data::DateTime(v) if v.is_duration() || is_phantom_leap_day(v.as_f64()) => {
            Value::Number(v.as_f64())
        }
        Data::DateTime(v) => v
            .as_datetime()
            .map(Value::DateTime)
            .unwrap_or(Value::Number(v.as_f64())),
        Data::DateTimeIso(v) => Value::String(v.clone()),
        Data::DurationIso(v) => Value::String(v.clone()),
        Data::Error(e) => Value::String(e.to_string()),
    }
}

fn is_phantom_leap_day(serial: f64) -> bool {
    (60.0..61.0).contains(&serial)
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{ExcelDateTime, ExcelDateTimeType};
    use chrono::NaiveDate;

    fn excel_date(serial: f64, kind: ExcelDateTimeType) -> Data {
        Data::DateTime(ExcelDateTime::new(serial, kind, false))
    }

    #[test]
    fn empty_strings_load_as_blank() {
        assert_eq!(convert_cell(&Data::String(String::new())), Value::Blank);
        assert_eq!(convert_cell(&Data::Empty), Value::Blank);
    }

    #[test]
    fn integers_load_as_numbers() {
        assert_eq!(convert_cell(&Data::Int(7)), Value::Number(7.0));
        assert_eq!(convert_cell(&Data::Bool(true)), Value::Boolean(true));
    }

    #[test]
    fn error_cells_load_as_their_display_text() {
        assert_eq!(
            convert_cell(&Data::Error(calamine::CellErrorType::NA)),
            Value::from("#N/A")
        );
    }

    #[test]
    fn date_serials_load_as_calendar_datetimes() {
        let new_year = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(
            convert_cell(&excel_date(45_292.0, ExcelDateTimeType::DateTime)),
            Value::DateTime(new_year.and_hms_opt(0, 0, 0).unwrap())
        );
        assert_eq!(
            convert_cell(&excel_date(45_292.5, ExcelDateTimeType::DateTime)),
            Value::DateTime(new_year.and_hms_opt(12, 0, 0).unwrap())
        );
        assert_eq!(
            convert_cell(&excel_date(59.0, ExcelDateTimeType::DateTime)),
            Value::DateTime(NaiveDate::from_ymd_opt(1900, 2, 28).unwrap().and_hms_opt(0, 0, 0).unwrap())
        );
    }

    #[test]
    fn serials_without_a_calendar_date_keep_their_number() {
        assert_eq!(
            convert_cell(&excel_date(60.0, ExcelDateTimeType::DateTime)),
            Value::Number(60.0)
        );
        assert_eq!(
            convert_cell(&excel_date(1.5, ExcelDateTimeType::TimeDelta)),
            Value::Number(1.5)
        );
    }
}
