use std::path::Path;

use chrono::{NaiveDateTime, Timelike};
use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook, Worksheet, XlsxError};
use sheetmerge_core::{OutputSheet, OutputWorkbook};
use sheetmerge_model::Value;

use crate::atomic::atomic_write_bytes;
use crate::SheetStoreError;

struct Formats {
    header: Format,
    date: Format,
    datetime: Format,
}

impl Formats {
    fn new() -> Self {
        Self {
            header: Format::new().set_bold(),
            date: Format::new().set_num_format("yyyy-mm-dd"),
            datetime: Format::new().set_num_format("yyyy-mm-dd hh:mm:ss"),
        }
    }
}

/// Write `output` to `path` as an `.xlsx` workbook.
///
/// The output is always `.xlsx`, whatever the extension of `path`. Each sheet is
/// written as a bold header row followed by the data rows; blank cells are left
/// empty. Parent directories are created and the file is replaced atomically.
pub fn write_workbook(path: impl AsRef<Path>, output: &OutputWorkbook) -> Result<(), SheetStoreError> {
    let path = path.as_ref();
    let is_xlsx = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"));
    if !is_xlsx {
        log::warn!(
            "output path {} does not end in `.xlsx`; writing `.xlsx` content anyway",
            path.display()
        );
    }

    let bytes = render_workbook(output)?;
    atomic_write_bytes(path, &bytes).map_err(|source| SheetStoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    log::info!(
        "wrote {} sheet(s) to {}",
        output.len(),
        path.display()
    );
    Ok(())
}

/// Serialize `output` to `.xlsx` bytes.
pub fn render_workbook(output: &OutputWorkbook) -> Result<Vec<u8>, SheetStoreError> {
    let formats = Formats::new();
    let mut workbook = Workbook::new();

    for sheet in output.sheets() {
        let worksheet = workbook.add_worksheet();
        write_sheet(worksheet, sheet, &formats)?;
    }

    Ok(workbook.save_to_buffer()?)
}

fn write_sheet(
    worksheet: &mut Worksheet,
    sheet: &OutputSheet,
    formats: &Formats,
) -> Result<(), XlsxError> {
    worksheet.set_name(&sheet.name)?;

    for (col, name) in sheet.table.columns().iter().enumerate() {
        worksheet.write_string_with_format(0, col_num(col)?, name, &formats.header)?;
    }

    for (idx, row) in sheet.table.rows().iter().enumerate() {
        let row_num = row_num(idx + 1)?;
        for (col, value) in row.cells().iter().enumerate() {
            write_value(worksheet, row_num, col_num(col)?, value, formats)?;
        }
    }

    Ok(())
}

fn write_value(
    worksheet: &mut Worksheet,
    row: RowNum,
    col: ColNum,
    value: &Value,
    formats: &Formats,
) -> Result<(), XlsxError> {
    match value {
        Value::Blank => {}
        Value::String(s) => {
            worksheet.write_string(row, col, s)?;
        }
        Value::Number(n) => {
            worksheet.write_number(row, col, *n)?;
        }
        Value::Boolean(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        Value::DateTime(dt) => {
            let format = if is_midnight(dt) {
                &formats.date
            } else {
                &formats.datetime
            };
            worksheet.write_datetime_with_format(row, col, dt, format)?;
        }
    }
    Ok(())
}

fn is_midnight(dt: &NaiveDateTime) -> bool {
    dt.num_seconds_from_midnight() == 0 && dt.nanosecond() == 0
}

fn row_num(idx: usize) -> Result<RowNum, XlsxError> {
    RowNum::try_from(idx).map_err(|_| XlsxError::RowColumnLimitError)
}

fn col_num(idx: usize) -> Result<ColNum, XlsxError> {
    ColNum::try_from(idx).map_err(|_| XlsxError::RowColumnLimitError)
}
