use serde::{Deserialize, Serialize};
use sheetmerge_model::{ResolvedSheet, SheetSelector, Table};

use crate::MergeError;

/// Which sheets end up in the output workbook.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// Only the merged sheet.
    #[default]
    SingleSheet,
    /// Every destination sheet, with the selected one replaced by the merged sheet.
    AllSheets,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OutputSheet {
    pub name: String,
    pub table: Table,
}

/// Sheets to write, in output order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OutputWorkbook {
    sheets: Vec<OutputSheet>,
}

impl OutputWorkbook {
    /// Workbook holding only the merged sheet.
    ///
    /// A sheet selected by name keeps its name; a sheet selected by index is
    /// written as [`sheetmerge_model::DEFAULT_SHEET_NAME`].
    pub fn single(selector: &SheetSelector, resolved: &ResolvedSheet, merged: Table) -> Self {
        Self {
            sheets: vec![OutputSheet {
                name: selector.output_name(resolved).to_string(),
                table: merged,
            }],
        }
    }

    /// Every sheet of the destination workbook in original order, with the sheet
    /// at `resolved.index` replaced by `merged`. Other sheets pass through untouched.
    pub fn all_sheets(
        sheets: Vec<(String, Table)>,
        resolved: &ResolvedSheet,
        merged: Table,
    ) -> Result<Self, MergeError> {
        if resolved.index >= sheets.len() {
            return Err(MergeError::SheetNotInWorkbook {
                index: resolved.index,
                name: resolved.name.clone(),
            });
        }

        let mut merged = Some(merged);
        let sheets = sheets
            .into_iter()
            .enumerate()
            .map(|(idx, (name, table))| {
                let table = if idx == resolved.index {
                    merged.take().unwrap_or(table)
                } else {
                    table
                };
                OutputSheet { name, table }
            })
            .collect();

        Ok(Self { sheets })
    }

    pub fn sheets(&self) -> &[OutputSheet] {
        &self.sheets
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(|s| s.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}
