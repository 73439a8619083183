use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// What a required column is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    SourceKey,
    SourceValue,
    DestinationKey,
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ColumnRole::SourceKey => "source key",
            ColumnRole::SourceValue => "source value",
            ColumnRole::DestinationKey => "destination key",
        })
    }
}

/// Which of the two input tables a column was expected in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableSide {
    Source,
    Destination,
}

impl fmt::Display for TableSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TableSide::Source => "source",
            TableSide::Destination => "destination",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    #[error("column '{column}' ({role}) not found in the {side} sheet")]
    ColumnNotFound {
        column: String,
        role: ColumnRole,
        side: TableSide,
    },
    #[error("sheet #{index} ('{name}') is not part of the destination workbook")]
    SheetNotInWorkbook { index: usize, name: String },
}
