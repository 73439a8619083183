//! `sheetmerge-model` defines the in-memory shapes shared by the merge engine,
//! the workbook store and the CLI: cell [`Value`]s, [`Table`]s of named columns,
//! and [`SheetSelector`]s.

mod header;
mod sheet;
mod table;
mod value;

pub use header::header_names;
pub use sheet::{
    sheet_name_eq_case_insensitive, ResolvedSheet, SheetResolveError, SheetSelector,
    DEFAULT_SHEET_NAME,
};
pub use table::{Row, Table, TableError};
pub use value::Value;
