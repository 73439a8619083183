//! Workbook storage for sheetmerge.
//!
//! Reading goes through `calamine` so any common workbook format can be used as
//! input; output is always `.xlsx`, produced with `rust_xlsxwriter` and written
//! atomically.

mod atomic;
mod error;
mod reader;
mod writer;

pub use error::SheetStoreError;
pub use reader::SheetStore;
pub use writer::{render_workbook, write_workbook};
