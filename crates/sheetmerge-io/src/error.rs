use std::io;
use std::path::PathBuf;

use sheetmerge_model::{SheetResolveError, TableError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetStoreError {
    #[error("file not found: {}", .path.display())]
    FileNotFound { path: PathBuf },
    #[error("failed to open workbook {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },
    #[error("failed to read sheet '{sheet}' from {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        sheet: String,
        #[source]
        source: calamine::Error,
    },
    #[error("{}: {source}", .path.display())]
    Resolve {
        path: PathBuf,
        #[source]
        source: SheetResolveError,
    },
    #[error("sheet '{sheet}' in {} has an unusable layout: {source}", .path.display())]
    Layout {
        path: PathBuf,
        sheet: String,
        #[source]
        source: TableError,
    },
    #[error("failed to build `.xlsx` output: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
