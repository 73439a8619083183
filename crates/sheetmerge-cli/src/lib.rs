//! Library half of the `sheetmerge` binary.
//!
//! The CLI loads one sheet from each workbook, merges a column across by
//! normalized key, and writes the result as `.xlsx`. Exposed as a library so the
//! argument surface can be exercised in tests without spawning a process.

mod cli;

pub use cli::{run, run_with_args, Args};
