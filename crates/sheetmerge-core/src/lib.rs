//! Key-based column merge between two tables (a VLOOKUP over whole sheets).
//!
//! For every destination row the engine normalizes the key cell, looks it up
//! in an index built from the source table, and writes the found value into
//! the destination's target column according to a [`FillPolicy`].
//!
//! Behaviour worth knowing about:
//! - With [`FillPolicy::Overwrite`] (the default) destination rows without a
//!   match have their target cell cleared, even if it was populated before.
//! - Keys are compared after trimming and Unicode case folding. All blank keys
//!   normalize to the empty key, so blank-keyed source rows collapse into one
//!   index entry and blank-keyed destination rows match it.

mod error;
mod index;
mod merge;
mod normalize;
mod output;

pub use error::{ColumnRole, MergeError, TableSide};
pub use index::LookupIndex;
pub use merge::{merge, FillPolicy, MatchStats, MergeResult, MergeSpec};
pub use normalize::{normalize_key, NormalizedKey};
pub use output::{OutputMode, OutputSheet, OutputWorkbook};
