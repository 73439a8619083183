use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name used when a sheet selected by index has to be written under a fresh name.
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// How a caller picks a sheet out of a workbook.
///
/// Parsed from user input: a string made only of ASCII digits is an index,
/// anything else is a name. An index still resolves to a sheet whose name is
/// exactly those digits when the workbook has one (sheets named `2024`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SheetSelector {
    ByName(String),
    ByIndex(usize),
}

impl Default for SheetSelector {
    fn default() -> Self {
        SheetSelector::ByIndex(0)
    }
}

impl FromStr for SheetSelector {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        if digits {
            if let Ok(index) = s.parse::<usize>() {
                return Ok(SheetSelector::ByIndex(index));
            }
        }
        Ok(SheetSelector::ByName(s.to_string()))
    }
}

impl From<usize> for SheetSelector {
    fn from(value: usize) -> Self {
        SheetSelector::ByIndex(value)
    }
}

impl From<&str> for SheetSelector {
    fn from(value: &str) -> Self {
        SheetSelector::ByName(value.to_string())
    }
}

impl fmt::Display for SheetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetSelector::ByName(name) => write!(f, "'{name}'"),
            SheetSelector::ByIndex(index) => write!(f, "#{index}"),
        }
    }
}

/// A selector resolved against a concrete workbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedSheet {
    /// 0-based position in workbook order.
    pub index: usize,
    /// Actual sheet name as stored in the workbook.
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SheetResolveError {
    #[error("sheet '{name}' not found (available: {})", list_names(.available))]
    NotFound { name: String, available: Vec<String> },
    #[error("sheet index {index} is out of range (workbook has {count} sheets)")]
    IndexOutOfRange { index: usize, count: usize },
}

fn list_names(names: &[String]) -> String {
    if names.is_empty() {
        "(none)".to_string()
    } else {
        names.join(", ")
    }
}

impl SheetSelector {
    /// Resolve against the workbook's sheet names (in workbook order).
    ///
    /// Names are matched exactly first, then case-insensitively like Excel does.
    pub fn resolve<S: AsRef<str>>(&self, names: &[S]) -> Result<ResolvedSheet, SheetResolveError> {
        match self {
            SheetSelector::ByIndex(index) => {
                // A sheet literally named like the digits wins over the position.
                let digits = index.to_string();
                if let Some(found) = names.iter().position(|n| n.as_ref() == digits) {
                    return Ok(ResolvedSheet {
                        index: found,
                        name: digits,
                    });
                }
                match names.get(*index) {
                    Some(name) => Ok(ResolvedSheet {
                        index: *index,
                        name: name.as_ref().to_string(),
                    }),
                    None => Err(SheetResolveError::IndexOutOfRange {
                        index: *index,
                        count: names.len(),
                    }),
                }
            }
            SheetSelector::ByName(wanted) => {
                let found = names
                    .iter()
                    .position(|n| n.as_ref() == wanted)
                    .or_else(|| {
                        names
                            .iter()
                            .position(|n| sheet_name_eq_case_insensitive(n.as_ref(), wanted))
                    });
                match found {
                    Some(index) => Ok(ResolvedSheet {
                        index,
                        name: names[index].as_ref().to_string(),
                    }),
                    None => Err(SheetResolveError::NotFound {
                        name: wanted.clone(),
                        available: names.iter().map(|n| n.as_ref().to_string()).collect(),
                    }),
                }
            }
        }
    }

    /// Sheet name to use when only the merged sheet is written out.
    ///
    /// A sheet picked by name keeps its workbook name; a sheet picked by
    /// position gets [`DEFAULT_SHEET_NAME`].
    pub fn output_name<'a>(&self, resolved: &'a ResolvedSheet) -> &'a str {
        match self {
            SheetSelector::ByName(_) => &resolved.name,
            SheetSelector::ByIndex(index) if resolved.name == index.to_string() => &resolved.name,
            SheetSelector::ByIndex(_) => DEFAULT_SHEET_NAME,
        }
    }
}

/// Compare sheet names case-insensitively (Unicode-aware, ASCII fast path).
pub fn sheet_name_eq_case_insensitive(a: &str, b: &str) -> bool {
    if a.is_ascii() && b.is_ascii() {
        return a.eq_ignore_ascii_case(b);
    }
    a.chars()
        .flat_map(|c| c.to_uppercase())
        .eq(b.chars().flat_map(|c| c.to_uppercase()))
}
