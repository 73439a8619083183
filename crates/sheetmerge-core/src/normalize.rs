use std::fmt;

use sheetmerge_model::Value;

/// Canonical comparison key derived from a cell value.
///
/// Two values are "the same key" iff their normalized keys are equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedKey(String);

impl NormalizedKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Render `value` to text, trim surrounding whitespace and case-fold it.
///
/// Folding uses the full Unicode default case folding (`ß` folds to `ss`,
/// final sigma to `σ`), never the process locale. Blank cells normalize to the
/// empty key, so all blank keys collide.
pub fn normalize_key(value: &Value) -> NormalizedKey {
    let text = value.to_string();
    let trimmed = text.trim();
    if trimmed.is_ascii() {
        NormalizedKey(trimmed.to_ascii_lowercase())
    } else {
        NormalizedKey(caseless::default_case_fold_str(trimmed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(value: impl Into<Value>) -> String {
        normalize_key(&value.into()).as_str().to_string()
    }

    #[test]
    fn trims_and_lowercases() {
        assert_eq!(key("  Alice "), "alice");
        assert_eq!(key("\tBOB\n"), "bob");
        assert_eq!(key("ÉCOLE"), "école");
    }

    #[test]
    fn folding_matches_keys_lowercasing_would_miss() {
        assert_eq!(key("STRASSE"), key("straße"));
        assert_eq!(key("ΟΔΟΣ"), key("οδος"));
        assert_eq!(key("ΟΔΟΣ"), key("οδοσ"));
    }

    #[test]
    fn numbers_key_like_their_text() {
        assert_eq!(key(10.0), "10");
        assert_eq!(normalize_key(&Value::Number(10.0)), normalize_key(&Value::from(" 10 ")));
    }

    #[test]
    fn blank_keys_are_empty() {
        assert!(normalize_key(&Value::Blank).is_empty());
        assert_eq!(normalize_key(&Value::Blank), normalize_key(&Value::from("   ")));
    }

    #[test]
    fn booleans_fold_to_lowercase_text() {
        assert_eq!(key(true), "true");
        assert_eq!(normalize_key(&Value::Boolean(true)), normalize_key(&Value::from("True")));
    }
}
