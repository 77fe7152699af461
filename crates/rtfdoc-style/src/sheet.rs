//! Stylesheet overrides.
//!
//! A stylesheet is a text file of `Name = value` assignments, one per line.
//! `Name` is a table key (`Heading1`, `CodeExample3`, ...). `value` holds the
//! style reference starting with its `\sN` clause, optionally followed by a
//! declaration tail starting at `\sbasedon` or `\snext`:
//!
//! ```text
//! # Bigger code
//! CodeExample0 = \s40\li0\widctlpar\f2\fs20\cgrid \sbasedon0 \snext41 Code Example 0
//! ```

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::{StyleError, StyleTable};

static ASSIGNMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]*=[ \t]*").unwrap());

static STYLE_CLAUSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\s([0-9]+)").unwrap());

static DEFINITION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\sbasedon|\\snext").unwrap());

/// Split `Key = value` lines, skipping blanks and `#` comments.
///
/// Yields `(line_number, Ok((key, value)))` for assignments and
/// `(line_number, Err(line))` for lines that are not.
pub(crate) fn assignments(content: &str) -> impl Iterator<Item = (usize, Result<(&str, &str), &str>)> {
    content
        .lines()
        .enumerate()
        .filter_map(|(idx, raw)| {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                return None;
            }
            let parsed = match ASSIGNMENT_RE.find(line) {
                Some(m) if m.start() > 0 => Ok((&line[..m.start()], &line[m.end()..])),
                _ => Err(line),
            };
            Some((idx + 1, parsed))
        })
}

impl StyleTable {
    /// Apply stylesheet overrides from `content`.
    ///
    /// `source` names the input in diagnostics. Problems with individual lines
    /// are returned as warnings and the affected styles keep their defaults.
    pub fn apply_stylesheet(&mut self, content: &str, source: &str) -> Vec<String> {
        let mut warnings = Vec::new();

        for (line_nr, parsed) in assignments(content) {
            let (key, value) = match parsed {
                Ok(pair) => pair,
                Err(_) => {
                    warnings.push(format!(
                        "{source}:{line_nr}: assignment of style sheet name expected"
                    ));
                    continue;
                }
            };

            let Some(style) = self.get_mut(key) else {
                warnings.push(format!(
                    "{source}:{line_nr}: invalid style sheet name {key} ignored"
                ));
                continue;
            };

            match parse_style(key, value) {
                Ok((index, reference, definition)) => {
                    style.index = index;
                    style.reference = reference;
                    if let Some(definition) = definition {
                        style.definition = definition;
                    }
                }
                Err(e) => warnings.push(format!("{source}:{line_nr}: {e}")),
            }
        }

        for warning in &warnings {
            tracing::warn!(warning = %warning, "Stylesheet problem");
        }
        warnings
    }

    /// Load stylesheet overrides from a file.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::Io`] if the file cannot be read. Problems inside
    /// the file are returned as warnings.
    pub fn load_stylesheet(&mut self, path: &Path) -> Result<Vec<String>, StyleError> {
        let content = std::fs::read_to_string(path).map_err(|source| StyleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "Loading RTF stylesheet");
        Ok(self.apply_stylesheet(&content, &path.display().to_string()))
    }
}

/// Split a style value into slot index, reference and optional definition.
fn parse_style(key: &str, value: &str) -> Result<(u32, String, Option<String>), StyleError> {
    let no_clause = || StyleError::NoStyleClause {
        name: key.to_owned(),
        value: value.to_owned(),
    };

    let clause = STYLE_CLAUSE_RE.captures(value).ok_or_else(no_clause)?;
    let index: u32 = clause[1].parse().map_err(|_| no_clause())?;
    if index == 0 {
        return Err(no_clause());
    }

    let start = clause.get(0).map_or(0, |m| m.start());
    let body = &value[start..];
    let (reference, definition) = match DEFINITION_RE.find(body) {
        Some(m) => (&body[..m.start()], Some(body[m.start()..].trim().to_owned())),
        None => (body, None),
    };

    Ok((index, format!("{} ", reference.trim_end()), definition))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StyleName;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_override_reference_and_definition() {
        let mut table = StyleTable::rtf_defaults();
        let warnings = table.apply_stylesheet(
            "CodeExample0 = \\s40\\li0\\f2\\fs20 \\sbasedon0 \\snext41 Code Example 0\n",
            "test.rtfs",
        );
        assert!(warnings.is_empty());
        assert_eq!(
            table.reference(StyleName::CodeExample, 0).unwrap(),
            "\\s40\\li0\\f2\\fs20 "
        );
        assert_eq!(
            table.get("CodeExample0").unwrap().definition,
            "\\sbasedon0 \\snext41 Code Example 0"
        );
    }

    #[test]
    fn test_override_without_definition_keeps_default() {
        let mut table = StyleTable::rtf_defaults();
        let before = table.get("Heading1").unwrap().definition.clone();
        table.apply_stylesheet("Heading1 = \\s1\\b\\fs48", "test.rtfs");
        let style = table.get("Heading1").unwrap();
        assert_eq!(style.reference, "\\s1\\b\\fs48 ");
        assert_eq!(style.definition, before);
    }

    #[test]
    fn test_comments_and_blank_lines_skipped() {
        let mut table = StyleTable::rtf_defaults();
        let warnings = table.apply_stylesheet("# comment\n\n   \n", "test.rtfs");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_unknown_name_warns() {
        let mut table = StyleTable::rtf_defaults();
        let warnings = table.apply_stylesheet("Heading9 = \\s9\\b", "test.rtfs");
        assert_eq!(
            warnings,
            vec!["test.rtfs:1: invalid style sheet name Heading9 ignored".to_owned()]
        );
    }

    #[test]
    fn test_missing_assignment_warns() {
        let mut table = StyleTable::rtf_defaults();
        let warnings = table.apply_stylesheet("\n= \\s1\nHeading1", "test.rtfs");
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].starts_with("test.rtfs:2:"));
        assert!(warnings[1].starts_with("test.rtfs:3:"));
    }

    #[test]
    fn test_missing_style_clause_keeps_default() {
        let mut table = StyleTable::rtf_defaults();
        let before = table.get("BodyText").unwrap().clone();
        let warnings = table.apply_stylesheet("BodyText = \\fs24", "test.rtfs");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("no \\s clause"));
        assert_eq!(table.get("BodyText").unwrap(), &before);
    }

    #[test]
    fn test_load_stylesheet_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.rtfs");
        std::fs::write(&path, "ListEnum2 = \\s92\\fi-360\\li1080\\fs24\n").unwrap();

        let mut table = StyleTable::rtf_defaults();
        let warnings = table.load_stylesheet(&path).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(
            table.reference(StyleName::ListEnum, 2).unwrap(),
            "\\s92\\fi-360\\li1080\\fs24 "
        );
    }

    #[test]
    fn test_load_stylesheet_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut table = StyleTable::rtf_defaults();
        let err = table
            .load_stylesheet(&dir.path().join("absent.rtfs"))
            .unwrap_err();
        assert!(matches!(err, StyleError::Io { .. }));
    }
}
