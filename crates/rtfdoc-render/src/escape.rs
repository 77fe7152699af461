//! RTF literal text and bookmark names.

use sha2::{Digest, Sha256};

use crate::symbol::push_rtf_char;

/// Longest bookmark name Word accepts.
const MAX_BOOKMARK_LEN: usize = 40;

/// Append `text` to `out`, escaping RTF group and control characters.
///
/// Non-ASCII characters are written as cp1252 hex escapes or `\uN?`
/// controls. With `verbatim` set, newlines become paragraph breaks so hard
/// line breaks survive inside code. Other ASCII passes through unchanged.
pub fn push_escaped(out: &mut String, text: &str, verbatim: bool) {
    for c in text.chars() {
        match c {
            '\n' if verbatim => out.push_str("\\par\n"),
            c if c.is_ascii() && !matches!(c, '{' | '}' | '\\') => out.push(c),
            c => push_rtf_char(out, c),
        }
    }
}

/// Escape `text` into a new string. See [`push_escaped`].
#[must_use]
pub fn escape_rtf(text: &str, verbatim: bool) -> String {
    let mut out = String::with_capacity(text.len());
    push_escaped(&mut out, text, verbatim);
    out
}

/// Encode a link key as an RTF bookmark name.
///
/// Lowercase ASCII letters and digits are kept (uppercase is folded), every
/// other character becomes `_`. Keys longer than the bookmark limit keep a
/// prefix and gain a hash suffix so distinct keys stay distinct.
#[must_use]
pub fn format_bookmark(key: &str) -> String {
    let name: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();

    if name.chars().count() <= MAX_BOOKMARK_LEN {
        return name;
    }

    let digest = Sha256::digest(key.as_bytes());
    format!("{}_{}", &name[..23], &hex::encode(digest)[..16])
}

/// Last path component of a file name.
#[must_use]
pub fn strip_path(file: &str) -> &str {
    file.rfind(['/', '\\']).map_or(file, |pos| &file[pos + 1..])
}

/// Link key for `anchor` inside `file`: `file_anchor`, or whichever is set.
#[must_use]
pub fn join_anchor(file: &str, anchor: &str) -> String {
    let file = strip_path(file);
    match (file.is_empty(), anchor.is_empty()) {
        (false, false) => format!("{file}_{anchor}"),
        (false, true) => file.to_owned(),
        _ => anchor.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape_reserved() {
        assert_eq!(escape_rtf("a{b}c\\d", false), "a\\{b\\}c\\\\d");
    }

    #[test]
    fn test_newline_only_breaks_when_verbatim() {
        assert_eq!(escape_rtf("a\nb", false), "a\nb");
        assert_eq!(escape_rtf("a\nb", true), "a\\par\nb");
    }

    #[test]
    fn test_plain_text_is_identity() {
        for s in ["", "Hello World", "tab\there", "x = y + 1;"] {
            assert_eq!(escape_rtf(s, false), s);
            assert_eq!(escape_rtf(s, true), s);
            assert_eq!(escape_rtf(&escape_rtf(s, false), false), s);
        }
    }

    #[test]
    fn test_non_ascii_is_escaped() {
        assert_eq!(escape_rtf("caf\u{e9}", false), "caf\\'E9");
        assert_eq!(escape_rtf("\u{20ac}5", false), "\\'805");
        assert_eq!(escape_rtf("\u{3b1}\u{3b2}", true), "\\u945?\\u946?");
        assert!(escape_rtf("na\u{ef}ve \u{3c0}", false).is_ascii());
    }

    #[test]
    fn test_bookmark_sanitizes() {
        assert_eq!(format_bookmark("classFoo_1a2B"), "classfoo_1a2b");
        assert_eq!(format_bookmark("a b-c.d"), "a_b_c_d");
        assert_eq!(format_bookmark(""), "");
    }

    #[test]
    fn test_long_bookmark_is_hashed() {
        let key = "namespacefoo_1_1bar_1_1baz_1a0123456789abcdef0123";
        let name = format_bookmark(key);
        assert_eq!(name.len(), MAX_BOOKMARK_LEN);
        assert!(name.starts_with("namespacefoo_1_1bar_1_1"));
        assert_eq!(name, format_bookmark(key));
        assert_ne!(name, format_bookmark(&format!("{key}x")));
    }

    #[test]
    fn test_join_anchor() {
        assert_eq!(join_anchor("out/group__io.rtf", "a12"), "group__io.rtf_a12");
        assert_eq!(join_anchor("index", ""), "index");
        assert_eq!(join_anchor("", "a12"), "a12");
        assert_eq!(join_anchor("dir\\page", "x"), "page_x");
    }
}
