//! Hyperlink markup.
//!
//! A link into this documentation set becomes a `HYPERLINK \l` field
//! pointing at a bookmark. Links into external sets, and all links when
//! hyperlinks are disabled, degrade to bold text. The opening and closing
//! halves are produced by separate calls and must be used in pairs with
//! the same arguments.

use crate::escape::{format_bookmark, join_anchor};

const FIELD_RESULT: &str = "}{}}{\\fldrslt {\\cs37\\ul\\cf2 ";

fn is_live(hyperlinks: bool, reference: &str) -> bool {
    hyperlinks && reference.is_empty()
}

/// Opening markup of a link to `anchor` in `file`.
#[must_use]
pub fn open_link(hyperlinks: bool, reference: &str, file: &str, anchor: &str) -> String {
    if is_live(hyperlinks, reference) {
        format!(
            "{{\\field {{\\*\\fldinst {{ HYPERLINK  \\\\l \"{}\" {FIELD_RESULT}",
            format_bookmark(&join_anchor(file, anchor))
        )
    } else {
        "{\\b ".to_owned()
    }
}

/// Closing markup matching [`open_link`].
#[must_use]
pub fn close_link(hyperlinks: bool, reference: &str) -> &'static str {
    if is_live(hyperlinks, reference) {
        "}}}"
    } else {
        "}"
    }
}

/// Opening markup of a live link to an external URL, closed by `}}}`.
#[must_use]
pub fn open_url(url: &str) -> String {
    format!("{{\\field {{\\*\\fldinst {{ HYPERLINK \"{url}\" {FIELD_RESULT}")
}

/// Bookmark start and end markers for `anchor` in `file`.
#[must_use]
pub fn bookmark(file: &str, anchor: &str) -> String {
    let name = format_bookmark(&join_anchor(file, anchor));
    format!("{{\\bkmkstart {name}}}\n{{\\bkmkend {name}}}\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_internal_link() {
        assert_eq!(
            open_link(true, "", "classFoo", "a1"),
            "{\\field {\\*\\fldinst { HYPERLINK  \\\\l \"classfoo_a1\" }{}}{\\fldrslt {\\cs37\\ul\\cf2 "
        );
        assert_eq!(close_link(true, ""), "}}}");
    }

    #[test]
    fn test_external_reference_is_bold() {
        assert_eq!(open_link(true, "qt", "qstring", "a1"), "{\\b ");
        assert_eq!(close_link(true, "qt"), "}");
    }

    #[test]
    fn test_disabled_hyperlinks_are_bold() {
        assert_eq!(open_link(false, "", "classFoo", "a1"), "{\\b ");
        assert_eq!(close_link(false, ""), "}");
    }

    #[test]
    fn test_url_field() {
        assert_eq!(
            open_url("https://example.com"),
            "{\\field {\\*\\fldinst { HYPERLINK \"https://example.com\" }{}}{\\fldrslt {\\cs37\\ul\\cf2 "
        );
    }

    #[test]
    fn test_bookmark_matches_link_target() {
        assert_eq!(
            bookmark("dir/group_io", "ga5"),
            "{\\bkmkstart group_io_ga5}\n{\\bkmkend group_io_ga5}\n"
        );
        assert!(open_link(true, "", "group_io", "ga5").contains("\"group_io_ga5\""));
    }
}
