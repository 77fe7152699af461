//! Default style table.

use std::collections::HashMap;
use std::fmt;

use crate::StyleError;

/// Number of indent levels with their own indexed styles.
pub const MAX_INDENT_LEVELS: usize = 10;

/// Usable page width in twips, the basis for table column stops.
pub const PAGE_WIDTH: usize = 8748;

/// Resets paragraph and character formatting before a style is applied.
pub const STYLE_RESET: &str = "\\pard\\plain ";

/// Indent step per level, in twips.
const INDENT_STEP: usize = 360;

/// Closed set of style names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StyleName {
    Heading1,
    Heading2,
    Heading3,
    Heading4,
    Heading5,
    Title,
    SubTitle,
    BodyText,
    DenseText,
    Header,
    Footer,
    GroupHeader,
    CodeExample,
    ListContinue,
    DescContinue,
    LatexToc,
    ListBullet,
    ListEnum,
}

impl StyleName {
    /// All names, in stylesheet order.
    pub const ALL: [StyleName; 18] = [
        Self::Heading1,
        Self::Heading2,
        Self::Heading3,
        Self::Heading4,
        Self::Heading5,
        Self::Title,
        Self::SubTitle,
        Self::BodyText,
        Self::DenseText,
        Self::Header,
        Self::Footer,
        Self::GroupHeader,
        Self::CodeExample,
        Self::ListContinue,
        Self::DescContinue,
        Self::LatexToc,
        Self::ListBullet,
        Self::ListEnum,
    ];

    /// Name as used in stylesheet files.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Heading1 => "Heading1",
            Self::Heading2 => "Heading2",
            Self::Heading3 => "Heading3",
            Self::Heading4 => "Heading4",
            Self::Heading5 => "Heading5",
            Self::Title => "Title",
            Self::SubTitle => "SubTitle",
            Self::BodyText => "BodyText",
            Self::DenseText => "DenseText",
            Self::Header => "Header",
            Self::Footer => "Footer",
            Self::GroupHeader => "GroupHeader",
            Self::CodeExample => "CodeExample",
            Self::ListContinue => "ListContinue",
            Self::DescContinue => "DescContinue",
            Self::LatexToc => "LatexTOC",
            Self::ListBullet => "ListBullet",
            Self::ListEnum => "ListEnum",
        }
    }

    /// Heading style for a heading level, clamped to `1..=5`.
    #[must_use]
    pub fn heading(level: usize) -> Self {
        match level {
            0 | 1 => Self::Heading1,
            2 => Self::Heading2,
            3 => Self::Heading3,
            4 => Self::Heading4,
            _ => Self::Heading5,
        }
    }

    /// Whether the style has one entry per indent level.
    #[must_use]
    pub fn is_indexed(self) -> bool {
        matches!(
            self,
            Self::CodeExample
                | Self::ListContinue
                | Self::DescContinue
                | Self::LatexToc
                | Self::ListBullet
                | Self::ListEnum
        )
    }

    /// Table key for this style at `level`, e.g. `CodeExample3`.
    ///
    /// Level-independent styles ignore `level`.
    #[must_use]
    pub fn key(self, level: usize) -> String {
        if self.is_indexed() {
            format!("{}{level}", self.as_str())
        } else {
            self.as_str().to_owned()
        }
    }
}

impl fmt::Display for StyleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One style: how to apply it and how to declare it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleData {
    /// Stylesheet slot, the number in the `\sN` clause.
    pub index: u32,
    /// Control words applied in the body, starting with `\sN`.
    pub reference: String,
    /// Declaration tail for the stylesheet group (`\sbasedon`, `\snext`, name).
    pub definition: String,
}

impl StyleData {
    fn new(index: u32, reference: String, definition: String) -> Self {
        Self {
            index,
            reference,
            definition,
        }
    }
}

/// Lookup table from style key to [`StyleData`].
#[derive(Clone, Debug)]
pub struct StyleTable {
    entries: Vec<(String, StyleData)>,
    positions: HashMap<String, usize>,
}

impl Default for StyleTable {
    fn default() -> Self {
        Self::rtf_defaults()
    }
}

impl StyleTable {
    /// Built-in styles for every name and indent level.
    #[must_use]
    pub fn rtf_defaults() -> Self {
        let mut table = Self {
            entries: Vec::new(),
            positions: HashMap::new(),
        };
        for name in StyleName::ALL {
            if name.is_indexed() {
                for level in 0..MAX_INDENT_LEVELS {
                    table.insert(name.key(level), default_indexed(name, level));
                }
            } else {
                table.insert(name.key(0), default_plain(name));
            }
        }
        table
    }

    fn insert(&mut self, key: String, data: StyleData) {
        if let Some(&pos) = self.positions.get(&key) {
            self.entries[pos].1 = data;
        } else {
            self.positions.insert(key.clone(), self.entries.len());
            self.entries.push((key, data));
        }
    }

    /// Style by table key (`Heading1`, `ListEnum4`, ...).
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&StyleData> {
        self.positions.get(key).map(|&pos| &self.entries[pos].1)
    }

    pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut StyleData> {
        self.positions
            .get(key)
            .copied()
            .map(move |pos| &mut self.entries[pos].1)
    }

    /// Style reference for `name` at indent `level`.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::Missing`] if the table has no such entry.
    pub fn reference(&self, name: StyleName, level: usize) -> Result<&str, StyleError> {
        self.get(&name.key(level))
            .map(|data| data.reference.as_str())
            .ok_or(StyleError::Missing { name, level })
    }

    /// All entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleData)> {
        self.entries.iter().map(|(key, data)| (key.as_str(), data))
    }
}

fn default_plain(name: StyleName) -> StyleData {
    let (index, reference, label) = match name {
        StyleName::Heading1 => (
            1,
            "\\s1\\sb240\\sa60\\keepn\\widctlpar\\adjustright \\b\\f1\\fs36\\kerning36\\cgrid ",
            "heading 1",
        ),
        StyleName::Heading2 => (
            2,
            "\\s2\\sb240\\sa60\\keepn\\widctlpar\\adjustright \\b\\f1\\fs28\\kerning28\\cgrid ",
            "heading 2",
        ),
        StyleName::Heading3 => (
            3,
            "\\s3\\sb240\\sa60\\keepn\\widctlpar\\adjustright \\b\\f1\\cgrid ",
            "heading 3",
        ),
        StyleName::Heading4 => (
            4,
            "\\s4\\sb240\\sa60\\keepn\\widctlpar\\adjustright \\b\\f1\\fs20\\cgrid ",
            "heading 4",
        ),
        StyleName::Heading5 => (
            5,
            "\\s5\\sb90\\sa30\\keepn\\widctlpar\\adjustright \\b\\f1\\fs20\\cgrid ",
            "heading 5",
        ),
        StyleName::Title => (
            15,
            "\\s15\\qc\\sb240\\sa60\\widctlpar\\outlinelevel0\\adjustright \\b\\f1\\fs32\\kerning28\\cgrid ",
            "Title",
        ),
        StyleName::SubTitle => (
            16,
            "\\s16\\qc\\sa60\\widctlpar\\outlinelevel1\\adjustright \\f1\\cgrid ",
            "Subtitle",
        ),
        StyleName::BodyText => (17, "\\s17\\sa60\\sb30\\widctlpar\\qj \\fs22\\cgrid ", "BodyText"),
        StyleName::DenseText => (18, "\\s18\\widctlpar\\fs22\\cgrid ", "DenseText"),
        StyleName::Header => (
            28,
            "\\s28\\widctlpar\\tqc\\tx4320\\tqr\\tx8640\\adjustright \\fs20\\cgrid ",
            "header",
        ),
        StyleName::Footer => (
            29,
            "\\s29\\widctlpar\\tqc\\tx4320\\tqr\\tx8640\\qr\\adjustright \\fs20\\cgrid ",
            "footer",
        ),
        StyleName::GroupHeader => (
            30,
            "\\s30\\li360\\sa60\\sb120\\keepn\\widctlpar\\adjustright \\b\\f1\\fs20\\cgrid ",
            "GroupHeader",
        ),
        indexed => return default_indexed(indexed, 0),
    };
    let next = if index <= 5 { 0 } else { index };
    StyleData::new(
        index,
        reference.to_owned(),
        format!("\\sbasedon0 \\snext{next} {label}"),
    )
}

fn default_indexed(name: StyleName, level: usize) -> StyleData {
    let indent = INDENT_STEP * level;
    let hanging = INDENT_STEP * (level + 1);
    let (base, reference, label, autoupdate) = match name {
        StyleName::CodeExample => (
            40,
            format!(
                "\\li{indent}\\widctlpar\\adjustright \\shading1000\\cbpat8 \\f2\\fs16\\cgrid "
            ),
            "Code Example",
            false,
        ),
        StyleName::ListContinue => (
            50,
            format!("\\li{indent}\\sa60\\sb30\\qj\\widctlpar\\qj\\adjustright \\fs20\\cgrid "),
            "List Continue",
            false,
        ),
        StyleName::DescContinue => (
            60,
            format!("\\li{indent}\\widctlpar\\ql\\adjustright \\fs20\\cgrid "),
            "DescContinue",
            false,
        ),
        StyleName::LatexToc => {
            let space = 30 - 3 * level;
            (
                70,
                format!(
                    "\\li{indent}\\sa{space}\\sb{space}\\widctlpar\\tqr\\tldot\\tx8640\\adjustright \\fs20\\cgrid "
                ),
                "LatexTOC",
                false,
            )
        }
        StyleName::ListBullet => {
            let list = level + 1;
            (
                80,
                format!(
                    "\\fi-360\\li{hanging}\\widctlpar\\jclisttab\\tx{hanging}{{\\*\\pn \\pnlvlbody\\ilvl0\\ls{list}\\pnrnot0\\pndec }}\\ls{list}\\adjustright \\fs20\\cgrid "
                ),
                "List Bullet",
                true,
            )
        }
        StyleName::ListEnum => (
            90,
            format!("\\fi-360\\li{hanging}\\widctlpar\\fs20\\cgrid "),
            "List Enum",
            true,
        ),
        plain => return default_plain(plain),
    };
    // Levels stay below 10, so the slot never leaves its decade.
    let index = base + u32::try_from(level).unwrap_or(0);
    let next = base + u32::try_from((level + 1).min(MAX_INDENT_LEVELS - 1)).unwrap_or(0);
    let autoupdate = if autoupdate { "\\sautoupd " } else { "" };
    StyleData::new(
        index,
        format!("\\s{index}{reference}"),
        format!("\\sbasedon0 \\snext{next} {autoupdate}{label} {level}"),
    )
}
