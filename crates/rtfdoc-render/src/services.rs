//! Collaborators the renderer calls out to.
//!
//! Translation, code highlighting and diagram rasterization are traits so
//! callers can plug in real implementations and tests can record calls.
//! [`Services::default`] wires English titles, the plain highlighter for
//! common languages, and the command-line diagram tools.

use std::collections::HashMap;
use std::fmt::Write;
use std::sync::Arc;

use crate::diagram::{CommandRasterizer, DiagramCounters, DiagramRasterizer};
use crate::escape::{push_escaped, strip_path};

/// Fixed strings the renderer asks the translation layer for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TranslationKey {
    SeeAlso,
    Returns,
    Author,
    Authors,
    Version,
    Since,
    Date,
    Note,
    Warning,
    Precondition,
    Postcondition,
    Copyright,
    Invariant,
    Remarks,
    Attention,
    Parameters,
    ReturnValues,
    Exceptions,
    TemplateParameters,
}

/// Localized titles.
pub trait Translator: Send + Sync {
    /// Title for `key`. Never empty.
    fn translate(&self, key: TranslationKey) -> &str;
}

/// English titles.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnglishTranslator;

impl Translator for EnglishTranslator {
    fn translate(&self, key: TranslationKey) -> &str {
        match key {
            TranslationKey::SeeAlso => "See also",
            TranslationKey::Returns => "Returns",
            TranslationKey::Author => "Author",
            TranslationKey::Authors => "Authors",
            TranslationKey::Version => "Version",
            TranslationKey::Since => "Since",
            TranslationKey::Date => "Date",
            TranslationKey::Note => "Note",
            TranslationKey::Warning => "Warning",
            TranslationKey::Precondition => "Precondition",
            TranslationKey::Postcondition => "Postcondition",
            TranslationKey::Copyright => "Copyright",
            TranslationKey::Invariant => "Invariant",
            TranslationKey::Remarks => "Remarks",
            TranslationKey::Attention => "Attention",
            TranslationKey::Parameters => "Parameters",
            TranslationKey::ReturnValues => "Return values",
            TranslationKey::Exceptions => "Exceptions",
            TranslationKey::TemplateParameters => "Template Parameters",
        }
    }
}

/// Source code handed to a highlighter.
#[derive(Clone, Copy, Debug)]
pub struct CodeFragment<'a> {
    /// Language id, without a leading dot.
    pub language: &'a str,
    pub text: &'a str,
    /// Scope the code belongs to, for resolving identifiers.
    pub context: &'a str,
    pub is_example: bool,
    pub example_file: &'a str,
    /// Included file the code comes from, if any.
    pub file: Option<&'a str>,
    /// First line number to print, `None` to print no line numbers.
    pub line_numbers: Option<usize>,
}

impl<'a> CodeFragment<'a> {
    /// Fragment of `text` in `language` with no extra metadata.
    #[must_use]
    pub fn new(language: &'a str, text: &'a str) -> Self {
        Self {
            language,
            text,
            context: "",
            is_example: false,
            example_file: "",
            file: None,
            line_numbers: None,
        }
    }
}

/// Writes highlighted RTF for a code fragment into the render output.
pub trait CodeHighlighter: Send + Sync {
    fn highlight(&self, out: &mut String, fragment: &CodeFragment<'_>);
}

/// Highlighter that escapes code without colouring it.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainHighlighter;

impl CodeHighlighter for PlainHighlighter {
    fn highlight(&self, out: &mut String, fragment: &CodeFragment<'_>) {
        let Some(first) = fragment.line_numbers else {
            push_escaped(out, fragment.text, true);
            return;
        };
        for (offset, line) in fragment.text.lines().enumerate() {
            write!(out, "{:>5} ", first + offset).unwrap();
            push_escaped(out, line, false);
            out.push_str("\\par\n");
        }
    }
}

/// Languages the default registry serves with [`PlainHighlighter`].
const PLAIN_LANGUAGES: &[&str] = &[
    "c", "cc", "cpp", "cxx", "h", "hh", "hpp", "hxx", "ixx", "cppm", "idl", "odl", "java", "cs",
    "d", "php", "inc", "m", "mm", "js", "ts", "py", "pyw", "f", "for", "f90", "f95", "f03",
    "vhd", "vhdl", "ucf", "qsf", "xml", "xsd", "sql", "tcl", "md", "markdown", "ice", "rs",
    "rust", "txt", "doc", "dox", "sh", "cmake",
];

/// Highlighters keyed by language id or file extension.
pub struct Highlighters {
    by_language: HashMap<String, Arc<dyn CodeHighlighter>>,
}

impl Default for Highlighters {
    fn default() -> Self {
        let plain: Arc<dyn CodeHighlighter> = Arc::new(PlainHighlighter);
        let mut registry = Self::empty();
        for language in PLAIN_LANGUAGES {
            registry.register(language, Arc::clone(&plain));
        }
        registry
    }
}

impl Highlighters {
    /// Registry with no languages.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            by_language: HashMap::new(),
        }
    }

    /// Serve `language` (id or extension, with or without a dot) with `highlighter`.
    pub fn register(&mut self, language: &str, highlighter: Arc<dyn CodeHighlighter>) {
        self.by_language
            .insert(normalize_language(language), highlighter);
    }

    /// Highlighter for `language`.
    #[must_use]
    pub fn get(&self, language: &str) -> Option<&dyn CodeHighlighter> {
        self.by_language
            .get(&normalize_language(language))
            .map(Arc::as_ref)
    }
}

fn normalize_language(language: &str) -> String {
    language.trim_start_matches('.').to_ascii_lowercase()
}

/// Language id for an included file: its extension, or `fallback`.
#[must_use]
pub fn language_of_file<'a>(file: &'a str, fallback: &'a str) -> &'a str {
    let name = strip_path(file);
    match name.rfind('.') {
        Some(pos) if pos + 1 < name.len() => &name[pos + 1..],
        _ => fallback,
    }
}

/// Lines strictly between the lines holding the first two `marker`s.
///
/// The block is empty unless `marker` occurs at least twice.
#[must_use]
pub fn extract_block<'a>(text: &'a str, marker: &str) -> &'a str {
    if marker.is_empty() {
        return "";
    }
    let Some(first) = text.find(marker) else {
        return "";
    };
    let start = text[first..]
        .find('\n')
        .map_or(text.len(), |nl| first + nl + 1);
    let Some(second) = text[start..].find(marker) else {
        return "";
    };
    let second = start + second;
    let end = text[..second].rfind('\n').map_or(start, |nl| (nl + 1).max(start));
    &text[start..end]
}

/// 1-based line number of the first `marker` in `text`, 1 if absent.
#[must_use]
pub fn line_block(text: &str, marker: &str) -> usize {
    if marker.is_empty() {
        return 1;
    }
    text.find(marker)
        .map_or(1, |pos| text[..pos].matches('\n').count() + 1)
}

/// Everything the renderer calls out to.
pub struct Services {
    pub translator: Box<dyn Translator>,
    pub highlighters: Highlighters,
    pub rasterizer: Box<dyn DiagramRasterizer>,
    /// Diagram file counters, shared by every render writing to one output directory.
    pub counters: Arc<DiagramCounters>,
}

impl Default for Services {
    fn default() -> Self {
        Self {
            translator: Box::new(EnglishTranslator),
            highlighters: Highlighters::default(),
            rasterizer: Box::new(CommandRasterizer::default()),
            counters: Arc::new(DiagramCounters::default()),
        }
    }
}

impl Services {
    #[must_use]
    pub fn with_translator(mut self, translator: impl Translator + 'static) -> Self {
        self.translator = Box::new(translator);
        self
    }

    #[must_use]
    pub fn with_rasterizer(mut self, rasterizer: impl DiagramRasterizer + 'static) -> Self {
        self.rasterizer = Box::new(rasterizer);
        self
    }

    #[must_use]
    pub fn with_highlighter(
        mut self,
        language: &str,
        highlighter: impl CodeHighlighter + 'static,
    ) -> Self {
        self.highlighters.register(language, Arc::new(highlighter));
        self
    }

    /// Share diagram counters with other renders.
    #[must_use]
    pub fn with_counters(mut self, counters: Arc<DiagramCounters>) -> Self {
        self.counters = counters;
        self
    }
}
