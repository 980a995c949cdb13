//! pasteme - a line-oriented snippet expander
//!
//! Templates are plain text interleaved with command lines. Commands define
//! named snippets, paste them elsewhere, generate snippets from other
//! snippets and open nested lookup scopes.
//!
//! # Example
//!
//! ```rust
//! use pasteme::expand;
//!
//! let template = "\
//! -- snippet greeting
//! hello
//! -- endsnippet
//! -- pasteme greeting";
//!
//! assert_eq!(expand(template, "input").unwrap(), "hello");
//! ```

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod parser;
pub mod renderer;
pub mod scope;

use std::fs;
use std::path::Path;

pub use config::{ConfigError, ExpandConfig, MissingPastePolicy};
pub use diagnostics::{Diagnostics, Event, Recorder, Silent, TracingDiagnostics};
pub use error::ExpandError;
pub use parser::{Location, Snippet};
pub use scope::{ScopeId, ScopeTree};

use parser::SnippetBuilder;
use renderer::RenderContext;

/// Document name used by [`expand`] and [`expand_with_config`]
pub const INPUT_DOCUMENT: &str = "input";

/// Parses documents into one shared root scope and renders snippets from it.
///
/// Documents are parsed in the order they are given; each one is itself a
/// snippet named after its origin, registered after the snippets it defines.
///
/// ```rust
/// use pasteme::{Expander, ExpandConfig};
///
/// let mut expander = Expander::new(ExpandConfig::default());
/// expander.define("who", "world");
/// expander.parse_str("main", "hello\n-- pasteme who").unwrap();
/// assert_eq!(expander.render("main").unwrap(), "hello\nworld");
/// ```
pub struct Expander<D: Diagnostics = TracingDiagnostics> {
    config: ExpandConfig,
    scopes: ScopeTree,
    /// Text of every document handed to `parse_str`, kept for error reports
    sources: Vec<(String, String)>,
    last_document: Option<String>,
    diagnostics: D,
}

impl Expander<TracingDiagnostics> {
    /// Create an expander that forwards diagnostics to `tracing`
    pub fn new(config: ExpandConfig) -> Self {
        Self::with_diagnostics(config, TracingDiagnostics)
    }
}

impl<D: Diagnostics> Expander<D> {
    pub fn with_diagnostics(config: ExpandConfig, diagnostics: D) -> Self {
        Self {
            config,
            scopes: ScopeTree::new(),
            sources: Vec::new(),
            last_document: None,
            diagnostics,
        }
    }

    pub fn scopes(&self) -> &ScopeTree {
        &self.scopes
    }

    pub fn diagnostics(&self) -> &D {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut D {
        &mut self.diagnostics
    }

    /// Parse `text` as a document named `name` into the root scope.
    ///
    /// On error nothing the document defined stays visible and it does not
    /// become the last document.
    pub fn parse_str(&mut self, name: &str, text: &str) -> Result<(), ExpandError> {
        self.sources.push((name.to_string(), text.to_string()));
        let checkpoint = self.scopes.checkpoint();
        let root = self.scopes.root();

        let parsed = SnippetBuilder::new(&mut self.scopes, &self.config, &mut self.diagnostics)
            .parse_document(name, text, root);
        if let Err(e) = parsed {
            self.scopes.rollback(checkpoint);
            return Err(e);
        }

        self.last_document = Some(name.to_string());
        Ok(())
    }

    /// Read and parse a file; the document is named after its path
    pub fn parse_file(&mut self, path: impl AsRef<Path>) -> Result<(), ExpandError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| ExpandError::input_unavailable(path, e))?;
        self.parse_str(&path.display().to_string(), &text)
    }

    /// Register a one-line literal snippet in the root scope.
    ///
    /// The name is lowercased like every name read from a command line, so the
    /// snippet can be pasted. The text is taken verbatim.
    pub fn define(&mut self, name: &str, text: &str) {
        let name = name.to_lowercase();
        self.diagnostics
            .record(Event::SnippetDefined { name: name.clone() });
        let root = self.scopes.root();
        self.scopes.register(root, Snippet::literal(name, text));
    }

    /// Name of the most recently parsed document
    pub fn last_document(&self) -> Option<&str> {
        self.last_document.as_deref()
    }

    /// Render the first root-scope snippet named `target`
    pub fn render(&mut self, target: &str) -> Result<String, ExpandError> {
        let root = self.scopes.root();
        let scope = self.scopes.get(root);
        let snippet = scope
            .first(target)
            .ok_or_else(|| ExpandError::UnknownTopLevelSnippet {
                name: target.to_string(),
                available: distinct_names(scope.names()),
            })?;

        let mut ctx = RenderContext::new(&self.scopes, root, &self.config, &mut self.diagnostics);
        renderer::render(snippet, &mut ctx)
    }

    /// Format an error, with the offending line when it comes from a parsed
    /// document
    pub fn report(&self, err: &ExpandError) -> String {
        let document = err.location().and_then(|location| {
            self.sources
                .iter()
                .rev()
                .find(|(name, _)| *name == location.origin)
        });

        match document {
            Some((name, text)) => err.format(text, name),
            None => err.to_string(),
        }
    }
}

fn distinct_names<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut distinct: Vec<String> = Vec::new();
    for name in names {
        if !distinct.iter().any(|seen| seen == name) {
            distinct.push(name.to_string());
        }
    }
    distinct
}

/// Expand a single template with default configuration
///
/// The template is parsed as a document named [`INPUT_DOCUMENT`]; `target`
/// may name it or any snippet it defines at top level.
pub fn expand(source: &str, target: &str) -> Result<String, ExpandError> {
    expand_with_config(source, target, ExpandConfig::default())
}

/// Expand a single template with a custom configuration
///
/// # Example
///
/// ```rust
/// use pasteme::{expand_with_config, ExpandConfig, MissingPastePolicy};
///
/// let config = ExpandConfig::new().with_missing_paste(MissingPastePolicy::Empty);
/// let text = expand_with_config("a\n-- pasteme missing\nb", "input", config).unwrap();
/// assert_eq!(text, "a\n\nb");
/// ```
pub fn expand_with_config(
    source: &str,
    target: &str,
    config: ExpandConfig,
) -> Result<String, ExpandError> {
    config.validate()?;
    let mut expander = Expander::new(config);
    expander.parse_str(INPUT_DOCUMENT, source)?;
    expander.render(target)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_expand_document() {
        let text = "\
-- snippet name
world
-- endsnippet
hello
-- pasteme name";
        assert_eq!(expand(text, INPUT_DOCUMENT).unwrap(), "hello\nworld");
    }

    #[test]
    fn test_expand_named_snippet() {
        let text = "-- snippet part\nonly this\n-- endsnippet\nnot this";
        assert_eq!(expand(text, "part").unwrap(), "only this");
    }

    #[test]
    fn test_unknown_target_lists_available_names() {
        let text = "-- snippets row\na\nb\n-- endsnippets";
        let err = expand(text, "rows").unwrap_err();
        match &err {
            ExpandError::UnknownTopLevelSnippet { name, available } => {
                assert_eq!(name, "rows");
                assert_eq!(available, &vec!["row".to_string(), "input".to_string()]);
            }
            other => panic!("expected unknown target, got {:?}", other),
        }
        assert_eq!(err.suggestions().map(<[String]>::len), Some(2));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = ExpandConfig::new().with_marker("");
        let err = expand_with_config("text", INPUT_DOCUMENT, config).unwrap_err();
        assert!(matches!(err, ExpandError::Config(_)));
    }

    #[test]
    fn test_documents_share_root_scope() {
        let mut expander = Expander::with_diagnostics(ExpandConfig::default(), Silent);
        expander
            .parse_str("defs", "-- snippet item\none\n-- endsnippet")
            .unwrap();
        expander
            .parse_str("main", "-- snippet item\ntwo\n-- endsnippet\n-- pasteme item*")
            .unwrap();

        assert_eq!(expander.last_document(), Some("main"));
        assert_eq!(expander.render("main").unwrap(), "one\ntwo");
    }

    #[test]
    fn test_define_lowercases_name() {
        let mut expander = Expander::with_diagnostics(ExpandConfig::default(), Silent);
        expander.define("Width", "32");
        expander.parse_str("main", "-- PasteMe WIDTH").unwrap();
        assert_eq!(expander.render("main").unwrap(), "32");
    }

    #[test]
    fn test_define_multiline_text_is_reindented() {
        let mut expander = Expander::with_diagnostics(ExpandConfig::default(), Silent);
        expander.define("body", "a\nb");
        expander.parse_str("main", "    -- pasteme body").unwrap();
        assert_eq!(expander.render("main").unwrap(), "\ta\n\tb");
    }

    #[test]
    fn test_parse_missing_file() {
        let mut expander = Expander::with_diagnostics(ExpandConfig::default(), Silent);
        let err = expander
            .parse_file("definitely/not/here.tpl")
            .unwrap_err();
        assert!(matches!(err, ExpandError::InputUnavailable { .. }));
        assert_eq!(expander.last_document(), None);
    }

    #[test]
    fn test_report_includes_source_line() {
        let mut expander = Expander::with_diagnostics(ExpandConfig::default(), Silent);
        let err = expander
            .parse_str("main.tpl", "first\n-- popcontext")
            .unwrap_err();
        let report = expander.report(&err);
        assert!(report.contains("popcontext"));
        assert!(report.contains("main.tpl"));
    }

    #[test]
    fn test_failed_parse_leaves_no_definitions() {
        let mut expander = Expander::with_diagnostics(ExpandConfig::default(), Silent);
        expander.parse_str("good", "-- snippet a\nkept\n-- endsnippet").unwrap();

        let err = expander
            .parse_str(
                "bad",
                "-- snippet a\nleaked\n-- endsnippet\n-- pushcontext\n-- popcontext\n-- popcontext",
            )
            .unwrap_err();
        assert!(matches!(err, ExpandError::InvalidCommand { .. }));

        assert_eq!(expander.last_document(), Some("good"));
        assert_eq!(expander.render("a").unwrap(), "kept");
        assert!(matches!(
            expander.render("bad"),
            Err(ExpandError::UnknownTopLevelSnippet { .. })
        ));
        assert_eq!(expander.scopes().len(), 1);
        assert!(expander.report(&err).contains("bad"));
    }

    #[test]
    fn test_failed_recursion_rolls_back() {
        let config = ExpandConfig::new().with_max_depth(2);
        let mut expander = Expander::with_diagnostics(config, Silent);

        let err = expander
            .parse_str("deep", "-- snippet x\n-- endsnippet\n-- snippet a\n-- snippet b\n-- snippet c")
            .unwrap_err();
        assert!(matches!(err, ExpandError::RecursionLimitExceeded { .. }));
        assert_eq!(expander.last_document(), None);
        assert!(expander.scopes().get(expander.scopes().root()).is_empty());
    }

    #[test]
    fn test_report_without_location_is_plain() {
        let expander = Expander::with_diagnostics(ExpandConfig::default(), Silent);
        let err = ExpandError::UnknownTopLevelSnippet {
            name: "x".to_string(),
            available: Vec::new(),
        };
        assert_eq!(expander.report(&err), err.to_string());
    }

    #[test]
    fn test_recorder_sees_render_events() {
        let mut expander = Expander::with_diagnostics(ExpandConfig::default(), Recorder::new());
        expander
            .parse_str("main", "-- snippet a\nx\n-- endsnippet\n-- pasteme a")
            .unwrap();
        expander.diagnostics_mut().clear();
        expander.render("main").unwrap();

        let events = expander.diagnostics().events();
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::PasteMatched { name } if name == "a")));
    }
}
