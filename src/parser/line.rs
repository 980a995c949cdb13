//! Line classification: indentation, body, and command detection

use super::ast::Indentation;

/// A raw line split into its indentation and the text that follows it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine<'s> {
    pub indentation: Indentation,
    /// The line with its leading whitespace removed
    pub body: &'s str,
    /// Lower-cased text after the marker, if the body is a command line
    pub command: Option<String>,
}

impl ClassifiedLine<'_> {
    pub fn is_command(&self) -> bool {
        self.command.is_some()
    }
}

/// Split `raw` into indentation and body, and detect whether the body starts
/// with `marker`.
pub fn classify<'s>(raw: &'s str, marker: &str) -> ClassifiedLine<'s> {
    let (indentation, body) = Indentation::split(raw);
    let command = body
        .strip_prefix(marker)
        .map(|rest| rest.trim_start().to_lowercase());

    ClassifiedLine {
        indentation,
        body,
        command,
    }
}
