//! Error types for parsing and expansion

use std::io::IsTerminal;
use std::path::PathBuf;

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::config::ConfigError;
use crate::parser::ast::{Location, Repeat};

/// Errors that can occur while parsing templates or rendering snippets
#[derive(Debug, Error)]
pub enum ExpandError {
    /// A requested source could not be read
    #[error("cannot read '{}': {message}", path.display())]
    InputUnavailable { path: PathBuf, message: String },

    /// Malformed command line
    #[error("{location}: invalid command '{command}': {reason}")]
    InvalidCommand {
        location: Location,
        command: String,
        reason: String,
    },

    /// Render target missing from the root scope
    #[error("unknown top-level snippet '{name}'")]
    UnknownTopLevelSnippet { name: String, available: Vec<String> },

    /// `Exactly1` or `OneOrMore` paste with nothing to paste
    #[error("{location}: 'pasteme {name}{repeat}' requires a match but no snippet named '{name}' is in scope")]
    UnsatisfiedRequiredPaste {
        location: Location,
        name: String,
        repeat: Repeat,
    },

    /// Nesting or self-referential expansion went too deep
    #[error("{location}: expansion exceeded the recursion limit of {limit}")]
    RecursionLimitExceeded { location: Location, limit: usize },

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ExpandError {
    pub fn input_unavailable(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::InputUnavailable {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub fn invalid_command(
        location: Location,
        command: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidCommand {
            location,
            command: command.into(),
            reason: reason.into(),
        }
    }

    pub fn recursion_limit(location: Location, limit: usize) -> Self {
        Self::RecursionLimitExceeded { location, limit }
    }

    /// Get the source location if available
    pub fn location(&self) -> Option<&Location> {
        match self {
            Self::InvalidCommand { location, .. }
            | Self::UnsatisfiedRequiredPaste { location, .. }
            | Self::RecursionLimitExceeded { location, .. } => Some(location),
            _ => None,
        }
    }

    /// Names that could have been meant, for errors that carry them
    pub fn suggestions(&self) -> Option<&[String]> {
        match self {
            Self::UnknownTopLevelSnippet { available, .. } => Some(available),
            _ => None,
        }
    }

    /// Format the error with source context using ariadne, colored when
    /// stderr is a terminal.
    pub fn format(&self, source: &str, filename: &str) -> String {
        self.format_with_color(source, filename, std::io::stderr().is_terminal())
    }

    /// Like [`ExpandError::format`] with explicit control over ANSI colors.
    ///
    /// Falls back to the plain message when the error has no location or the
    /// location's line is not part of `source`.
    pub fn format_with_color(&self, source: &str, filename: &str, color: bool) -> String {
        let Some(span) = self.location().and_then(|loc| line_span(source, loc.line)) else {
            return self.to_string();
        };

        let message = match self {
            Self::InvalidCommand { reason, .. } => reason.clone(),
            Self::UnsatisfiedRequiredPaste { name, .. } => {
                format!("no snippet named '{}' is in scope here", name)
            }
            Self::RecursionLimitExceeded { limit, .. } => {
                format!("expansion nested deeper than {} levels", limit)
            }
            _ => self.to_string(),
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_config(Config::default().with_color(color))
            .with_message(self.to_string())
            .with_label(
                Label::new((filename, span))
                    .with_message(message)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

/// Character range of the 1-based `line` in `source`, without its newline
fn line_span(source: &str, line: usize) -> Option<std::ops::Range<usize>> {
    let mut start = 0;
    for (index, text) in source.split('\n').enumerate() {
        let len = text.chars().count();
        if index + 1 == line {
            return Some(start..start + len);
        }
        start += len + 1;
    }
    None
}
