//! Diagnostic events emitted while parsing and rendering
//!
//! The builder and the renderer report what they do through a [`Diagnostics`]
//! sink handed to them by the caller. The CLI uses [`TracingDiagnostics`] so
//! events end up on stderr when `--verbose` is set; tests use [`Recorder`].

use std::fmt;

use crate::parser::ast::Location;

/// Something worth tracing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    SnippetOpened { name: String },
    SnippetDefined { name: String },
    BatchClosed { name: String, count: usize },
    PasteParsed { name: String },
    PasteAttempt { name: String },
    PasteMatched { name: String },
    PasteUnmatched { name: String },
    ContextPushed,
    ContextPopped,
    ForeachGenerated {
        name: String,
        variable: String,
        count: usize,
    },
    StrayCommand { command: String, location: Location },
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::SnippetOpened { name } => write!(f, "opened snippet {}", name),
            Event::SnippetDefined { name } => write!(f, "defined snippet {}", name),
            Event::BatchClosed { name, count } => {
                write!(f, "closed batch {} with {} snippets", name, count)
            }
            Event::PasteParsed { name } => write!(f, "parsed paste {}", name),
            Event::PasteAttempt { name } => write!(f, "attempt to expand {}", name),
            Event::PasteMatched { name } => write!(f, "matched {}", name),
            Event::PasteUnmatched { name } => write!(f, "no matches for {}", name),
            Event::ContextPushed => f.write_str("push context"),
            Event::ContextPopped => f.write_str("pop context"),
            Event::ForeachGenerated {
                name,
                variable,
                count,
            } => write!(
                f,
                "foreach {} generated {} snippets named {}",
                variable, count, name
            ),
            Event::StrayCommand { command, location } => {
                write!(f, "{}: ignored stray '{}'", location, command)
            }
        }
    }
}

/// Receiver of diagnostic events
pub trait Diagnostics {
    fn record(&mut self, event: Event);
}

/// Forwards every event to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn record(&mut self, event: Event) {
        match &event {
            Event::StrayCommand { .. } => tracing::warn!("{}", event),
            _ => tracing::debug!("{}", event),
        }
    }
}

/// Drops every event
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Diagnostics for Silent {
    fn record(&mut self, _event: Event) {}
}

/// Keeps every event in order
#[derive(Debug, Default, Clone)]
pub struct Recorder {
    events: Vec<Event>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Diagnostics for Recorder {
    fn record(&mut self, event: Event) {
        self.events.push(event);
    }
}

impl<D: Diagnostics + ?Sized> Diagnostics for &mut D {
    fn record(&mut self, event: Event) {
        (**self).record(event);
    }
}
