//! Snippet tree types produced by the builder and consumed by the renderer

use std::fmt;

use crate::scope::ScopeId;

/// Where a line came from: the document (or synthesized source) name and a
/// 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    pub origin: String,
    pub line: usize,
}

impl Location {
    pub fn new(origin: impl Into<String>, line: usize) -> Self {
        Self {
            origin: origin.into(),
            line,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.origin, self.line)
    }
}

/// Column width of a line's leading whitespace.
///
/// A tab counts as four columns and any other whitespace character as one.
/// Only the total width survives: re-serialization emits one tab per four
/// columns followed by a space per remaining column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Indentation(pub usize);

impl Indentation {
    pub const TAB_WIDTH: usize = 4;

    /// Measure the leading whitespace of `line`, returning the width and the
    /// remainder of the line.
    pub fn split(line: &str) -> (Self, &str) {
        let mut width = 0;
        for (offset, c) in line.char_indices() {
            match c {
                '\t' => width += Self::TAB_WIDTH,
                ' ' => width += 1,
                c if c.is_whitespace() => {}
                _ => return (Self(width), &line[offset..]),
            }
        }
        (Self(width), "")
    }
}

impl fmt::Display for Indentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..self.0 / Self::TAB_WIDTH {
            f.write_str("\t")?;
        }
        for _ in 0..self.0 % Self::TAB_WIDTH {
            f.write_str(" ")?;
        }
        Ok(())
    }
}

/// How many matches a paste reference accepts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Repeat {
    /// No suffix
    #[default]
    Exactly1,
    /// `?`
    ZeroOrOne,
    /// `+`
    OneOrMore,
    /// `*`
    ZeroOrMore,
}

impl Repeat {
    pub fn from_suffix(c: char) -> Option<Self> {
        match c {
            '?' => Some(Repeat::ZeroOrOne),
            '+' => Some(Repeat::OneOrMore),
            '*' => Some(Repeat::ZeroOrMore),
            _ => None,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Repeat::Exactly1 => "",
            Repeat::ZeroOrOne => "?",
            Repeat::OneOrMore => "+",
            Repeat::ZeroOrMore => "*",
        }
    }

    /// Whether an empty resolution is acceptable
    pub fn allows_none(self) -> bool {
        matches!(self, Repeat::ZeroOrOne | Repeat::ZeroOrMore)
    }

    /// Whether resolution continues past the first match
    pub fn is_multiple(self) -> bool {
        matches!(self, Repeat::OneOrMore | Repeat::ZeroOrMore)
    }
}

impl fmt::Display for Repeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// `-- pasteme name[?+*][\]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteReference {
    pub name: String,
    pub repeat: Repeat,
    pub inline: bool,
    pub location: Location,
}

/// One renderable element of a source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emitter {
    /// Verbatim text
    Literal(String),
    /// Substitution of every matching snippet, per the repeat modifier
    Paste(PasteReference),
    /// Make the given scope active for the rest of the walk
    ContextPush(ScopeId),
    /// Restore the given (enclosing) scope as active
    ContextPop(ScopeId),
}

impl Emitter {
    /// Inline emitters fuse with their neighbours without a separating space.
    /// Context switches render nothing, so they never introduce a separator.
    pub fn is_inline(&self) -> bool {
        match self {
            Emitter::Literal(_) => false,
            Emitter::Paste(paste) => paste.inline,
            Emitter::ContextPush(_) | Emitter::ContextPop(_) => true,
        }
    }
}

/// An indentation level plus the emitters that render onto it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    pub indentation: Indentation,
    pub emitters: Vec<Emitter>,
}

impl SourceLine {
    pub fn new(indentation: Indentation, emitter: Emitter) -> Self {
        Self {
            indentation,
            emitters: vec![emitter],
        }
    }

    pub fn literal(indentation: Indentation, text: impl Into<String>) -> Self {
        Self::new(indentation, Emitter::Literal(text.into()))
    }

    /// Whether no emitter on this line can produce text or switch scope
    pub fn is_static(&self) -> bool {
        self.emitters
            .iter()
            .all(|emitter| matches!(emitter, Emitter::Literal(_)))
    }
}

/// A named, ordered sequence of source lines.
///
/// Snippets are immutable once built; scopes hand out shared references only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    name: String,
    lines: Vec<SourceLine>,
}

impl Snippet {
    pub fn new(name: impl Into<String>, lines: Vec<SourceLine>) -> Self {
        Self {
            name: name.into(),
            lines,
        }
    }

    /// A one-line literal snippet, as injected from the command line
    pub fn literal(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(name, vec![SourceLine::literal(Indentation::default(), text)])
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lines(&self) -> &[SourceLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether rendering this snippet is independent of any scope
    pub fn is_static(&self) -> bool {
        self.lines.iter().all(SourceLine::is_static)
    }
}
