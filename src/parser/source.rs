//! Pull-based line input for the builder

use std::iter::Enumerate;
use std::str::Lines;

use super::ast::Location;

/// Lines of a text buffer, numbered from a starting line.
///
/// Files, string literals and foreach-generated text are all read through
/// this type; it does no I/O of its own.
#[derive(Debug, Clone)]
pub struct SourceLines<'s> {
    origin: String,
    first_line: usize,
    lines: Enumerate<Lines<'s>>,
}

impl<'s> SourceLines<'s> {
    pub fn new(origin: impl Into<String>, text: &'s str) -> Self {
        Self::starting_at(origin, text, 1)
    }

    /// Number lines from `first_line` instead of 1
    pub fn starting_at(origin: impl Into<String>, text: &'s str, first_line: usize) -> Self {
        Self {
            origin: origin.into(),
            first_line,
            lines: text.lines().enumerate(),
        }
    }
}

impl<'s> Iterator for SourceLines<'s> {
    type Item = (Location, &'s str);

    fn next(&mut self) -> Option<Self::Item> {
        let (index, line) = self.lines.next()?;
        Some((Location::new(self.origin.clone(), self.first_line + index), line))
    }
}
