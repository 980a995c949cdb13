//! Parser for pasteme templates

pub mod ast;
pub mod builder;
pub mod command;
pub mod lexer;
pub mod line;
pub mod source;

pub use ast::*;
pub use builder::SnippetBuilder;
pub use command::Command;
pub use line::{classify, ClassifiedLine};
pub use source::SourceLines;
