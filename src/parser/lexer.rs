//! Lexer for command text using logos
//!
//! Command text is everything after the marker on a command line, already
//! lower-cased. Tokens are whitespace-separated; the recognized keywords get
//! their own variants and anything else is a `Word`.

use logos::Logos;

/// Byte range in command text
pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    #[token("pasteme")]
    Pasteme,
    #[token("snippet")]
    Snippet,
    #[token("snippets")]
    Snippets,
    #[token("endsnippet")]
    EndSnippet,
    #[token("endsnippets")]
    EndSnippets,
    #[token("pushcontext")]
    PushContext,
    #[token("popcontext")]
    PopContext,
    #[token("foreach")]
    Foreach,

    // Names, modifiers and unknown keywords
    #[regex(r"[^ \t\r\n\f]+")]
    Word,
}

/// Lex command text into tokens with spans
pub fn lex(input: &str) -> impl Iterator<Item = (Token, Span)> + '_ {
    Token::lexer(input)
        .spanned()
        .filter_map(|(tok, span)| tok.ok().map(|t| (t, span)))
}
