//! Command grammar: turns command text into a [`Command`]

use crate::error::ExpandError;

use super::ast::{Location, PasteReference, Repeat};
use super::lexer::{lex, Token};

/// A recognized template command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `pasteme <name>[?+*][\]`
    Paste(PasteReference),
    /// `snippet <name>`
    BeginSnippet { name: String },
    /// `endsnippet [foreach <name>]`
    EndSnippet { foreach: Option<String> },
    /// `snippets <name>`
    BeginBatch { name: String },
    /// `endsnippets`
    EndBatch,
    /// `pushcontext`
    PushContext,
    /// `popcontext`
    PopContext,
}

impl Command {
    /// Parse lower-cased command text.
    ///
    /// Returns `Ok(None)` when the first word is not a known keyword; such
    /// lines are kept as literal text.
    pub fn parse(text: &str, location: &Location) -> Result<Option<Self>, ExpandError> {
        let tokens: Vec<_> = lex(text).collect();
        let Some((keyword, keyword_span)) = tokens.first().cloned() else {
            return Ok(None);
        };
        let word = |index: usize| tokens.get(index).map(|(_, span)| &text[span.clone()]);

        let command = match keyword {
            Token::Pasteme => {
                Command::Paste(parse_paste(&text[keyword_span.end..], text, location)?)
            }
            Token::Snippet => Command::BeginSnippet {
                name: required_name(word(1), text, location)?,
            },
            Token::Snippets => Command::BeginBatch {
                name: required_name(word(1), text, location)?,
            },
            Token::EndSnippet => match tokens.get(1) {
                Some((Token::Foreach, _)) => Command::EndSnippet {
                    foreach: Some(required_name(word(2), text, location)?),
                },
                _ => Command::EndSnippet { foreach: None },
            },
            Token::EndSnippets => Command::EndBatch,
            Token::PushContext => Command::PushContext,
            Token::PopContext => Command::PopContext,
            Token::Foreach | Token::Word => return Ok(None),
        };

        Ok(Some(command))
    }
}

fn required_name(name: Option<&str>, text: &str, location: &Location) -> Result<String, ExpandError> {
    name.map(str::to_string)
        .ok_or_else(|| ExpandError::invalid_command(location.clone(), text, "missing snippet name"))
}

/// Parse the arguments of `pasteme`: the inline marker is stripped first, then
/// the repetition suffix, then the first remaining word is the name.
fn parse_paste(args: &str, text: &str, location: &Location) -> Result<PasteReference, ExpandError> {
    let mut rest = args.trim_end();

    let inline = rest.ends_with('\\');
    if inline {
        rest = rest[..rest.len() - 1].trim_end();
    }

    let mut repeat = Repeat::Exactly1;
    if let Some(suffix) = rest.chars().last().and_then(Repeat::from_suffix) {
        repeat = suffix;
        rest = rest[..rest.len() - 1].trim_end();
    }

    let name = rest
        .split_whitespace()
        .next()
        .ok_or_else(|| ExpandError::invalid_command(location.clone(), text, "missing snippet name"))?;

    Ok(PasteReference {
        name: name.to_string(),
        repeat,
        inline,
        location: location.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location() -> Location {
        Location::new("test.tpl", 3)
    }

    fn parse(text: &str) -> Option<Command> {
        Command::parse(text, &location()).expect("Should parse")
    }

    fn paste(text: &str) -> PasteReference {
        match parse(text) {
            Some(Command::Paste(paste)) => paste,
            other => panic!("expected paste, got {:?}", other),
        }
    }

    #[test]
    fn test_plain_paste() {
        let p = paste("pasteme ports");
        assert_eq!(p.name, "ports");
        assert_eq!(p.repeat, Repeat::Exactly1);
        assert!(!p.inline);
        assert_eq!(p.location, location());
    }

    #[test]
    fn test_paste_modifiers() {
        assert_eq!(paste("pasteme a?").repeat, Repeat::ZeroOrOne);
        assert_eq!(paste("pasteme a+").repeat, Repeat::OneOrMore);
        assert_eq!(paste("pasteme a*").repeat, Repeat::ZeroOrMore);
    }

    #[test]
    fn test_paste_inline_with_repeat() {
        let p = paste("pasteme sep*\\");
        assert_eq!(p.name, "sep");
        assert_eq!(p.repeat, Repeat::ZeroOrMore);
        assert!(p.inline);
    }

    #[test]
    fn test_paste_suffix_separated_by_space() {
        let p = paste("pasteme sep * \\");
        assert_eq!(p.name, "sep");
        assert_eq!(p.repeat, Repeat::ZeroOrMore);
        assert!(p.inline);
    }

    #[test]
    fn test_paste_keyword_as_name() {
        assert_eq!(paste("pasteme foreach").name, "foreach");
    }

    #[test]
    fn test_paste_missing_name() {
        let result = Command::parse("pasteme", &location());
        assert!(matches!(result, Err(ExpandError::InvalidCommand { .. })));

        let result = Command::parse("pasteme *\\", &location());
        assert!(matches!(result, Err(ExpandError::InvalidCommand { .. })));
    }

    #[test]
    fn test_snippet_blocks() {
        assert_eq!(
            parse("snippet body"),
            Some(Command::BeginSnippet {
                name: "body".to_string()
            })
        );
        assert_eq!(
            parse("snippets rows"),
            Some(Command::BeginBatch {
                name: "rows".to_string()
            })
        );
        assert_eq!(parse("endsnippets"), Some(Command::EndBatch));
    }

    #[test]
    fn test_snippet_missing_name() {
        let err = Command::parse("snippet", &location()).unwrap_err();
        assert!(err.to_string().contains("missing snippet name"));
        assert!(err.to_string().contains("test.tpl:3"));
    }

    #[test]
    fn test_endsnippet_variants() {
        assert_eq!(
            parse("endsnippet"),
            Some(Command::EndSnippet { foreach: None })
        );
        assert_eq!(
            parse("endsnippet foreach row"),
            Some(Command::EndSnippet {
                foreach: Some("row".to_string())
            })
        );
        assert!(Command::parse("endsnippet foreach", &location()).is_err());
    }

    #[test]
    fn test_context_commands() {
        assert_eq!(parse("pushcontext"), Some(Command::PushContext));
        assert_eq!(parse("popcontext"), Some(Command::PopContext));
    }

    #[test]
    fn test_unknown_keyword_is_not_a_command() {
        assert_eq!(parse("todo: tidy this up"), None);
        assert_eq!(parse(""), None);
        assert_eq!(parse("foreach x"), None);
    }
}
