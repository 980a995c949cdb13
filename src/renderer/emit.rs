//! Snippet rendering with a mutable active scope

use crate::config::{ExpandConfig, MissingPastePolicy};
use crate::diagnostics::{Diagnostics, Event};
use crate::error::ExpandError;
use crate::parser::ast::{Emitter, PasteReference, Snippet, SourceLine};
use crate::scope::{ScopeId, ScopeTree};

/// State shared by one top-level render call.
///
/// `active` is the scope pastes resolve against; context switches reached
/// during the walk overwrite it, and every later paste in the same walk sees
/// the change.
pub struct RenderContext<'a> {
    tree: &'a ScopeTree,
    active: ScopeId,
    depth: usize,
    max_depth: usize,
    missing_paste: MissingPastePolicy,
    diagnostics: &'a mut dyn Diagnostics,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        tree: &'a ScopeTree,
        active: ScopeId,
        config: &ExpandConfig,
        diagnostics: &'a mut dyn Diagnostics,
    ) -> Self {
        Self {
            tree,
            active,
            depth: 0,
            max_depth: config.max_depth,
            missing_paste: config.missing_paste,
            diagnostics,
        }
    }

    /// The scope pastes currently resolve against
    pub fn active(&self) -> ScopeId {
        self.active
    }
}

/// Render a snippet: one output line per physical line, joined with `\n`,
/// without a trailing newline.
pub fn render(snippet: &Snippet, ctx: &mut RenderContext<'_>) -> Result<String, ExpandError> {
    let mut rendered = Vec::with_capacity(snippet.lines().len());
    for line in snippet.lines() {
        rendered.push(render_line(line, ctx)?);
    }
    Ok(rendered.join("\n"))
}

fn render_line(line: &SourceLine, ctx: &mut RenderContext<'_>) -> Result<String, ExpandError> {
    let mut content = String::new();
    let mut previous: Option<&Emitter> = None;

    for emitter in &line.emitters {
        if let Some(previous) = previous {
            if !previous.is_inline() && !emitter.is_inline() {
                content.push(' ');
            }
        }
        content.push_str(&render_emitter(emitter, ctx)?);
        previous = Some(emitter);
    }

    // Pasted snippets may span several lines; each gets this line's indentation
    let indent = line.indentation.to_string();
    let physical: Vec<String> = content
        .split('\n')
        .map(|text| {
            if text.trim().is_empty() {
                String::new()
            } else {
                format!("{}{}", indent, text)
            }
        })
        .collect();

    Ok(physical.join("\n"))
}

fn render_emitter(emitter: &Emitter, ctx: &mut RenderContext<'_>) -> Result<String, ExpandError> {
    match emitter {
        Emitter::Literal(text) => Ok(text.clone()),
        Emitter::Paste(paste) => render_paste(paste, ctx),
        Emitter::ContextPush(scope) => {
            ctx.diagnostics.record(Event::ContextPushed);
            ctx.active = *scope;
            Ok(String::new())
        }
        Emitter::ContextPop(scope) => {
            ctx.diagnostics.record(Event::ContextPopped);
            ctx.active = *scope;
            Ok(String::new())
        }
    }
}

/// Resolve a paste against the active scope and render what it matches.
///
/// Matches come from the scope chain as it stood when the paste was reached,
/// nearest scope first; each match is rendered against the live active scope.
fn render_paste(paste: &PasteReference, ctx: &mut RenderContext<'_>) -> Result<String, ExpandError> {
    ctx.diagnostics.record(Event::PasteAttempt {
        name: paste.name.clone(),
    });

    let tree = ctx.tree;
    let mut pieces = Vec::new();
    let mut count = 0;

    for snippet in tree.matches(ctx.active, &paste.name) {
        count += 1;
        ctx.diagnostics.record(Event::PasteMatched {
            name: paste.name.clone(),
        });

        if ctx.depth >= ctx.max_depth {
            return Err(ExpandError::recursion_limit(
                paste.location.clone(),
                ctx.max_depth,
            ));
        }
        ctx.depth += 1;
        let text = render(snippet, ctx);
        ctx.depth -= 1;
        let text = text?;

        // An empty snippet contributes nothing, not even a line break
        if !snippet.is_empty() {
            pieces.push(text);
        }

        if !paste.repeat.is_multiple() {
            break;
        }
    }

    if count == 0 {
        ctx.diagnostics.record(Event::PasteUnmatched {
            name: paste.name.clone(),
        });
        if !paste.repeat.allows_none() && ctx.missing_paste == MissingPastePolicy::Error {
            return Err(ExpandError::UnsatisfiedRequiredPaste {
                location: paste.location.clone(),
                name: paste.name.clone(),
                repeat: paste.repeat,
            });
        }
    }

    Ok(pieces.join("\n"))
}
