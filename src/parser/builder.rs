//! Recursive-descent snippet builder
//!
//! The builder consumes classified lines and turns them into snippets
//! registered in a [`ScopeTree`]. Each `snippet` block is built by a nested
//! invocation reading from the same input; the finished snippet goes into the
//! scope the block was opened in, not into the snippet that contained it.

use crate::config::ExpandConfig;
use crate::diagnostics::{Diagnostics, Event};
use crate::error::ExpandError;
use crate::renderer::{render, RenderContext};
use crate::scope::{ScopeId, ScopeTree};

use super::ast::{Emitter, Indentation, Location, PasteReference, Snippet, SourceLine};
use super::command::Command;
use super::line::classify;
use super::source::SourceLines;

/// Parses template text into snippets registered in a scope tree
pub struct SnippetBuilder<'a> {
    tree: &'a mut ScopeTree,
    config: &'a ExpandConfig,
    diagnostics: &'a mut dyn Diagnostics,
}

/// A snippet under construction
struct Block {
    name: String,
    lines: Vec<SourceLine>,
    /// Set after an inline paste: the next non-empty text line joins it
    inline: bool,
    /// Where the finished snippet is registered
    home: ScopeId,
    /// Where nested definitions currently go; moved by push/pop
    target: ScopeId,
}

impl Block {
    fn new(name: String, home: ScopeId) -> Self {
        Self {
            name,
            lines: Vec::new(),
            inline: false,
            home,
            target: home,
        }
    }

    fn push_text(&mut self, indentation: Indentation, text: &str) {
        let continues = self.inline && !text.is_empty();
        self.inline = false;

        if continues {
            if let Some(last) = self.lines.last_mut() {
                last.emitters.push(Emitter::Literal(text.to_string()));
                return;
            }
        }
        self.lines.push(SourceLine::literal(indentation, text));
    }

    fn push_paste(&mut self, indentation: Indentation, paste: PasteReference) {
        self.inline = paste.inline;

        if paste.inline {
            if let Some(last) = self.lines.last_mut() {
                last.emitters.push(Emitter::Paste(paste));
                return;
            }
        }
        self.lines
            .push(SourceLine::new(indentation, Emitter::Paste(paste)));
    }

    fn into_snippet(self) -> (ScopeId, Snippet) {
        (self.home, Snippet::new(self.name, self.lines))
    }
}

impl<'a> SnippetBuilder<'a> {
    pub fn new(
        tree: &'a mut ScopeTree,
        config: &'a ExpandConfig,
        diagnostics: &'a mut dyn Diagnostics,
    ) -> Self {
        Self {
            tree,
            config,
            diagnostics,
        }
    }

    /// Parse a whole document into `target`.
    ///
    /// The document is itself a snippet named `name`; it is registered after
    /// every snippet it defines.
    pub fn parse_document(
        &mut self,
        name: &str,
        text: &str,
        target: ScopeId,
    ) -> Result<(), ExpandError> {
        let mut input = SourceLines::new(name, text);
        self.build(name.to_string(), target, &mut input, 0)
    }

    /// Build one snippet from `input` up to its `endsnippet` or the end of
    /// input, whichever comes first.
    fn build(
        &mut self,
        name: String,
        home: ScopeId,
        input: &mut SourceLines<'_>,
        depth: usize,
    ) -> Result<(), ExpandError> {
        let mut block = Block::new(name, home);

        while let Some((location, raw)) = input.next() {
            let line = classify(raw, &self.config.marker);
            let command_text = line.command.as_deref().unwrap_or_default();
            let command = match &line.command {
                Some(text) => Command::parse(text, &location)?,
                None => None,
            };

            let Some(command) = command else {
                block.push_text(line.indentation, line.body);
                continue;
            };

            match command {
                Command::Paste(paste) => {
                    self.diagnostics.record(Event::PasteParsed {
                        name: paste.name.clone(),
                    });
                    block.push_paste(line.indentation, paste);
                }
                Command::BeginSnippet { name } => {
                    self.diagnostics.record(Event::SnippetOpened { name: name.clone() });
                    let depth = self.descend(depth, &location)?;
                    self.build(name, block.target, input, depth)?;
                }
                Command::BeginBatch { name } => {
                    let depth = self.descend(depth, &location)?;
                    self.build_batch(name, block.target, input, depth)?;
                }
                Command::EndSnippet { foreach: None } => {
                    self.define(block);
                    return Ok(());
                }
                Command::EndSnippet {
                    foreach: Some(variable),
                } => {
                    return self.generate_foreach(block, &variable, &location, depth);
                }
                Command::EndBatch => {
                    self.diagnostics.record(Event::StrayCommand {
                        command: command_text.to_string(),
                        location,
                    });
                }
                Command::PushContext => {
                    let child = self.tree.add_child(block.target);
                    block
                        .lines
                        .push(SourceLine::new(line.indentation, Emitter::ContextPush(child)));
                    block.target = child;
                }
                Command::PopContext => {
                    let parent = self.tree.get(block.target).parent().ok_or_else(|| {
                        ExpandError::invalid_command(
                            location.clone(),
                            command_text,
                            "popcontext without a matching pushcontext",
                        )
                    })?;
                    block
                        .lines
                        .push(SourceLine::new(line.indentation, Emitter::ContextPop(parent)));
                    block.target = parent;
                }
            }
        }

        // End of input closes the block as if it had been terminated
        self.define(block);
        Ok(())
    }

    /// `snippets <name>`: every line up to `endsnippets` is its own snippet
    fn build_batch(
        &mut self,
        name: String,
        target: ScopeId,
        input: &mut SourceLines<'_>,
        depth: usize,
    ) -> Result<(), ExpandError> {
        let mut count = 0;

        while let Some((location, raw)) = input.next() {
            let line = classify(raw, &self.config.marker);
            if let Some(text) = &line.command {
                if let Some(Command::EndBatch) = Command::parse(text, &location)? {
                    break;
                }
            }

            let mut single = SourceLines::starting_at(location.origin.clone(), line.body, location.line);
            self.build(name.clone(), target, &mut single, depth)?;
            count += 1;
        }

        self.diagnostics.record(Event::BatchClosed { name, count });
        Ok(())
    }

    /// `endsnippet foreach <variable>`: render the block once per snippet
    /// named `variable`, each time against a scope holding only that
    /// snippet, and parse every result as a new snippet with the block's name.
    fn generate_foreach(
        &mut self,
        block: Block,
        variable: &str,
        location: &Location,
        depth: usize,
    ) -> Result<(), ExpandError> {
        // Snapshot first: generated snippets may share the variable's name
        let instances: Vec<Snippet> = self
            .tree
            .matches(block.target, variable)
            .cloned()
            .collect();
        let (home, template) = block.into_snippet();
        let depth = self.descend(depth, location)?;
        let origin = format!("{} (foreach {})", location.origin, variable);
        let count = instances.len();

        for instance in instances {
            // The instance scope only lives for this render
            let checkpoint = self.tree.checkpoint();
            let scope = self.tree.add_detached();
            self.tree.register(scope, instance);

            let generated = {
                let mut ctx =
                    RenderContext::new(&*self.tree, scope, self.config, &mut *self.diagnostics);
                render(&template, &mut ctx)
            };
            self.tree.rollback(checkpoint);
            let generated = generated?;

            let mut input = SourceLines::new(origin.clone(), &generated);
            self.build(template.name().to_string(), home, &mut input, depth)?;
        }

        self.diagnostics.record(Event::ForeachGenerated {
            name: template.name().to_string(),
            variable: variable.to_string(),
            count,
        });
        Ok(())
    }

    fn define(&mut self, block: Block) {
        let (home, snippet) = block.into_snippet();
        self.diagnostics.record(Event::SnippetDefined {
            name: snippet.name().to_string(),
        });
        self.tree.register(home, snippet);
    }

    fn descend(&self, depth: usize, location: &Location) -> Result<usize, ExpandError> {
        if depth >= self.config.max_depth {
            return Err(ExpandError::recursion_limit(
                location.clone(),
                self.config.max_depth,
            ));
        }
        Ok(depth + 1)
    }
}
