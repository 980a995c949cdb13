//! pasteme CLI
//!
//! Usage:
//!   pasteme [OPTIONS] [TARGET]
//!
//! Options:
//!   -f, --file <FILE>          Parse a template file
//!   -d, --define <NAME> <TEXT> Define a one-line snippet
//!   -o, --last                 Render the most recently parsed file
//!   -c, --config <FILE>        Configuration file (TOML format)
//!   -v, --verbose              Trace parsing and expansion on stderr
//!   -g, --commands             Show template command reference
//!   -h, --help                 Print help
//!
//! `--file` and `--define` are applied in command-line order.

use std::path::PathBuf;
use std::process;

use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser};

use pasteme::{ExpandConfig, ExpandError, Expander, MissingPastePolicy};

#[derive(Parser)]
#[command(name = "pasteme")]
#[command(about = "Line-oriented snippet expander")]
struct Cli {
    /// Snippet to render
    target: Option<String>,

    /// Parse a template file (repeatable)
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Define a one-line snippet (repeatable)
    #[arg(
        short = 'd',
        long = "define",
        num_args = 2,
        value_names = ["NAME", "TEXT"],
        allow_hyphen_values = true
    )]
    defines: Vec<String>,

    /// Render the most recently parsed file instead of TARGET
    #[arg(short = 'o', long)]
    last: bool,

    /// Configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Command marker prefix
    #[arg(short, long)]
    marker: Option<String>,

    /// Maximum nesting depth for definitions and expansion
    #[arg(long)]
    max_depth: Option<usize>,

    /// Render unmatched required pastes as empty instead of failing
    #[arg(long)]
    lenient: bool,

    /// Trace parsing and expansion on stderr
    #[arg(short, long)]
    verbose: bool,

    /// Show template command reference
    #[arg(short = 'g', long)]
    commands: bool,
}

/// One `--file` or `--define`, in the order given
enum Input {
    File(PathBuf),
    Define(String, String),
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    if cli.commands {
        print_commands();
        return;
    }

    init_tracing(cli.verbose);

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let mut expander = Expander::new(config);

    for input in ordered_inputs(&cli, &matches) {
        match input {
            Input::File(path) => {
                if let Err(e) = expander.parse_file(&path) {
                    fail(&expander, &e);
                }
            }
            Input::Define(name, text) => expander.define(&name, &text),
        }
    }

    let target = if cli.last {
        expander.last_document().map(str::to_string)
    } else {
        cli.target.clone()
    };

    let Some(target) = target else {
        // Nothing to render
        print_usage();
        process::exit(1);
    };

    match expander.render(&target) {
        Ok(text) => {
            println!("{}", text);
        }
        Err(e) => fail(&expander, &e),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Configuration file first, then command-line overrides
fn load_config(cli: &Cli) -> Result<ExpandConfig, ExpandError> {
    let mut config = match &cli.config {
        Some(path) => ExpandConfig::from_file(path)?,
        None => ExpandConfig::default(),
    };

    if let Some(marker) = &cli.marker {
        config = config.with_marker(marker.clone());
    }
    if let Some(max_depth) = cli.max_depth {
        config = config.with_max_depth(max_depth);
    }
    if cli.lenient {
        config = config.with_missing_paste(MissingPastePolicy::Empty);
    }

    config.validate()?;
    Ok(config)
}

/// Interleave `--file` and `--define` by their position on the command line
fn ordered_inputs(cli: &Cli, matches: &ArgMatches) -> Vec<Input> {
    let mut inputs: Vec<(usize, Input)> = Vec::new();

    if let Some(indices) = matches.indices_of("files") {
        inputs.extend(
            indices
                .zip(&cli.files)
                .map(|(index, path)| (index, Input::File(path.clone()))),
        );
    }

    if let Some(indices) = matches.indices_of("defines") {
        // Two values per occurrence; the first one's index orders it
        inputs.extend(indices.step_by(2).zip(cli.defines.chunks(2)).filter_map(
            |(index, pair)| match pair {
                [name, text] => Some((index, Input::Define(name.clone(), text.clone()))),
                _ => None,
            },
        ));
    }

    inputs.sort_by_key(|(index, _)| *index);
    inputs.into_iter().map(|(_, input)| input).collect()
}

fn fail<D: pasteme::Diagnostics>(expander: &Expander<D>, err: &ExpandError) -> ! {
    eprintln!("{}", expander.report(err));
    if let Some(names) = err.suggestions() {
        if !names.is_empty() {
            eprintln!("Available snippets: {}", names.join(", "));
        }
    }
    process::exit(1);
}

fn print_usage() {
    eprintln!(
        r#"pasteme - line-oriented snippet expander

USAGE:
    pasteme [OPTIONS] [TARGET]
    pasteme -f defs.tpl -f main.tpl -o

OPTIONS:
    -f, --file <FILE>           Parse a template file
    -d, --define <NAME> <TEXT>  Define a one-line snippet
    -o, --last                  Render the most recently parsed file
    -c, --config <FILE>         Configuration file (TOML)
    -m, --marker <MARKER>       Command marker (default "--")
    --max-depth <N>             Nesting limit (default 64)
    --lenient                   Unmatched required pastes render empty
    -v, --verbose               Trace parsing and expansion on stderr
    -g, --commands              Show template command reference
    -h, --help                  Print help

Files and definitions are processed in the order given. Nothing was
rendered: pass a TARGET or -o."#
    );
}

fn print_commands() {
    println!(
        r#"PASTEME TEMPLATE COMMANDS
=========================

Command lines start with the marker ("--" by default), optionally followed
by whitespace. Command text is case-insensitive. Every other line, including
marker lines with an unknown keyword, is literal text.

DEFINITIONS
-----------
-- snippet <name>           Start a snippet; ends at the matching endsnippet
-- endsnippet               End the snippet
-- endsnippet foreach <var> End the snippet and generate one copy per
                            snippet named <var>; each copy is rendered with
                            only that snippet visible and parsed again
-- snippets <name>          Every following line is its own snippet <name>
-- endsnippets              End the one-line batch

Snippets defined inside another snippet are visible from the enclosing
scope; nesting does not make them part of the outer snippet's text.
A file is itself a snippet named after its path.

PASTING
-------
-- pasteme <name>           Paste exactly one snippet (error if none)
-- pasteme <name>?          Paste the first match, if any
-- pasteme <name>+          Paste every match, at least one
-- pasteme <name>*          Paste every match, possibly none
-- pasteme <name>\          Trailing backslash: join the pasted text with
                            the previous and next lines instead of breaking

Matches are pasted in definition order, nearest scope first. Pasted text
takes the indentation of the paste line.

CONTEXTS
--------
-- pushcontext              Open a nested scope: snippets defined until the
                            matching popcontext are only visible inside it
-- popcontext               Return to the enclosing scope

EXAMPLE
-------
-- snippets port
clk
rst
-- endsnippets
entity top is
    -- pasteme port*
end entity;"#
    );
}
