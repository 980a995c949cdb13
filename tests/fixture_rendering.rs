//! Rendering of the template fixtures under tests/fixtures
//!
//! Fixtures are rendered through the same `Expander` the CLI uses, so files
//! are parsed in order into one shared root scope.

use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;

use pasteme::{ExpandConfig, Expander, Silent};

const ENTITY: &str = include_str!("fixtures/entity.tpl");
const CONTEXTS: &str = include_str!("fixtures/contexts.tpl");

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn render_fixture(name: &str, source: &str) -> String {
    let mut expander = Expander::with_diagnostics(ExpandConfig::default(), Silent);
    expander.parse_str(name, source).expect("Should parse");
    expander.render(name).expect("Should render")
}

#[test]
fn test_entity_fixture() {
    let output = render_fixture("entity.tpl", ENTITY);
    insta::assert_snapshot!(output, @r"
entity top is
  port (
  clk : in std_logic
  rst : in std_logic
  );
end entity;
architecture rtl of top is
  count_r : std_logic;
  valid_r : std_logic;
begin
end architecture;
");
}

#[test]
fn test_entity_fixture_defines_generated_snippets() {
    let mut expander = Expander::with_diagnostics(ExpandConfig::default(), Silent);
    expander.parse_str("entity.tpl", ENTITY).expect("Should parse");

    let root = expander.scopes().get(expander.scopes().root());
    let names: Vec<_> = root.names().collect();
    assert_eq!(
        names,
        vec!["port", "port", "signal", "signal", "decl", "decl", "entity.tpl"]
    );
    assert_eq!(expander.render("decl").unwrap(), "count_r : std_logic;");
}

#[test]
fn test_contexts_fixture() {
    // `paint` resolves `color*` against whichever scope is active where it is pasted
    let output = render_fixture("contexts.tpl", CONTEXTS);
    assert_eq!(output, "before\nred\n\nblue\nred\n\nafter\nred");
}

#[test]
fn test_files_share_one_root_scope() {
    let mut expander = Expander::with_diagnostics(ExpandConfig::default(), Silent);
    expander.parse_file(fixture("defs.tpl")).expect("Should parse defs");
    expander.parse_file(fixture("main.tpl")).expect("Should parse main");

    let last = expander.last_document().expect("Should have a document").to_string();
    assert!(last.ends_with("main.tpl"));
    assert_eq!(
        expander.render(&last).unwrap(),
        "class Record:\n\tget_id()\n\tget_name()"
    );
}

#[test]
fn test_file_order_matters() {
    // main.tpl pastes `getter*`, which is empty until defs.tpl has been parsed
    let mut expander = Expander::with_diagnostics(ExpandConfig::default(), Silent);
    expander.parse_file(fixture("main.tpl")).expect("Should parse main");
    let main = expander.last_document().expect("Should have a document").to_string();
    assert_eq!(expander.render(&main).unwrap(), "class Record:\n");

    expander.parse_file(fixture("defs.tpl")).expect("Should parse defs");
    assert_eq!(
        expander.render(&main).unwrap(),
        "class Record:\n\tget_id()\n\tget_name()"
    );
}
