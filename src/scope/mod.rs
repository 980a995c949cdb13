//! Scoped snippet tables
//!
//! Snippets are registered into scopes, which form a tree through parent
//! links. A paste looks for its name in the active scope first and then
//! escalates through the parents, visiting matches in definition order.
//!
//! ```text
//! -- snippet port
//! clk : in std_logic;
//! -- endsnippet
//! -- pushcontext
//! -- snippet port
//! rst : in std_logic;
//! -- endsnippet
//! -- pasteme port+      <- pastes rst (inner scope) then clk (outer scope)
//! -- popcontext
//! ```

mod resolver;
mod table;

pub use resolver::Matches;
pub use table::{Checkpoint, Scope, ScopeId, ScopeTree};
