//! Emission engine: renders snippets to text
//!
//! Rendering walks a snippet line by line against an active scope. Pastes
//! resolve against whatever scope is active when they are reached, and
//! context switches change the active scope for the rest of the walk.

mod emit;

pub use emit::{render, RenderContext};
