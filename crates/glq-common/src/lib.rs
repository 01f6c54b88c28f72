#![allow(clippy::needless_return, clippy::collapsible_if, clippy::collapsible_else_if,
         clippy::manual_range_contains, clippy::single_match, clippy::comparison_chain,
         clippy::float_cmp, clippy::needless_range_loop, clippy::new_without_default)]

// Engine-common services shared by the platform layer: console printing,
// command line, console commands and console variables.

pub mod q_shared;
pub mod common;
pub mod cmd;
pub mod cvar;
