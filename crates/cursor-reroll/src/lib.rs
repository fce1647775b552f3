//! cursor-reroll library - exposes modules for integration tests

pub mod errors;
pub mod output;
pub mod prompt;
pub mod reset_flow;
