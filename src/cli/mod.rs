//! Command-line interface module.

mod args;
pub mod build;
pub mod manifest;

pub use args::{Cli, Commands};
