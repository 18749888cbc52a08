//! Command line interface for taskboard
//!
//! Argument parsing, forest file handling and command execution.

pub mod args;
pub mod commands;
pub mod forest;

pub use args::{Args, Commands, MutationTarget};
pub use commands::{execute, render_list, render_tree};
pub use forest::{FileError, ForestFile};
