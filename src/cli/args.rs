//! Command line argument parsing
//!
//! Subcommands work on a JSON forest file:
//! - `show`: Print the hierarchy as an indented tree
//! - `list`: Print the filtered flat list, most recently updated first
//! - `check`: Report structural problems
//! - `toggle`, `remove`, `reorder`, `upsert`: Apply a local mutation and
//!   print the result, writing it back with `--write`
//! - `show-config`: Show configuration discovery information

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "taskboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inspect and edit hierarchical task forests")]
#[command(long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by the mutating commands
#[derive(Debug, Clone, ClapArgs)]
pub struct MutationTarget {
    /// Forest file (JSON array of tasks)
    pub file: PathBuf,
    /// Write the resulting forest back to the file
    #[arg(long = "write")]
    pub write: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the hierarchy as an indented tree
    Show {
        file: PathBuf,
        /// Only roots belonging to this widget
        #[arg(short = 'w', long = "widget")]
        widget: Option<String>,
    },
    /// Print matching tasks as a flat list
    List {
        file: PathBuf,
        #[arg(short = 'w', long = "widget")]
        widget: Option<String>,
        #[arg(long = "category")]
        category: Option<String>,
        /// Only completed (true) or open (false) tasks
        #[arg(long = "completed")]
        completed: Option<bool>,
        /// Case-insensitive substring of text, category or description
        #[arg(short = 's', long = "search")]
        search: Option<String>,
    },
    /// Report duplicate ids, misplaced children and unsorted siblings
    Check { file: PathBuf },
    /// Flip a task's completed flag
    Toggle {
        #[command(flatten)]
        target: MutationTarget,
        id: String,
    },
    /// Remove a task and its whole subtree
    Remove {
        #[command(flatten)]
        target: MutationTarget,
        id: String,
    },
    /// Move a task to a new position, optionally under a new parent
    Reorder {
        #[command(flatten)]
        target: MutationTarget,
        id: String,
        #[arg(short = 'o', long = "order")]
        order: i32,
        #[arg(short = 'p', long = "parent")]
        parent: Option<i64>,
    },
    /// Insert or replace a task given as wire-form JSON
    Upsert {
        #[command(flatten)]
        target: MutationTarget,
        /// Task JSON, e.g. '{"id":"11","text":"..","category":"..","createdAt":"..","updatedAt":".."}'
        task: String,
    },
    /// Show configuration discovery information
    ShowConfig,
}

impl Args {
    pub fn parse() -> Self {
        Parser::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reorder_command() {
        let args = Args::try_parse_from([
            "taskboard", "reorder", "tasks.json", "11", "--order", "5", "--parent", "123", "--write",
        ])
        .unwrap();

        match args.command {
            Commands::Reorder {
                target,
                id,
                order,
                parent,
            } => {
                assert_eq!(target.file, PathBuf::from("tasks.json"));
                assert!(target.write);
                assert_eq!(id, "11");
                assert_eq!(order, 5);
                assert_eq!(parent, Some(123));
            }
            other => panic!("Expected Reorder, got {:?}", other),
        }
    }

    #[test]
    fn test_list_filters() {
        let args = Args::try_parse_from([
            "taskboard", "list", "tasks.json", "--widget", "w1", "--completed", "false", "-s", "milk",
        ])
        .unwrap();

        match args.command {
            Commands::List {
                widget,
                completed,
                search,
                category,
                ..
            } => {
                assert_eq!(widget.as_deref(), Some("w1"));
                assert_eq!(completed, Some(false));
                assert_eq!(search.as_deref(), Some("milk"));
                assert!(category.is_none());
            }
            other => panic!("Expected List, got {:?}", other),
        }
    }

    #[test]
    fn test_global_config_flag() {
        let args =
            Args::try_parse_from(["taskboard", "check", "tasks.json", "-c", "board.toml"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("board.toml")));
        assert!(matches!(args.command, Commands::Check { .. }));
    }
}
