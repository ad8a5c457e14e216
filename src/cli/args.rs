//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Hierarchical budget allocation: percentage and absolute edits propagated through a tree of line items
#[derive(Parser, Debug)]
#[command(name = "budgetree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Tree document (.json or .toml); default: configured data_file, else the sample tree
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the recomputed table with variance and grand total
    Show,

    /// Show the recomputed tree
    Tree,

    /// Scale a line item by a percentage, then show the table
    Pct {
        /// Line item id
        id: String,
        /// Percentage, e.g. 10 or -5.5
        #[arg(allow_hyphen_values = true)]
        input: String,
    },

    /// Set a line item to an absolute value, then show the table
    Val {
        /// Line item id
        id: String,
        /// Target value
        #[arg(allow_hyphen_values = true)]
        input: String,
    },

    /// Edit interactively (reads commands from stdin)
    Session,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config instead of ./.budgetree.toml
        #[arg(short, long)]
        global: bool,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show config paths
    Path,
}
