pub mod tree;
pub mod order;
pub mod debug;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "depsort")]
#[command(about = "Source dependency trees and dependency-aware run ordering")]
#[command(version)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build and print the dependency tree of a file
    Tree {
        /// Entry file
        entry: PathBuf,

        /// Maximum reference depth (overrides depsort.toml)
        #[arg(long)]
        max_depth: Option<usize>,

        /// Print the flattened pre-order list instead of the tree
        #[arg(long)]
        flat: bool,
    },

    /// Print configured units in dependency-aware run order
    Order {
        /// Path to depsort.toml (default: search upward from the current directory)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the order as a JSON array
        #[arg(long)]
        json: bool,

        /// Also print which units reach which
        #[arg(long)]
        explain: bool,
    },

    /// Inspect internal state
    Debug {
        /// What to inspect
        #[command(subcommand)]
        what: DebugCommands,
    },
}

#[derive(Subcommand)]
pub enum DebugCommands {
    /// Dump parsed depsort.toml config
    Config,
    /// Show every unit's dependency tree
    Units,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Commands::Tree { entry, max_depth, flat } => tree::run(entry, max_depth, flat).await,
            Commands::Order { config, json, explain } => order::run(config, json, explain).await,
            Commands::Debug { what } => debug::run(what).await,
        }
    }
}
