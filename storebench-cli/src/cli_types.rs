//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "storebench")]
#[command(
    about = "Compare a raw-SQL and a query-builder SQLite layer",
    long_about = None
)]
pub(crate) struct Cli {
    /// Directory holding direct.db and managed.db
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Store(s) to run data commands against
    #[arg(long, global = true, value_enum, default_value_t = LayerArg::Both)]
    pub layer: LayerArg,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum LayerArg {
    Direct,
    Managed,
    Both,
}

impl LayerArg {
    pub(crate) fn includes_direct(self) -> bool {
        matches!(self, LayerArg::Direct | LayerArg::Both)
    }

    pub(crate) fn includes_managed(self) -> bool {
        matches!(self, LayerArg::Managed | LayerArg::Both)
    }
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Time the benchmark sequence on both layers
    Bench {
        /// Products generated per insert benchmark
        #[arg(long)]
        size: Option<usize>,

        /// Number of full sequences to run
        #[arg(long)]
        rounds: Option<usize>,

        /// Seed for reproducible datasets
        #[arg(long)]
        seed: Option<u64>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show row counts
    Stats,

    /// Delete all rows and restore the sample categories
    Reset,

    /// Insert synthetic products into the first category
    Seed {
        /// Number of products
        #[arg(long, default_value_t = 100)]
        count: usize,

        /// Seed for reproducible data
        #[arg(long)]
        seed: Option<u64>,
    },

    /// List categories
    Categories,

    /// Create a category
    AddCategory {
        name: String,

        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a category and its products
    DeleteCategory { id: i64 },

    /// List products
    Products {
        /// Only products in this category
        #[arg(long, conflicts_with_all = ["search", "joined"])]
        category: Option<i64>,

        /// Only products whose name contains this text
        #[arg(long, conflicts_with = "joined")]
        search: Option<String>,

        /// Include the category name
        #[arg(long)]
        joined: bool,
    },

    /// Create a product
    AddProduct {
        name: String,

        #[arg(long)]
        price: f64,

        /// Category id
        #[arg(long)]
        category: i64,

        #[arg(long, default_value_t = 0)]
        stock: i64,
    },

    /// Delete a product
    DeleteProduct { id: i64 },

    /// Total stock per category
    Stock,

    /// Subscribe to the managed product list while inserting products
    Watch {
        /// Synthetic inserts to perform
        #[arg(long, default_value_t = 5)]
        inserts: usize,
    },

    /// Manage the settings file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show effective settings and where they come from
    Show,

    /// Print the settings file path
    Path,

    /// Write a settings file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
