//! CLI argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "sqlscout")]
#[command(author, version, about = "Schema-aware SQL query checker")]
#[command(propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check SQL queries against a schema
    Check {
        /// SQL files to check (supports glob patterns)
        files: Vec<PathBuf>,

        /// Inline query to check
        #[arg(short = 'e', long = "query", value_name = "SQL")]
        query: Option<String>,

        /// JSON schema file
        #[arg(short, long, value_name = "FILE", env = "SQLSCOUT_SCHEMA")]
        schema: Option<PathBuf>,

        /// Configuration file (defaults to the nearest sqlscout.toml)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Diagnostic codes to ignore (e.g. W0006)
        #[arg(long, value_name = "CODE")]
        disable: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Find the join condition between two tables
    Join {
        table_a: String,
        table_b: String,

        /// JSON schema file
        #[arg(short, long, value_name = "FILE", env = "SQLSCOUT_SCHEMA")]
        schema: PathBuf,

        #[arg(short, long, default_value = "human", value_enum)]
        format: OutputFormat,
    },

    /// List tables matching keywords (all tables when none are given)
    Tables {
        keywords: Vec<String>,

        /// JSON schema file
        #[arg(short, long, value_name = "FILE", env = "SQLSCOUT_SCHEMA")]
        schema: PathBuf,

        #[arg(short, long, default_value = "human", value_enum)]
        format: OutputFormat,
    },

    /// Suggest columns of a table for the given context keywords (all columns when none are given)
    Columns {
        table: String,

        keywords: Vec<String>,

        /// JSON schema file
        #[arg(short, long, value_name = "FILE", env = "SQLSCOUT_SCHEMA")]
        schema: PathBuf,

        #[arg(short, long, default_value = "human", value_enum)]
        format: OutputFormat,
    },

    /// Show the columns and keys of one table
    Info {
        table: String,

        /// JSON schema file
        #[arg(short, long, value_name = "FILE", env = "SQLSCOUT_SCHEMA")]
        schema: PathBuf,

        #[arg(short, long, default_value = "human", value_enum)]
        format: OutputFormat,
    },

    /// Condensed per-table overview, sorted by table name
    Summary {
        /// JSON schema file
        #[arg(short, long, value_name = "FILE", env = "SQLSCOUT_SCHEMA")]
        schema: PathBuf,

        #[arg(short, long, default_value = "human", value_enum)]
        format: OutputFormat,
    },

    /// Display schema information
    Schema {
        /// JSON schema file
        file: PathBuf,
    },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable output with colors
    #[default]
    Human,
    /// JSON output
    Json,
    /// SARIF output (for GitHub Code Scanning)
    Sarif,
}
