//! CLI argument definitions for mindgraph.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Mindgraph - knowledge-graph visualization from the command line.
///
/// Generate a concept graph for a topic, render it with a named theme and
/// layout, and export snapshots or self-contained bundles.
#[derive(Parser, Debug)]
#[command(name = "mg")]
#[command(author, version, about = "Knowledge-graph visualization toolkit", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a concept graph for a topic and cache it
    Generate {
        /// Topic to generate a graph for
        topic: String,

        /// Use the built-in offline source instead of the API
        #[arg(long)]
        offline: bool,

        /// Bypass the cache for this generation
        #[arg(long)]
        no_cache: bool,
    },

    /// Render a graph file through the style/layout/reveal pipeline and
    /// write an SVG snapshot
    Render {
        /// Path to a graph JSON file
        input: PathBuf,

        /// Theme name (unknown names fall back to `default`)
        #[arg(long)]
        theme: Option<String>,

        /// Layout name (unknown names fall back to `force`)
        #[arg(long)]
        layout: Option<String>,

        /// Background name (unknown names fall back to `snow`)
        #[arg(long)]
        background: Option<String>,

        /// Output path (defaults to the input path with .svg)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export a self-contained offline bundle (.tar.gz)
    Bundle {
        /// Path to a graph JSON file
        input: PathBuf,

        /// Topic name recorded in the bundle (defaults to the file stem)
        #[arg(long)]
        topic: Option<String>,

        /// Theme name used for the embedded snapshot
        #[arg(long)]
        theme: Option<String>,

        /// Layout name used for the embedded snapshot
        #[arg(long)]
        layout: Option<String>,

        /// Output path (defaults to the input path with .tar.gz)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the available themes
    Themes,

    /// List the available layouts
    Layouts,

    /// Cache maintenance commands
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Print the cache location
    Path,

    /// Delete all cached graphs and narrations
    Clear,
}
