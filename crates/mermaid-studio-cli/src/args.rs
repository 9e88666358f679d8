//! Command-line argument definitions for the Mermaid Studio CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. A subcommand selects the operation; configuration file
//! selection and logging verbosity apply to all of them.

use clap::{Parser, Subcommand};

/// Command-line arguments for the Mermaid Studio tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,
}

/// Operations of the Mermaid Studio tool
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a diagram source file
    Check {
        /// Path to the input Mermaid file
        input: String,
    },

    /// Render a diagram and compose the export image as SVG
    Render {
        /// Path to the input Mermaid file
        input: String,

        /// Path to the output SVG file; defaults to a timestamped name
        #[arg(short, long)]
        output: Option<String>,

        /// Title drawn above the diagram; defaults to the input file name
        #[arg(short, long)]
        title: Option<String>,
    },

    /// Print a share link (or bare token) for a diagram source file
    Share {
        /// Path to the input Mermaid file
        input: String,

        /// Title carried by the link; defaults to the input file name
        #[arg(short, long)]
        title: Option<String>,

        /// Open the link in the viewer instead of the editor
        #[arg(long)]
        viewer: bool,

        /// Base URL the token is appended to as a fragment
        #[arg(long)]
        base: Option<String>,
    },

    /// Open a share link (or bare token) as the current session
    Open {
        /// Share link or token
        link: String,

        /// Write the diagram source to this file instead of stdout
        #[arg(short, long)]
        output: Option<String>,

        /// Persist the opened diagram as the stored session
        #[arg(long)]
        save: bool,

        /// Directory of the stored session; defaults to the platform data directory
        #[arg(long)]
        data_dir: Option<String>,
    },
}
