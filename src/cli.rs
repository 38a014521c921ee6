//! Command-line arguments.
//!
//! The process runs one hunt to completion; the flags only tune where
//! configuration comes from and how loudly it logs.

use clap::Parser;
use std::path::PathBuf;

/// Reservator - keeps asking OCI for an Ampere A1 instance until capacity frees up
#[derive(Parser, Debug)]
#[command(name = "reservator")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Log file path (defaults to the local data directory)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}
