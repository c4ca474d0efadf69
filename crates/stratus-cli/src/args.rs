//! Command-line argument definitions for the Stratus CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the schema document, configuration file
//! and logging verbosity, and the subcommand to run.

use clap::{Parser, Subcommand};

/// Command-line arguments for the Stratus template tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the schema document (JSON or YAML)
    #[arg(short, long)]
    pub schema: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the resource types declared by the schema
    Types {
        /// Also list the short forms each type can be declared with
        #[arg(long)]
        abbreviations: bool,
    },

    /// Validate the references of a template document
    Check {
        /// Path to the template document
        template: String,
    },

    /// Validate a template document and write its normalized JSON form
    Render {
        /// Path to the template document
        template: String,

        /// Output file; standard output when omitted
        #[arg(short, long)]
        output: Option<String>,
    },
}
