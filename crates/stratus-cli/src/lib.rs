//! Stratus CLI library
//!
//! This module contains the core CLI logic for the Stratus template tool.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Command};

use std::{
    fs,
    io::{self, Write},
};

use log::info;

use stratus::{Schema, Stratus, StratusError};

/// Run the Stratus CLI application
///
/// This function loads the configuration and schema, then runs the
/// selected subcommand.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `StratusError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Schema documents that fail to parse or compile
/// - Template documents that fail to import
/// - Templates with invalid references
pub fn run(args: &Args) -> Result<(), StratusError> {
    info!(schema_path = args.schema; "Processing schema");

    let app_config = config::load_config(args.config.as_ref())?;
    let stratus = Stratus::new(app_config);
    let schema = stratus.load_schema(&args.schema)?;

    match &args.command {
        Command::Types { abbreviations } => {
            write_stdout(&types_listing(&schema, *abbreviations))?;
        }
        Command::Check { template } => {
            let template = stratus.load_template(schema, template)?;
            let report = stratus.validate(&template);
            if !report.is_clean() {
                return Err(StratusError::InvalidReferences(report.violations().to_vec()));
            }
            info!(resources = template.resources().count(); "Template references are valid");
        }
        Command::Render { template, output } => {
            let template = stratus.load_template(schema, template)?;
            let mut json = stratus.render(&template)?;
            json.push('\n');
            match output {
                Some(path) => {
                    fs::write(path, json)?;
                    info!(output_file = path; "Template exported successfully");
                }
                None => write_stdout(&json)?,
            }
        }
    }

    Ok(())
}

/// Lists the resource types of `schema`, one per line, in declaration order.
///
/// With `abbreviations`, each line also carries the short forms that
/// resolve to the type.
pub fn types_listing(schema: &Schema, abbreviations: bool) -> String {
    let mut listing = String::new();
    for type_name in schema.resource_types() {
        let name = type_name.as_string();
        listing.push_str(&name);
        if abbreviations {
            let shorts: Vec<&str> = schema
                .abbreviations_of(type_name)
                .into_iter()
                .filter(|short| *short != name)
                .collect();
            if !shorts.is_empty() {
                listing.push_str(" (");
                listing.push_str(&shorts.join(", "));
                listing.push(')');
            }
        }
        listing.push('\n');
    }
    listing
}

fn write_stdout(text: &str) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()
}
