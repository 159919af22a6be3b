//! Command-line interface definitions for the `config-keeper` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use config_keeper::Value;
use toml::Table;



/// Command-line arguments.
#[derive(Parser)]
#[command(
    name = "config-keeper",
    author,
    about = "Inspect and edit configuration files kept in sync with bound objects.",
    version
)]
pub struct CLIArgs {
    /// This is the directory all configuration files live in.
    /// If unspecified, this defaults to `./data`.
    #[arg(
        short = 'd',
        long = "data-directory",
        help = "Directory holding the configuration files. Defaults to ./data"
    )]
    pub data_directory: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the value stored at a dotted path.
    Get {
        #[arg(help = "Configuration file, relative to the data directory (e.g. settings.toml).")]
        file: String,

        #[arg(help = "Dotted path inside the file (e.g. server.port).")]
        path: String,
    },

    /// Store a value at a dotted path and save the file.
    Set {
        #[arg(help = "Configuration file, relative to the data directory (e.g. settings.toml).")]
        file: String,

        #[arg(help = "Dotted path inside the file (e.g. server.port).")]
        path: String,

        #[arg(
            help = "New value as a TOML literal (42, true, 1.5, \"text\", [1, 2]). \
                    Anything that is not valid TOML is stored as a plain string."
        )]
        value: String,
    },

    /// Print a whole configuration file.
    Show {
        #[arg(help = "Configuration file, relative to the data directory (e.g. settings.toml).")]
        file: String,
    },
}


/// Parse a command-line value as a TOML literal, falling back to a plain string.
pub fn parse_value_literal(input: &str) -> Value {
    let wrapped = format!("value = {input}");

    match toml::from_str::<Table>(&wrapped) {
        // Input like `1\nother = 2` parses, but is not a single literal.
        Ok(mut table) if table.len() == 1 => table
            .remove("value")
            .unwrap_or_else(|| Value::String(input.to_string())),
        _ => Value::String(input.to_string()),
    }
}
