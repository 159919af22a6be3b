use clap::Parser;
use config_keeper::{ConfigDocument, Host};
use miette::{miette, Context, Result};
use tracing::info;

use crate::{
    cli::{parse_value_literal, CLIArgs, Command},
    configuration::{get_default_data_directory_path, Configuration},
    logging::initialize_tracing,
};

mod cli;
mod configuration;
mod logging;


const LOG_FILE_NAME_PREFIX: &str = "config-keeper.log";


fn open_document(configuration: &Configuration, file: &str) -> Result<ConfigDocument> {
    let file_path = configuration.base_paths.data_directory().resolve(file);

    let mut document = ConfigDocument::open(file_path);
    document
        .load()
        .wrap_err_with(|| miette!("Failed to load configuration file {}.", file))?;

    Ok(document)
}


fn main() -> Result<()> {
    let cli_args = CLIArgs::parse();

    // Load (or create) the binary's own settings.
    let data_directory_path = match cli_args.data_directory.clone() {
        Some(path) => path,
        None => get_default_data_directory_path()?,
    };

    let configuration = Configuration::load_from_data_directory(&data_directory_path)
        .wrap_err("Failed to load settings.")?;


    let logging_raii_guard = initialize_tracing(
        configuration.logging.console_output_level_filter()?,
        configuration.logging.log_file_output_level_filter()?,
        &configuration.logging.log_file_output_directory,
        LOG_FILE_NAME_PREFIX,
    )
    .wrap_err("Failed to initialize tracing.")?;

    info!(
        settings_file = %configuration.file_path.display(),
        "Tracing initialized."
    );


    match cli_args.command {
        Command::Get { file, path } => {
            let document = open_document(&configuration, &file)?;

            let value = document
                .get(&path)
                .ok_or_else(|| miette!("Nothing is stored at {} in {}.", path, file))?;
            println!("{value}");
        }
        Command::Set { file, path, value } => {
            let mut document = open_document(&configuration, &file)?;
            let value = parse_value_literal(&value);

            info!(%path, %value, "Setting configuration value.");
            document.set(&path, value)?;
            document
                .save()
                .wrap_err_with(|| miette!("Failed to save configuration file {}.", file))?;
        }
        Command::Show { file } => {
            let document = open_document(&configuration, &file)?;

            let rendered = toml::to_string_pretty(document.table())
                .map_err(|error| miette!("Failed to render {}: {}", file, error))?;
            print!("{rendered}");
        }
    }


    drop(logging_raii_guard);
    Ok(())
}
