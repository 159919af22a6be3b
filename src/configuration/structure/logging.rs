use std::path::PathBuf;

use miette::{miette, Context, IntoDiagnostic, Result};
use tracing_subscriber::EnvFilter;

use super::base_paths::BasePathsConfiguration;
use crate::configuration::{
    traits::ResolvableConfiguration,
    utilities::replace_placeholders_in_path,
};


pub(super) struct UnresolvedLoggingConfiguration {
    pub(super) console_output_level_filter: String,

    pub(super) log_file_output_level_filter: String,

    pub(super) log_file_output_directory: String,
}

#[derive(Clone, Debug)]
pub struct LoggingConfiguration {
    pub console_output_level_filter: String,

    pub log_file_output_level_filter: String,

    pub log_file_output_directory: PathBuf,
}

impl ResolvableConfiguration<BasePathsConfiguration> for UnresolvedLoggingConfiguration {
    type Resolved = LoggingConfiguration;

    fn resolve(self, context: BasePathsConfiguration) -> Result<Self::Resolved> {
        parse_level_filter(
            "console_output_level_filter",
            &self.console_output_level_filter,
        )?;
        parse_level_filter(
            "log_file_output_level_filter",
            &self.log_file_output_level_filter,
        )?;

        let log_file_output_directory = replace_placeholders_in_path(
            self.log_file_output_directory,
            context.placeholders_map(),
        );


        Ok(Self::Resolved {
            console_output_level_filter: self.console_output_level_filter,
            log_file_output_level_filter: self.log_file_output_level_filter,
            log_file_output_directory,
        })
    }
}

fn parse_level_filter(setting_name: &str, directives: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directives)
        .into_diagnostic()
        .wrap_err_with(|| {
            miette!(
                "Failed to parse setting {}: \"{}\" is not a valid level filter.",
                setting_name,
                directives
            )
        })
}

impl LoggingConfiguration {
    /// `EnvFilter` is not `Clone`, so a fresh filter is parsed on every call.
    pub fn console_output_level_filter(&self) -> Result<EnvFilter> {
        parse_level_filter(
            "console_output_level_filter",
            &self.console_output_level_filter,
        )
    }

    pub fn log_file_output_level_filter(&self) -> Result<EnvFilter> {
        parse_level_filter(
            "log_file_output_level_filter",
            &self.log_file_output_level_filter,
        )
    }
}
