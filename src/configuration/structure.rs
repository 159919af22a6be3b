use std::path::{Path, PathBuf};

use config_keeper::{config_bindings, shared, Synchronizer};
use miette::{miette, Context, Result};

pub use self::base_paths::BasePathsConfiguration;
use self::base_paths::UnresolvedBasePathsConfiguration;
pub use self::logging::LoggingConfiguration;
use self::logging::UnresolvedLoggingConfiguration;
use super::traits::ResolvableConfiguration;

mod base_paths;
mod logging;


/// Name of the binary's own settings file inside the data directory.
pub const SETTINGS_FILE_NAME: &str = "keeper.toml";


/// Raw settings, bound to `keeper.toml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeeperSettings {
    pub console_output_level_filter: String,

    pub log_file_output_level_filter: String,

    /// May contain the `{DATA_DIRECTORY}` placeholder.
    pub log_file_output_directory: String,
}

config_bindings! {
    KeeperSettings in "keeper.toml" {
        console_output_level_filter: "logging.console_output_level_filter",
        log_file_output_level_filter: "logging.log_file_output_level_filter",
        log_file_output_directory: "logging.log_file_output_directory",
    }
}

impl Default for KeeperSettings {
    fn default() -> Self {
        Self {
            console_output_level_filter: "info".to_string(),
            log_file_output_level_filter: "debug".to_string(),
            log_file_output_directory: "{DATA_DIRECTORY}/logs".to_string(),
        }
    }
}


/// The entire, validated configuration.
#[derive(Debug, Clone)]
pub struct Configuration {
    /// This is the settings file this `Configuration` instance was loaded from.
    pub file_path: PathBuf,

    /// Base paths
    pub base_paths: BasePathsConfiguration,

    /// Logging-related configuration.
    pub logging: LoggingConfiguration,
}


impl ResolvableConfiguration<(PathBuf, BasePathsConfiguration)> for KeeperSettings {
    type Resolved = Configuration;

    fn resolve(self, context: (PathBuf, BasePathsConfiguration)) -> Result<Self::Resolved> {
        let (file_path, base_paths) = context;

        let logging = UnresolvedLoggingConfiguration {
            console_output_level_filter: self.console_output_level_filter,
            log_file_output_level_filter: self.log_file_output_level_filter,
            log_file_output_directory: self.log_file_output_directory,
        }
        .resolve(base_paths.clone())
        .wrap_err("Failed to resolve logging settings.")?;

        Ok(Configuration {
            file_path,
            base_paths,
            logging,
        })
    }
}


impl Configuration {
    /// Load (and seed, if missing) the settings file inside `data_directory_path`.
    ///
    /// Values already present in the file are never replaced by defaults.
    pub fn load_from_data_directory<P: AsRef<Path>>(data_directory_path: P) -> Result<Self> {
        let base_paths = UnresolvedBasePathsConfiguration {
            base_data_directory_path: data_directory_path.as_ref().to_path_buf(),
        }
        .resolve(())
        .wrap_err("Failed to resolve base paths.")?;


        let settings = shared(KeeperSettings::default());
        let mut synchronizer = Synchronizer::new(base_paths.data_directory());

        synchronizer
            .register_object(&settings)
            .wrap_err("Could not write default settings.")?;
        synchronizer
            .load()
            .wrap_err("Could not load settings file!")?;

        let file_path = synchronizer
            .document(SETTINGS_FILE_NAME)
            .map(|document| document.path().to_path_buf())
            .ok_or_else(|| miette!("Settings were not registered with the synchronizer."))?;


        let unresolved_settings = settings.read().clone();
        unresolved_settings
            .resolve((file_path, base_paths))
            .wrap_err("Failed to resolve configuration.")
    }
}
