use std::{collections::HashMap, path::PathBuf};

use config_keeper::DataDirectory;
use miette::{miette, Context, IntoDiagnostic, Result};

use crate::configuration::traits::ResolvableConfiguration;


pub(super) struct UnresolvedBasePathsConfiguration {
    pub(super) base_data_directory_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct BasePathsConfiguration {
    pub base_data_directory_path: PathBuf,
}

impl ResolvableConfiguration for UnresolvedBasePathsConfiguration {
    type Resolved = BasePathsConfiguration;

    fn resolve(self, _context: ()) -> Result<Self::Resolved> {
        let base_data_directory_path = self.base_data_directory_path;

        if base_data_directory_path.exists() && !base_data_directory_path.is_dir() {
            return Err(miette!(
                "Data directory path {} exists, but is not a directory!",
                base_data_directory_path.display()
            ));
        }

        if !base_data_directory_path.is_dir() {
            std::fs::create_dir_all(&base_data_directory_path)
                .into_diagnostic()
                .wrap_err("Failed to create missing data directory.")?;
        }


        let base_data_directory_path = dunce::canonicalize(base_data_directory_path)
            .into_diagnostic()
            .wrap_err("Failed to canonicalize data directory path.")?;


        Ok(BasePathsConfiguration {
            base_data_directory_path,
        })
    }
}


impl BasePathsConfiguration {
    pub fn placeholders_map(&self) -> HashMap<&'static str, String> {
        let mut placeholders_map = HashMap::with_capacity(1);

        placeholders_map.insert(
            "{DATA_DIRECTORY}",
            self.base_data_directory_path.to_string_lossy().to_string(),
        );

        placeholders_map
    }

    /// The data directory as a host for configuration file bindings.
    pub fn data_directory(&self) -> DataDirectory {
        DataDirectory::new(&self.base_data_directory_path)
    }
}


#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn missing_directory_is_created() {
        let directory = tempdir().unwrap();
        let data_directory = directory.path().join("a/b");

        let resolved = UnresolvedBasePathsConfiguration {
            base_data_directory_path: data_directory.clone(),
        }
        .resolve(())
        .unwrap();

        assert!(data_directory.is_dir());
        assert!(resolved.base_data_directory_path.is_absolute());
    }

    #[test]
    fn file_in_place_of_directory_is_rejected() {
        let directory = tempdir().unwrap();
        let file_path = directory.path().join("data");
        std::fs::write(&file_path, "").unwrap();

        let result = UnresolvedBasePathsConfiguration {
            base_data_directory_path: file_path,
        }
        .resolve(());

        assert!(result.is_err());
    }
}
