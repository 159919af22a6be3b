use std::path::{Component, Path, PathBuf};

use tracing::warn;


/// The host application, consulted only to resolve a declared file
/// identifier to a location on disk.
pub trait Host {
    /// Directory that declared file identifiers are relative to.
    fn data_directory(&self) -> PathBuf;

    /// Location of `file_identifier`, with `.` components dropped so that
    /// `"a.toml"` and `"./a.toml"` resolve to the same path.
    fn resolve(&self, file_identifier: &str) -> PathBuf {
        self.data_directory()
            .join(file_identifier)
            .components()
            .filter(|component| !matches!(component, Component::CurDir))
            .collect()
    }
}

impl Host for Path {
    fn data_directory(&self) -> PathBuf {
        self.to_path_buf()
    }
}

impl Host for PathBuf {
    fn data_directory(&self) -> PathBuf {
        self.clone()
    }
}

impl Host for str {
    fn data_directory(&self) -> PathBuf {
        PathBuf::from(self)
    }
}

impl<H: Host + ?Sized> Host for &H {
    fn data_directory(&self) -> PathBuf {
        (**self).data_directory()
    }
}


/// A data directory that is canonicalized when it already exists,
/// so every binding created from it reports the same absolute paths.
#[derive(Debug, Clone)]
pub struct DataDirectory {
    base_data_directory_path: PathBuf,
}

impl DataDirectory {
    pub fn new<P: Into<PathBuf>>(base_data_directory_path: P) -> Self {
        let base_data_directory_path = base_data_directory_path.into();

        let base_data_directory_path = if base_data_directory_path.is_dir() {
            match dunce::canonicalize(&base_data_directory_path) {
                Ok(canonical_path) => canonical_path,
                Err(error) => {
                    warn!(
                        path = %base_data_directory_path.display(),
                        %error,
                        "Failed to canonicalize data directory, using it as given."
                    );
                    base_data_directory_path
                }
            }
        } else {
            base_data_directory_path
        };

        Self {
            base_data_directory_path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.base_data_directory_path
    }
}

impl Host for DataDirectory {
    fn data_directory(&self) -> PathBuf {
        self.base_data_directory_path.clone()
    }
}


#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn identifiers_resolve_inside_the_data_directory() {
        let host = PathBuf::from("/srv/app/data");
        assert_eq!(
            host.resolve("settings.toml"),
            PathBuf::from("/srv/app/data/settings.toml")
        );
        assert_eq!(
            "data".resolve("nested/file.toml"),
            PathBuf::from("data/nested/file.toml")
        );
    }

    #[test]
    fn current_directory_components_are_dropped() {
        let host = PathBuf::from("/srv/app/./data");
        assert_eq!(host.resolve("./settings.toml"), host.resolve("settings.toml"));
        assert_eq!(
            host.resolve("./nested/./file.toml"),
            PathBuf::from("/srv/app/data/nested/file.toml")
        );
    }

    #[test]
    fn existing_data_directory_is_canonicalized() {
        let directory = tempdir().unwrap();
        let indirect = directory.path().join("sub").join("..");
        std::fs::create_dir_all(directory.path().join("sub")).unwrap();

        let data_directory = DataDirectory::new(&indirect);
        assert_eq!(
            data_directory.path(),
            dunce::canonicalize(directory.path()).unwrap()
        );
    }

    #[test]
    fn missing_data_directory_is_kept_as_given() {
        let data_directory = DataDirectory::new("does/not/exist");
        assert_eq!(data_directory.path(), Path::new("does/not/exist"));
    }
}
