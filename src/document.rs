use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use toml::{Table, Value};
use tracing::trace;

use crate::error::DocumentError;


/// One TOML document on disk, addressed by dotted paths (`"server.port"`).
///
/// The binding never touches the disk on its own: call [`load`][Self::load]
/// to read the file and [`save`][Self::save] to persist it.
#[derive(Debug, Clone)]
pub struct ConfigDocument {
    file_path: PathBuf,
    table: Table,
}

impl ConfigDocument {
    /// Create an empty binding for `file_path`.
    pub fn open<P: Into<PathBuf>>(file_path: P) -> Self {
        Self {
            file_path: file_path.into(),
            table: Table::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Re-read the document from disk, discarding unsaved changes.
    ///
    /// A file that does not exist yet is treated as an empty document.
    pub fn load(&mut self) -> Result<(), DocumentError> {
        let contents = match fs::read_to_string(&self.file_path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                trace!(
                    file_path = %self.file_path.display(),
                    "Configuration file does not exist yet, starting empty."
                );

                self.table = Table::new();
                return Ok(());
            }
            Err(source) => {
                return Err(DocumentError::Io {
                    path: self.file_path.clone(),
                    source,
                })
            }
        };

        self.table = toml::from_str::<Table>(&contents).map_err(|source| DocumentError::Parse {
            path: self.file_path.clone(),
            source,
        })?;

        Ok(())
    }

    /// Persist the document, creating the file and its parent directories if needed.
    pub fn save(&self) -> Result<(), DocumentError> {
        let serialized =
            toml::to_string_pretty(&self.table).map_err(|source| DocumentError::Serialize {
                path: self.file_path.clone(),
                source,
            })?;

        if let Some(parent_directory) = self.file_path.parent() {
            if !parent_directory.as_os_str().is_empty() {
                fs::create_dir_all(parent_directory).map_err(|source| DocumentError::Io {
                    path: self.file_path.clone(),
                    source,
                })?;
            }
        }

        fs::write(&self.file_path, serialized).map_err(|source| DocumentError::Io {
            path: self.file_path.clone(),
            source,
        })
    }

    /// Value stored at `path`, or `None` if nothing is stored there
    /// (including when the path itself is malformed).
    pub fn get(&self, path: &str) -> Option<&Value> {
        let segments = split_path(path).ok()?;
        let (last_segment, parent_segments) = segments.split_last()?;

        let mut table = &self.table;
        for segment in parent_segments {
            table = table.get(*segment)?.as_table()?;
        }

        table.get(*last_segment)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Store `value` at `path`, overwriting whatever was there.
    ///
    /// Missing intermediate tables are created; an intermediate
    /// non-table value is replaced by a table.
    pub fn set(&mut self, path: &str, value: Value) -> Result<(), DocumentError> {
        let segments = split_path(path)?;
        let Some((last_segment, parent_segments)) = segments.split_last() else {
            return Err(invalid_path(path, "path is empty"));
        };

        let mut table = &mut self.table;
        for segment in parent_segments {
            let entry = table
                .entry(segment.to_string())
                .or_insert(Value::Table(Table::new()));

            if !entry.is_table() {
                *entry = Value::Table(Table::new());
            }

            let Value::Table(nested_table) = entry else {
                unreachable!("intermediate value was just replaced by a table");
            };
            table = nested_table;
        }

        table.insert(last_segment.to_string(), value);
        Ok(())
    }
}


/// Split a dotted path into its segments, rejecting empty ones.
pub(crate) fn split_path(path: &str) -> Result<Vec<&str>, DocumentError> {
    if path.is_empty() {
        return Err(invalid_path(path, "path is empty"));
    }

    let segments = path.split('.').collect::<Vec<_>>();
    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(invalid_path(path, "path contains an empty segment"));
    }

    Ok(segments)
}

fn invalid_path(path: &str, reason: &'static str) -> DocumentError {
    DocumentError::InvalidPath {
        path: path.to_string(),
        reason,
    }
}
