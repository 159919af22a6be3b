use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;


/// Failures of the backing document itself.
#[derive(Debug, Error, Diagnostic)]
pub enum DocumentError {
    /// The file could not be read, written, or its parent directory created.
    #[error("I/O error accessing configuration file at {}", .path.display())]
    #[diagnostic(code(config_keeper::document::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but is not a valid TOML document.
    #[error("failed to parse configuration file at {}", .path.display())]
    #[diagnostic(
        code(config_keeper::document::parse),
        help("fix or remove the file; a missing file is recreated from defaults")
    )]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The in-memory document could not be rendered as TOML.
    #[error("failed to serialize configuration file at {}", .path.display())]
    #[diagnostic(code(config_keeper::document::serialize))]
    Serialize {
        path: PathBuf,
        #[source]
        source: toml::ser::Error,
    },

    /// A dotted path with no segments or an empty segment (`"a..b"`).
    #[error("invalid configuration path \"{path}\": {reason}")]
    #[diagnostic(code(config_keeper::document::invalid_path))]
    InvalidPath { path: String, reason: &'static str },
}


/// Failures reading or writing a single bound field.
#[derive(Debug, Error, Diagnostic)]
pub enum AccessError {
    #[error("field value cannot be represented as a configuration value")]
    #[diagnostic(code(config_keeper::field::read))]
    Read(#[source] toml::ser::Error),

    #[error("configuration value does not fit the field")]
    #[diagnostic(
        code(config_keeper::field::write),
        help("check the type of the value stored in the configuration file")
    )]
    Write(#[source] toml::de::Error),

    #[error("type declares no field at index {0}")]
    #[diagnostic(code(config_keeper::field::unknown))]
    UnknownField(usize),
}


/// One failure inside a batch operation, identifying what it happened to.
#[derive(Debug, Error, Diagnostic)]
pub enum SyncFailure {
    /// Loading or saving a whole document failed; the object's pass was skipped
    /// or not persisted.
    #[error("configuration file {} of {object} could not be synchronized", .file.display())]
    Document {
        object: &'static str,
        file: PathBuf,
        #[source]
        #[diagnostic_source]
        source: DocumentError,
    },

    /// A single field could not be read or assigned.
    #[error("field bound to \"{path}\" on {object} could not be synchronized")]
    Field {
        object: &'static str,
        path: String,
        #[source]
        #[diagnostic_source]
        source: AccessError,
    },

    /// A field declares a path the document cannot address.
    #[error("field on {object} declares an unusable path")]
    Path {
        object: &'static str,
        #[source]
        #[diagnostic_source]
        source: DocumentError,
    },
}


/// Every failure collected during one batch operation.
///
/// Returned only after the whole registry has been processed, so failures
/// never hide work that could still be done for other objects.
#[derive(Debug, Error, Diagnostic)]
#[error("{} configuration failure(s) during {operation}", .failures.len())]
#[diagnostic(code(config_keeper::sync))]
pub struct SyncError {
    pub operation: &'static str,

    #[related]
    pub failures: Vec<SyncFailure>,
}

impl SyncError {
    pub(crate) fn from_failures(
        operation: &'static str,
        failures: Vec<SyncFailure>,
    ) -> Result<(), Self> {
        if failures.is_empty() {
            Ok(())
        } else {
            Err(Self {
                operation,
                failures,
            })
        }
    }

    pub fn failures(&self) -> &[SyncFailure] {
        &self.failures
    }
}
