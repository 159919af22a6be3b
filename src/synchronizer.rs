use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
    sync::Arc,
};

use tracing::{debug, info, trace, warn};

use crate::{
    binding::{ConfigBound, Shared, SharedObject},
    decoration::TextDecoration,
    document::{split_path, ConfigDocument},
    error::{SyncError, SyncFailure},
    host::Host,
};


struct RegisteredObject {
    object: SharedObject,
    document_path: PathBuf,
}

impl RegisteredObject {
    fn is(&self, object: &SharedObject) -> bool {
        // Compare data addresses only; vtable pointers of the same object may differ.
        Arc::as_ptr(&self.object) as *const () == Arc::as_ptr(object) as *const ()
    }
}


/// Registry of bound objects and the documents backing them.
///
/// Objects that declare the same file share a single [`ConfigDocument`].
///
/// Every operation processes the whole registry before returning, collecting
/// failures into one [`SyncError`] instead of stopping at the first one.
/// Operations take `&mut self`; each object is locked only while its own
/// fields are read or written, so callers must not hold a guard on a
/// registered object across a call.
pub struct Synchronizer {
    host: Box<dyn Host + Send + Sync>,
    decoration: TextDecoration,
    objects: Vec<RegisteredObject>,
    documents: HashMap<PathBuf, ConfigDocument>,
}

impl Synchronizer {
    pub fn new<H>(host: H) -> Self
    where
        H: Host + Send + Sync + 'static,
    {
        Self {
            host: Box::new(host),
            decoration: TextDecoration::default(),
            objects: Vec::new(),
            documents: HashMap::new(),
        }
    }

    /// Use a different string decoration than `&` / `§`.
    pub fn with_decoration(mut self, decoration: TextDecoration) -> Self {
        self.decoration = decoration;
        self
    }

    pub fn decoration(&self) -> TextDecoration {
        self.decoration
    }

    /// Number of registered objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// In-memory state of the document backing `file_identifier`,
    /// if any registered object declared it.
    pub fn document(&self, file_identifier: &str) -> Option<&ConfigDocument> {
        self.documents.get(&self.host.resolve(file_identifier))
    }

    /// Register objects, then seed defaults for the whole registry
    /// without replacing values that are already persisted.
    ///
    /// Objects whose type declares no configuration file are skipped.
    /// Registering an already registered object does not add it twice.
    pub fn register<I>(&mut self, objects: I) -> Result<&mut Self, SyncError>
    where
        I: IntoIterator<Item = SharedObject>,
    {
        for object in objects {
            let (type_name, config_file) = {
                let object = object.read();
                (object.type_name(), object.config_file())
            };

            let Some(config_file) = config_file else {
                debug!(
                    object = type_name,
                    "Object declares no configuration file, not registering."
                );
                continue;
            };

            let document_path = self.host.resolve(config_file);
            self.documents
                .entry(document_path.clone())
                .or_insert_with(|| ConfigDocument::open(&document_path));

            if self.objects.iter().any(|registered| registered.is(&object)) {
                trace!(object = type_name, "Object is already registered.");
                continue;
            }

            debug!(
                object = type_name,
                file_path = %document_path.display(),
                "Registered object."
            );

            self.objects.push(RegisteredObject {
                object,
                document_path,
            });
        }

        let failures = self.seed_all(false);
        info!(
            objects = self.objects.len(),
            failures = failures.len(),
            "Seeded configuration defaults."
        );

        SyncError::from_failures("register", failures)?;
        Ok(self)
    }

    /// Typed convenience for registering a single [`Shared`] object.
    pub fn register_object<T: ConfigBound>(
        &mut self,
        object: &Shared<T>,
    ) -> Result<&mut Self, SyncError> {
        let object: SharedObject = object.clone();
        self.register([object])
    }

    /// Assign every persisted value to its field. Fields whose path holds
    /// no value keep their current in-memory value.
    ///
    /// Each document is re-read from disk first, so edits made to the file
    /// are picked up.
    pub fn load(&mut self) -> Result<&mut Self, SyncError> {
        let failures = self.load_all();
        info!(
            objects = self.objects.len(),
            failures = failures.len(),
            "Loaded configuration values."
        );

        SyncError::from_failures("load", failures)?;
        Ok(self)
    }

    /// Write every in-memory value back, replacing what is persisted.
    pub fn save(&mut self) -> Result<&mut Self, SyncError> {
        let failures = self.seed_all(true);
        info!(
            objects = self.objects.len(),
            failures = failures.len(),
            "Saved configuration values."
        );

        SyncError::from_failures("save", failures)?;
        Ok(self)
    }

    /// [`save`][Self::save] followed by [`load`][Self::load].
    ///
    /// The load runs even when the save reported failures; the returned error
    /// lists the failures of both.
    pub fn reload(&mut self) -> Result<&mut Self, SyncError> {
        let mut failures = self.seed_all(true);
        failures.extend(self.load_all());
        info!(
            objects = self.objects.len(),
            failures = failures.len(),
            "Reloaded configuration."
        );

        SyncError::from_failures("reload", failures)?;
        Ok(self)
    }

    fn seed_all(&mut self, override_existing: bool) -> Vec<SyncFailure> {
        let mut failures = Vec::new();

        for registered in &self.objects {
            let document = self
                .documents
                .entry(registered.document_path.clone())
                .or_insert_with(|| ConfigDocument::open(&registered.document_path));

            seed(
                registered,
                document,
                self.decoration,
                override_existing,
                &mut failures,
            );
        }

        failures
    }

    /// Each document is read from disk once per pass; a document that failed
    /// to load is retried for the next object sharing it, so every object
    /// gets its own failure.
    fn load_all(&mut self) -> Vec<SyncFailure> {
        let mut failures = Vec::new();
        let mut refreshed = HashSet::new();

        for registered in &self.objects {
            let document = self
                .documents
                .entry(registered.document_path.clone())
                .or_insert_with(|| ConfigDocument::open(&registered.document_path));

            if !refreshed.contains(&registered.document_path) {
                if let Err(source) = document.load() {
                    let object_name = registered.object.read().type_name();
                    report(
                        &mut failures,
                        document_failure(object_name, document.path(), source),
                    );
                    continue;
                }

                refreshed.insert(registered.document_path.clone());
            }

            load_into(registered, document, self.decoration, &mut failures);
        }

        failures
    }
}


/// Write the object's fields into its document and persist it.
///
/// Without `override_existing`, paths that already hold a value are left alone.
fn seed(
    registered: &RegisteredObject,
    document: &mut ConfigDocument,
    decoration: TextDecoration,
    override_existing: bool,
    failures: &mut Vec<SyncFailure>,
) {
    let object = registered.object.read();
    let object_name = object.type_name();

    if let Err(source) = document.load() {
        report(
            failures,
            document_failure(object_name, document.path(), source),
        );
        return;
    }

    for (index, path) in object.field_paths().into_iter().enumerate() {
        if let Err(source) = split_path(path) {
            report(
                failures,
                SyncFailure::Path {
                    object: object_name,
                    source,
                },
            );
            continue;
        }

        let value = match object.read_field(index) {
            Ok(value) => decoration.undecorate_value(value),
            Err(source) => {
                report(
                    failures,
                    SyncFailure::Field {
                        object: object_name,
                        path: path.to_string(),
                        source,
                    },
                );
                continue;
            }
        };

        if !override_existing && document.contains(path) {
            trace!(path, "Keeping persisted configuration value.");
            continue;
        }

        debug!(path, %value, "Setting configuration value.");
        if let Err(source) = document.set(path, value) {
            report(
                failures,
                SyncFailure::Path {
                    object: object_name,
                    source,
                },
            );
        }
    }

    if let Err(source) = document.save() {
        report(
            failures,
            document_failure(object_name, document.path(), source),
        );
    }
}

/// Assign every value present in the object's (already refreshed) document
/// to its field.
fn load_into(
    registered: &RegisteredObject,
    document: &ConfigDocument,
    decoration: TextDecoration,
    failures: &mut Vec<SyncFailure>,
) {
    let mut object = registered.object.write();
    let object_name = object.type_name();

    for (index, path) in object.field_paths().into_iter().enumerate() {
        if let Err(source) = split_path(path) {
            report(
                failures,
                SyncFailure::Path {
                    object: object_name,
                    source,
                },
            );
            continue;
        }

        let Some(value) = document.get(path) else {
            trace!(path, "No persisted value, keeping field as is.");
            continue;
        };

        let value = decoration.decorate_value(value.clone());
        if let Err(source) = object.write_field(index, value) {
            report(
                failures,
                SyncFailure::Field {
                    object: object_name,
                    path: path.to_string(),
                    source,
                },
            );
        }
    }
}

fn document_failure(
    object_name: &'static str,
    file_path: &Path,
    source: crate::error::DocumentError,
) -> SyncFailure {
    SyncFailure::Document {
        object: object_name,
        file: file_path.to_path_buf(),
        source,
    }
}

fn report(failures: &mut Vec<SyncFailure>, failure: SyncFailure) {
    warn!(error = %failure, "Configuration synchronization failure.");
    failures.push(failure);
}


#[cfg(test)]
mod tests {
    use tempfile::tempdir;
    use toml::Value;

    use super::*;
    use crate::{binding::shared, error::AccessError};

    struct Scenario {
        field: i64,
    }

    crate::config_bindings! {
        Scenario in "cfg.toml" {
            field: "a.b",
        }
    }

    struct NotConfig {
        field: i64,
    }

    crate::config_bindings! {
        NotConfig {
            field: "a.b",
        }
    }

    struct BrokenPath {
        field: i64,
    }

    crate::config_bindings! {
        BrokenPath in "cfg.toml" {
            field: "a..b",
        }
    }

    struct DotPrefixed {
        field: i64,
    }

    crate::config_bindings! {
        DotPrefixed in "./cfg.toml" {
            field: "a.c",
        }
    }

    fn write_externally(file_path: &Path, path: &str, value: Value) {
        let mut document = ConfigDocument::open(file_path);
        document.load().unwrap();
        document.set(path, value).unwrap();
        document.save().unwrap();
    }

    #[test]
    fn objects_without_a_file_are_skipped() {
        let directory = tempdir().unwrap();
        let mut synchronizer = Synchronizer::new(directory.path().to_path_buf());

        synchronizer
            .register_object(&shared(NotConfig { field: 1 }))
            .unwrap();

        assert!(synchronizer.is_empty());
        assert!(synchronizer.document("cfg.toml").is_none());
        assert!(!directory.path().join("cfg.toml").exists());
    }

    #[test]
    fn equivalent_file_identifiers_share_one_document() {
        let directory = tempdir().unwrap();
        let mut synchronizer = Synchronizer::new(directory.path().to_path_buf());

        synchronizer
            .register([
                shared(Scenario { field: 1 }) as SharedObject,
                shared(DotPrefixed { field: 2 }) as SharedObject,
            ])
            .unwrap();

        assert_eq!(synchronizer.documents.len(), 1);
        let document = synchronizer.document("./cfg.toml").unwrap();
        assert!(std::ptr::eq(document, synchronizer.document("cfg.toml").unwrap()));
        assert_eq!(document.get("a.b"), Some(&Value::Integer(1)));
        assert_eq!(document.get("a.c"), Some(&Value::Integer(2)));
    }

    #[test]
    fn registering_twice_keeps_one_entry() {
        let directory = tempdir().unwrap();
        let mut synchronizer = Synchronizer::new(directory.path().to_path_buf());
        let object = shared(Scenario { field: 5 });

        synchronizer
            .register_object(&object)
            .unwrap()
            .register_object(&object)
            .unwrap();

        assert_eq!(synchronizer.len(), 1);
    }

    #[test]
    fn scenario_register_save_load() {
        let directory = tempdir().unwrap();
        let file_path = directory.path().join("cfg.toml");
        let mut synchronizer = Synchronizer::new(directory.path().to_path_buf());
        let object = shared(Scenario { field: 5 });

        synchronizer.register_object(&object).unwrap();
        assert_eq!(
            synchronizer.document("cfg.toml").unwrap().get("a.b"),
            Some(&Value::Integer(5))
        );

        write_externally(&file_path, "a.b", Value::Integer(7));
        synchronizer.register_object(&object).unwrap();
        assert_eq!(
            synchronizer.document("cfg.toml").unwrap().get("a.b"),
            Some(&Value::Integer(7))
        );

        synchronizer.save().unwrap();
        assert_eq!(
            synchronizer.document("cfg.toml").unwrap().get("a.b"),
            Some(&Value::Integer(5))
        );

        write_externally(&file_path, "a.b", Value::Integer(9));
        synchronizer.load().unwrap();
        assert_eq!(object.read().field, 9);
    }

    #[test]
    fn invalid_declared_path_is_reported_per_field() {
        let directory = tempdir().unwrap();
        let mut synchronizer = Synchronizer::new(directory.path().to_path_buf());
        let broken = shared(BrokenPath { field: 1 });

        let error = synchronizer
            .register_object(&broken)
            .err()
            .expect("invalid path should be reported");

        assert_eq!(error.operation, "register");
        assert!(matches!(
            error.failures(),
            [SyncFailure::Path { .. }]
        ));

        // The document itself was still persisted.
        assert!(directory.path().join("cfg.toml").exists());
    }

    #[test]
    fn mismatched_value_fails_only_that_field() {
        let directory = tempdir().unwrap();
        let file_path = directory.path().join("cfg.toml");
        let mut synchronizer = Synchronizer::new(directory.path().to_path_buf());
        let object = shared(Scenario { field: 5 });
        synchronizer.register_object(&object).unwrap();

        write_externally(&file_path, "a.b", Value::String("five".to_string()));

        let error = synchronizer.load().err().expect("type mismatch is reported");
        assert!(matches!(
            error.failures(),
            [SyncFailure::Field {
                source: AccessError::Write(_),
                ..
            }]
        ));
        assert_eq!(object.read().field, 5);
    }
}
