use std::sync::Arc;

use parking_lot::RwLock;
use toml::Value;

use crate::error::AccessError;


/// Shared handle to a registered object: the caller keeps one clone,
/// the [`Synchronizer`][crate::Synchronizer] keeps another.
pub type Shared<T> = Arc<RwLock<T>>;

/// Type-erased [`Shared`] handle as stored in the registry.
pub type SharedObject = Arc<RwLock<dyn Bindable>>;

/// Wrap `value` in a [`Shared`] handle.
pub fn shared<T>(value: T) -> Shared<T> {
    Arc::new(RwLock::new(value))
}


/// A typed accessor pair for one field, keyed by the dotted path it is bound to.
pub struct FieldBinding<T> {
    path: &'static str,
    read: fn(&T) -> Result<Value, AccessError>,
    write: fn(&mut T, Value) -> Result<(), AccessError>,
}

impl<T> FieldBinding<T> {
    pub fn new(
        path: &'static str,
        read: fn(&T) -> Result<Value, AccessError>,
        write: fn(&mut T, Value) -> Result<(), AccessError>,
    ) -> Self {
        Self { path, read, write }
    }

    pub fn path(&self) -> &'static str {
        self.path
    }

    pub fn read(&self, object: &T) -> Result<Value, AccessError> {
        (self.read)(object)
    }

    pub fn write(&self, object: &mut T, value: Value) -> Result<(), AccessError> {
        (self.write)(object, value)
    }
}

impl<T> Clone for FieldBinding<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for FieldBinding<T> {}


/// Convert a field into a document value.
pub fn read_value<F: serde::Serialize>(field: &F) -> Result<Value, AccessError> {
    Value::try_from(field).map_err(AccessError::Read)
}

/// Convert a document value into a field.
pub fn write_value<F: serde::de::DeserializeOwned>(value: Value) -> Result<F, AccessError> {
    value.try_into().map_err(AccessError::Write)
}


/// A type whose fields are bound to paths inside one configuration file.
///
/// Usually implemented with [`config_bindings!`][crate::config_bindings].
pub trait ConfigBound: Sized + Send + Sync + 'static {
    /// Identifier of the backing file, relative to the host's data directory.
    /// `None` means the type is not associated with any file and is skipped
    /// on registration.
    fn config_file() -> Option<&'static str>;

    /// All bound fields. Called anew for every operation.
    fn config_fields() -> Vec<FieldBinding<Self>>;
}


/// Object-safe view of a [`ConfigBound`] type, used by the registry.
///
/// Fields are addressed by their position in [`ConfigBound::config_fields`].
pub trait Bindable: Send + Sync {
    fn type_name(&self) -> &'static str;

    fn config_file(&self) -> Option<&'static str>;

    fn field_paths(&self) -> Vec<&'static str>;

    fn read_field(&self, index: usize) -> Result<Value, AccessError>;

    fn write_field(&mut self, index: usize, value: Value) -> Result<(), AccessError>;
}

impl<T: ConfigBound> Bindable for T {
    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn config_file(&self) -> Option<&'static str> {
        <T as ConfigBound>::config_file()
    }

    fn field_paths(&self) -> Vec<&'static str> {
        T::config_fields()
            .iter()
            .map(FieldBinding::path)
            .collect()
    }

    fn read_field(&self, index: usize) -> Result<Value, AccessError> {
        T::config_fields()
            .get(index)
            .ok_or(AccessError::UnknownField(index))?
            .read(self)
    }

    fn write_field(&mut self, index: usize, value: Value) -> Result<(), AccessError> {
        T::config_fields()
            .get(index)
            .ok_or(AccessError::UnknownField(index))?
            .write(self, value)
    }
}


/// Implement [`ConfigBound`] for a struct from a field-to-path table.
///
/// Every listed field must implement `serde::Serialize` and
/// `serde::de::DeserializeOwned`.
///
/// ```
/// use config_keeper::config_bindings;
///
/// struct Limits {
///     players: u32,
///     greeting: String,
/// }
///
/// config_bindings! {
///     Limits in "limits.toml" {
///         players: "limits.players",
///         greeting: "messages.greeting",
///     }
/// }
///
/// // Bound fields, but no file: ignored by registration.
/// struct Scratch {
///     value: i64,
/// }
///
/// config_bindings! {
///     Scratch {
///         value: "scratch.value",
///     }
/// }
/// ```
#[macro_export]
macro_rules! config_bindings {
    ($object_type:ident in $config_file:literal { $($field:ident : $path:literal),* $(,)? }) => {
        $crate::config_bindings!(@implement $object_type, ::core::option::Option::Some($config_file), { $($field : $path),* });
    };

    ($object_type:ident { $($field:ident : $path:literal),* $(,)? }) => {
        $crate::config_bindings!(@implement $object_type, ::core::option::Option::None, { $($field : $path),* });
    };

    (@implement $object_type:ident, $config_file:expr, { $($field:ident : $path:literal),* }) => {
        impl $crate::ConfigBound for $object_type {
            fn config_file() -> ::core::option::Option<&'static str> {
                $config_file
            }

            fn config_fields() -> ::std::vec::Vec<$crate::FieldBinding<Self>> {
                ::std::vec![
                    $(
                        $crate::FieldBinding::new(
                            $path,
                            |object: &$object_type| $crate::__private::read_value(&object.$field),
                            |object: &mut $object_type, value: $crate::Value| {
                                object.$field = $crate::__private::write_value(value)?;
                                ::core::result::Result::Ok(())
                            },
                        )
                    ),*
                ]
            }
        }
    };
}


#[cfg(test)]
mod tests {
    use super::*;

    struct Sample {
        port: u16,
        name: String,
        ratio: Option<f64>,
    }

    crate::config_bindings! {
        Sample in "sample.toml" {
            port: "server.port",
            name: "server.name",
            ratio: "tuning.ratio",
        }
    }

    struct Unfiled {
        flag: bool,
    }

    crate::config_bindings! {
        Unfiled {
            flag: "flag",
        }
    }

    fn sample() -> Sample {
        Sample {
            port: 8080,
            name: "main".to_string(),
            ratio: None,
        }
    }

    #[test]
    fn declarations_are_discoverable() {
        let object = sample();

        assert_eq!(object.config_file(), Some("sample.toml"));
        assert_eq!(
            object.field_paths(),
            vec!["server.port", "server.name", "tuning.ratio"]
        );
        assert_eq!(Unfiled { flag: true }.config_file(), None);
    }

    #[test]
    fn typed_declarations_erase_to_bindable() {
        fn declared_fields<T: ConfigBound>() -> usize {
            T::config_fields().len()
        }

        let objects: Vec<Box<dyn Bindable>> =
            vec![Box::new(sample()), Box::new(Unfiled { flag: true })];

        assert_eq!(declared_fields::<Sample>(), 3);
        assert_eq!(objects[0].field_paths().len(), declared_fields::<Sample>());
        assert_eq!(objects[1].config_file(), None);
    }

    #[test]
    fn fields_read_and_write_through_values() {
        let mut object = sample();

        assert_eq!(object.read_field(0).unwrap(), Value::Integer(8080));
        assert_eq!(
            object.read_field(1).unwrap(),
            Value::String("main".to_string())
        );

        object.write_field(0, Value::Integer(9090)).unwrap();
        object
            .write_field(1, Value::String("backup".to_string()))
            .unwrap();
        assert_eq!(object.port, 9090);
        assert_eq!(object.name, "backup");
    }

    #[test]
    fn mismatched_values_are_access_errors() {
        let mut object = sample();

        assert!(matches!(
            object.write_field(0, Value::String("not a port".to_string())),
            Err(AccessError::Write(_))
        ));
        assert!(matches!(
            object.write_field(0, Value::Integer(70_000)),
            Err(AccessError::Write(_))
        ));
        assert_eq!(object.port, 8080);
    }

    #[test]
    fn unrepresentable_field_is_a_read_error() {
        let object = sample();
        assert!(matches!(object.read_field(2), Err(AccessError::Read(_))));
    }

    #[test]
    fn out_of_range_index_is_reported() {
        let mut object = sample();

        assert!(matches!(
            object.read_field(3),
            Err(AccessError::UnknownField(3))
        ));
        assert!(matches!(
            object.write_field(3, Value::Integer(1)),
            Err(AccessError::UnknownField(3))
        ));
    }
}
