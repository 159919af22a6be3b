//! Declarative, bidirectional synchronization between in-memory objects
//! and hierarchical TOML configuration files.
//!
//! Your starting point should probably be [`Synchronizer`] together with
//! the [`config_bindings!`] macro.
//!
//! # Internals
//! A type opts in by implementing [`ConfigBound`]: it names the file it lives in
//! and lists its fields, each bound to a dotted path inside that file.
//! The [`Synchronizer`] keeps a registry of shared object handles and the
//! [`ConfigDocument`] each one is backed by, and moves values between the two:
//!
//! - [`register`][Synchronizer::register] seeds every bound field into its
//!   document, but never replaces a value that is already persisted.
//! - [`save`][Synchronizer::save] writes every in-memory value back, unconditionally.
//! - [`load`][Synchronizer::load] assigns every persisted value to its field.
//! - [`reload`][Synchronizer::reload] is `save` followed by `load`.
//!
//! String values additionally pass through a [`TextDecoration`] filter on the way
//! in and out of the document.
//!
//! ```no_run
//! use config_keeper::{config_bindings, shared, Synchronizer};
//!
//! struct Messages {
//!     motd: String,
//!     max_players: u32,
//! }
//!
//! config_bindings! {
//!     Messages in "messages.toml" {
//!         motd: "messages.motd",
//!         max_players: "limits.players",
//!     }
//! }
//!
//! # fn main() -> Result<(), config_keeper::SyncError> {
//! let messages = shared(Messages {
//!     motd: "&aWelcome!".to_string(),
//!     max_players: 20,
//! });
//!
//! let mut synchronizer = Synchronizer::new("./data");
//! synchronizer.register_object(&messages)?.load()?;
//! # Ok(())
//! # }
//! ```

mod binding;
mod decoration;
mod document;
mod error;
mod host;
mod synchronizer;

pub use binding::{shared, Bindable, ConfigBound, FieldBinding, Shared, SharedObject};
pub use decoration::TextDecoration;
pub use document::ConfigDocument;
pub use error::{AccessError, DocumentError, SyncError, SyncFailure};
pub use host::{DataDirectory, Host};
pub use synchronizer::Synchronizer;

#[doc(hidden)]
pub mod __private {
    pub use crate::binding::{read_value, write_value};
}

/// Re-exported so bound types and callers can name document values
/// without depending on `toml` themselves.
pub use toml::Value;
