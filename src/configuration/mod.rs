//! Configuration of the `config-keeper` binary itself.
//!
//! Your starting point should probably be [`Configuration::load_from_data_directory`].
//!
//! # Internals
//! The binary keeps its own settings in `keeper.toml` inside the data directory,
//! bound through the same [`Synchronizer`][config_keeper::Synchronizer] it offers to others.
//! The raw bound values live in [`KeeperSettings`] (unvalidated, "unresolved").
//! Registering it seeds any missing defaults into the file, loading it picks up
//! the user's edits, and its `resolve` method then turns it into the validated
//! [`Configuration`], e.g. raising an error if a log level filter does not parse.

#![allow(rustdoc::private_intra_doc_links)]

mod structure;
mod traits;
mod utilities;

pub use structure::*;
pub use utilities::get_default_data_directory_path;
