//! Client-side local persistence for the quiz platform
//!
//! Currently holds the saved-account registry used by the multi-account
//! switcher UI.

pub mod accounts;

pub use accounts::{AccountRegistry, RegistryError, SavedAccount};
