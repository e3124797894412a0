//! Common utilities and abstractions for services

/// Reactive property system for fine-grained state updates
pub mod property;
mod types;

pub use property::Property;
pub use types::{NO_OBJECT, ObjectPath};
