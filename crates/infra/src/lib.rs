//! Infrastructure layer: repositories backing the authorization ports.

pub mod store;

pub use store::{InMemoryTrainingStore, build_resolver};
