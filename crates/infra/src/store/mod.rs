//! Training-data storage and its bindings to the authorization ports.

pub mod accessors;
pub mod memory;

pub use accessors::{ExerciseRepo, SetRepo, UserRepo, WorkoutRepo, build_resolver};
pub use memory::InMemoryTrainingStore;
