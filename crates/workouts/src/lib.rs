//! `liftlog-workouts` — persisted shapes of the training hierarchy.
//!
//! A user owns workouts, a workout owns exercises, an exercise owns sets.
//! Each child record carries exactly one link to its parent.

pub mod exercise;
pub mod set;
pub mod user;
pub mod workout;

pub use exercise::Exercise;
pub use set::WorkoutSet;
pub use user::User;
pub use workout::Workout;
