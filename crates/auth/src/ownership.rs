//! Ownership index: the caller's transitively owned identifiers, per level.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use liftlog_core::{ExerciseId, UserId, WorkoutId};

use crate::caller::{Caller, OwnedExercise, OwnedWorkout};
use crate::error::RepositoryError;

/// Request-scoped snapshot of what a caller owns below the user level.
///
/// Sets are authorized through `owned_exercise_ids` (a set is owned iff its
/// exercise is), so no set-level index is materialized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnershipIndex {
    owned_workout_ids: HashSet<Uuid>,
    owned_exercise_ids: HashSet<Uuid>,
}

impl OwnershipIndex {
    /// Walk the caller's workouts and their exercises once.
    pub fn build(caller: &Caller) -> Self {
        let mut index = Self::default();
        for workout in &caller.workouts {
            index.owned_workout_ids.insert(workout.id.into());
            index
                .owned_exercise_ids
                .extend(workout.exercises.iter().map(|e| Uuid::from(e.id)));
        }
        index
    }

    pub fn owned_workout_ids(&self) -> &HashSet<Uuid> {
        &self.owned_workout_ids
    }

    pub fn owned_exercise_ids(&self) -> &HashSet<Uuid> {
        &self.owned_exercise_ids
    }

    pub fn is_empty(&self) -> bool {
        self.owned_workout_ids.is_empty() && self.owned_exercise_ids.is_empty()
    }

    /// `(owned_workout_ids, owned_exercise_ids)`
    pub fn into_parts(self) -> (HashSet<Uuid>, HashSet<Uuid>) {
        (self.owned_workout_ids, self.owned_exercise_ids)
    }
}

/// Loads a caller's current ownership graph (workouts with nested exercises).
///
/// Implementations must read the persisted state on every call.
#[async_trait]
pub trait OwnershipSource: Send + Sync {
    async fn load_caller(&self, user_id: UserId) -> Result<Caller, RepositoryError>;
}

#[async_trait]
impl<S> OwnershipSource for Arc<S>
where
    S: OwnershipSource + ?Sized,
{
    async fn load_caller(&self, user_id: UserId) -> Result<Caller, RepositoryError> {
        (**self).load_caller(user_id).await
    }
}

/// Flat, one-level-at-a-time reads for stores without hierarchical queries.
#[async_trait]
pub trait OwnershipGraphReader: Send + Sync {
    async fn workouts_of(&self, user_id: UserId) -> Result<Vec<WorkoutId>, RepositoryError>;

    async fn exercises_of(&self, workout_id: WorkoutId) -> Result<Vec<ExerciseId>, RepositoryError>;
}

#[async_trait]
impl<R> OwnershipGraphReader for Arc<R>
where
    R: OwnershipGraphReader + ?Sized,
{
    async fn workouts_of(&self, user_id: UserId) -> Result<Vec<WorkoutId>, RepositoryError> {
        (**self).workouts_of(user_id).await
    }

    async fn exercises_of(&self, workout_id: WorkoutId) -> Result<Vec<ExerciseId>, RepositoryError> {
        (**self).exercises_of(workout_id).await
    }
}

/// [`OwnershipSource`] assembled from sequential dependent fetches:
/// one for the workouts, then one per workout for its exercises.
///
/// Set IDs are left empty; the index never needs them.
#[derive(Debug, Clone)]
pub struct SequentialOwnership<R> {
    reader: R,
}

impl<R> SequentialOwnership<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

#[async_trait]
impl<R> OwnershipSource for SequentialOwnership<R>
where
    R: OwnershipGraphReader,
{
    async fn load_caller(&self, user_id: UserId) -> Result<Caller, RepositoryError> {
        let mut caller = Caller::new(user_id);
        for workout_id in self.reader.workouts_of(user_id).await? {
            let exercises = self
                .reader
                .exercises_of(workout_id)
                .await?
                .into_iter()
                .map(OwnedExercise::new)
                .collect();
            caller.workouts.push(OwnedWorkout {
                id: workout_id,
                exercises,
            });
        }
        Ok(caller)
    }
}
