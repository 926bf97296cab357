//! One accessor per resource type, each reading a single table of the store.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use liftlog_auth::{RawRecord, RepositoryError, ResourceAccessor, ResourceBindings, ResourceResolver};
use liftlog_core::{ExerciseId, SetId, UserId, WorkoutId};

use super::memory::{InMemoryTrainingStore, repository_error};

#[derive(Debug, Clone)]
pub struct UserRepo(pub Arc<InMemoryTrainingStore>);

#[derive(Debug, Clone)]
pub struct WorkoutRepo(pub Arc<InMemoryTrainingStore>);

#[derive(Debug, Clone)]
pub struct ExerciseRepo(pub Arc<InMemoryTrainingStore>);

#[derive(Debug, Clone)]
pub struct SetRepo(pub Arc<InMemoryTrainingStore>);

#[async_trait]
impl ResourceAccessor for UserRepo {
    async fn fetch_by_id(&self, id: Uuid) -> Result<Option<RawRecord>, RepositoryError> {
        let user = self.0.user(UserId::from_uuid(id)).map_err(repository_error)?;
        Ok(user.map(RawRecord::from))
    }
}

#[async_trait]
impl ResourceAccessor for WorkoutRepo {
    async fn fetch_by_id(&self, id: Uuid) -> Result<Option<RawRecord>, RepositoryError> {
        let workout = self.0.workout(WorkoutId::from_uuid(id)).map_err(repository_error)?;
        Ok(workout.map(RawRecord::from))
    }
}

#[async_trait]
impl ResourceAccessor for ExerciseRepo {
    async fn fetch_by_id(&self, id: Uuid) -> Result<Option<RawRecord>, RepositoryError> {
        let exercise = self.0.exercise(ExerciseId::from_uuid(id)).map_err(repository_error)?;
        Ok(exercise.map(RawRecord::from))
    }
}

#[async_trait]
impl ResourceAccessor for SetRepo {
    async fn fetch_by_id(&self, id: Uuid) -> Result<Option<RawRecord>, RepositoryError> {
        let set = self.0.set(SetId::from_uuid(id)).map_err(repository_error)?;
        Ok(set.map(RawRecord::from))
    }
}

/// Bind every resource type to its table in `store`.
pub fn build_resolver(store: &Arc<InMemoryTrainingStore>) -> ResourceResolver {
    ResourceResolver::new(ResourceBindings {
        user: Arc::new(UserRepo(store.clone())),
        workout: Arc::new(WorkoutRepo(store.clone())),
        exercise: Arc::new(ExerciseRepo(store.clone())),
        set: Arc::new(SetRepo(store.clone())),
    })
}
