use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use liftlog_auth::{Caller, OwnedExercise, OwnedWorkout, OwnershipGraphReader, OwnershipSource, RepositoryError};
use liftlog_core::{DomainError, DomainResult, ExerciseId, SetId, UserId, WorkoutId};
use liftlog_workouts::{Exercise, User, Workout, WorkoutSet};

/// In-memory store for the whole training hierarchy (tests/dev).
///
/// Child inserts require the parent to exist; deletes cascade downwards.
/// Operations spanning levels lock users → workouts → exercises → sets, and
/// hold the parent lock until the child write is done.
/// Reads never cache: every call sees the current maps.
#[derive(Debug, Default)]
pub struct InMemoryTrainingStore {
    users: RwLock<HashMap<UserId, User>>,
    workouts: RwLock<HashMap<WorkoutId, Workout>>,
    exercises: RwLock<HashMap<ExerciseId, Exercise>>,
    sets: RwLock<HashMap<SetId, WorkoutSet>>,
}

fn poisoned<T>(_: PoisonError<T>) -> DomainError {
    DomainError::conflict("store lock poisoned")
}

fn read<K, V>(map: &RwLock<HashMap<K, V>>, key: &K) -> DomainResult<Option<V>>
where
    K: Eq + Hash,
    V: Clone,
{
    Ok(map.read().map_err(poisoned)?.get(key).cloned())
}

impl InMemoryTrainingStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ── users ───────────────────────────────────────────────────────────────

    pub fn insert_user(&self, user: User) -> DomainResult<()> {
        let mut users = self.users.write().map_err(poisoned)?;
        if users.values().any(|u| u.email == user.email && u.id != user.id) {
            return Err(DomainError::conflict(format!("email '{}' already registered", user.email)));
        }
        users.insert(user.id, user);
        Ok(())
    }

    pub fn user(&self, id: UserId) -> DomainResult<Option<User>> {
        read(&self.users, &id)
    }

    // ── workouts ────────────────────────────────────────────────────────────

    pub fn upsert_workout(&self, workout: Workout) -> DomainResult<()> {
        let users = self.users.read().map_err(poisoned)?;
        let mut workouts = self.workouts.write().map_err(poisoned)?;
        if !users.contains_key(&workout.user_id) {
            return Err(DomainError::not_found());
        }
        workouts.insert(workout.id, workout);
        Ok(())
    }

    pub fn workout(&self, id: WorkoutId) -> DomainResult<Option<Workout>> {
        read(&self.workouts, &id)
    }

    pub fn workouts_for(&self, user_id: UserId) -> DomainResult<Vec<Workout>> {
        let mut items: Vec<Workout> = self
            .workouts
            .read()
            .map_err(poisoned)?
            .values()
            .filter(|w| w.user_id == user_id)
            .cloned()
            .collect();
        items.sort_by_key(|w| w.performed_at);
        Ok(items)
    }

    pub fn delete_workout(&self, id: WorkoutId) -> DomainResult<bool> {
        let mut workouts = self.workouts.write().map_err(poisoned)?;
        let mut exercises = self.exercises.write().map_err(poisoned)?;
        let mut sets = self.sets.write().map_err(poisoned)?;

        let removed = workouts.remove(&id).is_some();
        let orphaned: HashSet<ExerciseId> = exercises
            .values()
            .filter(|e| e.workout_id == id)
            .map(|e| e.id)
            .collect();
        exercises.retain(|eid, _| !orphaned.contains(eid));
        sets.retain(|_, s| !orphaned.contains(&s.exercise_id));
        Ok(removed)
    }

    // ── exercises ───────────────────────────────────────────────────────────

    pub fn upsert_exercise(&self, exercise: Exercise) -> DomainResult<()> {
        let workouts = self.workouts.read().map_err(poisoned)?;
        let mut exercises = self.exercises.write().map_err(poisoned)?;
        if !workouts.contains_key(&exercise.workout_id) {
            return Err(DomainError::not_found());
        }
        exercises.insert(exercise.id, exercise);
        Ok(())
    }

    pub fn exercise(&self, id: ExerciseId) -> DomainResult<Option<Exercise>> {
        read(&self.exercises, &id)
    }

    pub fn exercises_for(&self, workout_id: WorkoutId) -> DomainResult<Vec<Exercise>> {
        let mut items: Vec<Exercise> = self
            .exercises
            .read()
            .map_err(poisoned)?
            .values()
            .filter(|e| e.workout_id == workout_id)
            .cloned()
            .collect();
        items.sort_by_key(|e| e.position);
        Ok(items)
    }

    pub fn delete_exercise(&self, id: ExerciseId) -> DomainResult<bool> {
        let mut exercises = self.exercises.write().map_err(poisoned)?;
        let mut sets = self.sets.write().map_err(poisoned)?;
        let removed = exercises.remove(&id).is_some();
        sets.retain(|_, s| s.exercise_id != id);
        Ok(removed)
    }

    // ── sets ────────────────────────────────────────────────────────────────

    pub fn upsert_set(&self, set: WorkoutSet) -> DomainResult<()> {
        let exercises = self.exercises.read().map_err(poisoned)?;
        let mut sets = self.sets.write().map_err(poisoned)?;
        if !exercises.contains_key(&set.exercise_id) {
            return Err(DomainError::not_found());
        }
        sets.insert(set.id, set);
        Ok(())
    }

    pub fn set(&self, id: SetId) -> DomainResult<Option<WorkoutSet>> {
        read(&self.sets, &id)
    }

    pub fn sets_for(&self, exercise_id: ExerciseId) -> DomainResult<Vec<WorkoutSet>> {
        Ok(self
            .sets
            .read()
            .map_err(poisoned)?
            .values()
            .filter(|s| s.exercise_id == exercise_id)
            .cloned()
            .collect())
    }

    pub fn delete_set(&self, id: SetId) -> DomainResult<bool> {
        Ok(self.sets.write().map_err(poisoned)?.remove(&id).is_some())
    }
}

pub(crate) fn repository_error(err: DomainError) -> RepositoryError {
    anyhow::Error::new(err).into()
}

#[async_trait]
impl OwnershipSource for InMemoryTrainingStore {
    async fn load_caller(&self, user_id: UserId) -> Result<Caller, RepositoryError> {
        let mut caller = Caller::new(user_id);
        for workout in self.workouts_for(user_id).map_err(repository_error)? {
            let mut owned = OwnedWorkout::new(workout.id);
            for exercise in self.exercises_for(workout.id).map_err(repository_error)? {
                let set_ids = self
                    .sets_for(exercise.id)
                    .map_err(repository_error)?
                    .into_iter()
                    .map(|s| s.id)
                    .collect();
                owned.exercises.push(OwnedExercise {
                    id: exercise.id,
                    set_ids,
                });
            }
            caller.workouts.push(owned);
        }
        tracing::trace!(caller = %user_id, workouts = caller.workouts.len(), "loaded ownership graph");
        Ok(caller)
    }
}

#[async_trait]
impl OwnershipGraphReader for InMemoryTrainingStore {
    async fn workouts_of(&self, user_id: UserId) -> Result<Vec<WorkoutId>, RepositoryError> {
        Ok(self
            .workouts_for(user_id)
            .map_err(repository_error)?
            .into_iter()
            .map(|w| w.id)
            .collect())
    }

    async fn exercises_of(&self, workout_id: WorkoutId) -> Result<Vec<ExerciseId>, RepositoryError> {
        Ok(self
            .exercises_for(workout_id)
            .map_err(repository_error)?
            .into_iter()
            .map(|e| e.id)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use liftlog_auth::{OwnershipIndex, SequentialOwnership};

    use super::*;

    fn seeded() -> (InMemoryTrainingStore, UserId, WorkoutId, ExerciseId, SetId) {
        let store = InMemoryTrainingStore::new();
        let user = UserId::new();
        let workout = WorkoutId::new();
        let exercise = ExerciseId::new();
        let set = SetId::new();

        store
            .insert_user(User::register(user, "lifter@lift.log", "Lifter", Utc::now()).unwrap())
            .unwrap();
        store
            .upsert_workout(Workout::new(workout, user, "Legs", None, Utc::now()).unwrap())
            .unwrap();
        store
            .upsert_exercise(Exercise::new(exercise, workout, "Squat", 0).unwrap())
            .unwrap();
        store
            .upsert_set(WorkoutSet::new(set, exercise, 5, 100.0).unwrap())
            .unwrap();

        (store, user, workout, exercise, set)
    }

    #[test]
    fn child_requires_existing_parent() {
        let store = InMemoryTrainingStore::new();
        let orphan = Exercise::new(ExerciseId::new(), WorkoutId::new(), "Row", 0).unwrap();
        assert_eq!(store.upsert_exercise(orphan), Err(DomainError::NotFound));
    }

    #[test]
    fn duplicate_email_conflicts() {
        let (store, ..) = seeded();
        let again = User::register(UserId::new(), "lifter@lift.log", "Other", Utc::now()).unwrap();
        assert!(matches!(store.insert_user(again), Err(DomainError::Conflict(_))));
    }

    #[test]
    fn deleting_workout_cascades() {
        let (store, _user, workout, exercise, set) = seeded();
        assert!(store.delete_workout(workout).unwrap());
        assert_eq!(store.exercise(exercise).unwrap(), None);
        assert_eq!(store.set(set).unwrap(), None);
    }

    #[test]
    fn concurrent_insert_and_cascade_leave_no_orphans() {
        let (store, user, ..) = seeded();

        for _ in 0..200 {
            let workout = WorkoutId::new();
            store
                .upsert_workout(Workout::new(workout, user, "Pull", None, Utc::now()).unwrap())
                .unwrap();
            let exercise = Exercise::new(ExerciseId::new(), workout, "Row", 0).unwrap();
            let exercise_id = exercise.id;

            std::thread::scope(|s| {
                s.spawn(|| {
                    let _ = store.upsert_exercise(exercise);
                });
                s.spawn(|| {
                    store.delete_workout(workout).unwrap();
                });
            });

            // Either the insert lost (NotFound) or the cascade removed it.
            assert_eq!(store.exercise(exercise_id).unwrap(), None);
        }
    }

    #[tokio::test]
    async fn hierarchical_read_includes_nested_ids() {
        let (store, user, workout, exercise, set) = seeded();
        let caller = store.load_caller(user).await.unwrap();

        assert_eq!(caller.workouts.len(), 1);
        assert_eq!(caller.workouts[0].id, workout);
        assert_eq!(caller.workouts[0].exercises[0].id, exercise);
        assert_eq!(caller.workouts[0].exercises[0].set_ids, vec![set]);
    }

    #[tokio::test]
    async fn sequential_and_hierarchical_reads_agree() {
        let (store, user, ..) = seeded();
        let store = Arc::new(store);

        let hierarchical = store.load_caller(user).await.unwrap();
        let sequential = SequentialOwnership::new(store.clone()).load_caller(user).await.unwrap();

        assert_eq!(OwnershipIndex::build(&hierarchical), OwnershipIndex::build(&sequential));
    }

    #[tokio::test]
    async fn ownership_reflects_deletes_immediately() {
        let (store, user, workout, ..) = seeded();
        store.delete_workout(workout).unwrap();
        let caller = store.load_caller(user).await.unwrap();
        assert!(OwnershipIndex::build(&caller).is_empty());
    }
}
