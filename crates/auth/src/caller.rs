use serde::{Deserialize, Serialize};

use liftlog_core::{ExerciseId, SetId, UserId, WorkoutId};

/// The authenticated principal together with the ownership graph it holds.
///
/// Built fresh for every request from the persisted graph and dropped once the
/// decision is made. Collections default to empty when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    pub id: UserId,
    #[serde(default)]
    pub workouts: Vec<OwnedWorkout>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedWorkout {
    pub id: WorkoutId,
    #[serde(default)]
    pub exercises: Vec<OwnedExercise>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedExercise {
    pub id: ExerciseId,
    #[serde(default)]
    pub set_ids: Vec<SetId>,
}

impl Caller {
    /// A caller that owns nothing yet.
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            workouts: Vec::new(),
        }
    }

    pub fn with_workout(mut self, workout: OwnedWorkout) -> Self {
        self.workouts.push(workout);
        self
    }
}

impl OwnedWorkout {
    pub fn new(id: WorkoutId) -> Self {
        Self {
            id,
            exercises: Vec::new(),
        }
    }

    pub fn with_exercise(mut self, exercise: OwnedExercise) -> Self {
        self.exercises.push(exercise);
        self
    }
}

impl OwnedExercise {
    pub fn new(id: ExerciseId) -> Self {
        Self {
            id,
            set_ids: Vec::new(),
        }
    }

    pub fn with_set(mut self, set_id: SetId) -> Self {
        self.set_ids.push(set_id);
        self
    }
}
