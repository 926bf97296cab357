use serde::{Deserialize, Serialize};

use liftlog_core::{DomainError, DomainResult, Entity, ExerciseId, OwnedEntity, SetId};

/// One set of an exercise: repetitions at a load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSet {
    pub id: SetId,
    pub exercise_id: ExerciseId,
    pub reps: u32,
    /// Load in kilograms; `0.0` for bodyweight.
    pub weight_kg: f64,
}

impl WorkoutSet {
    pub fn new(id: SetId, exercise_id: ExerciseId, reps: u32, weight_kg: f64) -> DomainResult<Self> {
        let mut set = Self {
            id,
            exercise_id,
            reps: 0,
            weight_kg: 0.0,
        };
        set.record(Some(reps), Some(weight_kg))?;
        Ok(set)
    }

    pub fn record(&mut self, reps: Option<u32>, weight_kg: Option<f64>) -> DomainResult<()> {
        if let Some(reps) = reps {
            if reps == 0 {
                return Err(DomainError::validation("reps must be at least 1"));
            }
            self.reps = reps;
        }
        if let Some(weight_kg) = weight_kg {
            if !weight_kg.is_finite() || weight_kg < 0.0 {
                return Err(DomainError::validation("weight_kg must be a non-negative number"));
            }
            self.weight_kg = weight_kg;
        }
        Ok(())
    }
}

impl Entity for WorkoutSet {
    type Id = SetId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl OwnedEntity for WorkoutSet {
    type OwnerId = ExerciseId;

    fn owner_id(&self) -> Self::OwnerId {
        self.exercise_id
    }
}
