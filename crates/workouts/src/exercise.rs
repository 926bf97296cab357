use serde::{Deserialize, Serialize};

use liftlog_core::{DomainError, DomainResult, Entity, ExerciseId, OwnedEntity, WorkoutId};

/// A movement performed within a workout (e.g. "Back squat").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: ExerciseId,
    pub workout_id: WorkoutId,
    pub name: String,
    /// Position within the workout, starting at 0.
    pub position: u32,
}

impl Exercise {
    pub fn new(
        id: ExerciseId,
        workout_id: WorkoutId,
        name: impl Into<String>,
        position: u32,
    ) -> DomainResult<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("exercise name cannot be empty"));
        }
        Ok(Self {
            id,
            workout_id,
            name,
            position,
        })
    }
}

impl Entity for Exercise {
    type Id = ExerciseId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl OwnedEntity for Exercise {
    type OwnerId = WorkoutId;

    fn owner_id(&self) -> Self::OwnerId {
        self.workout_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_blank_name() {
        let err = Exercise::new(ExerciseId::new(), WorkoutId::new(), "   ", 0).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn new_trims_name() {
        let e = Exercise::new(ExerciseId::new(), WorkoutId::new(), " Deadlift ", 2).unwrap();
        assert_eq!(e.name, "Deadlift");
        assert_eq!(e.position, 2);
    }

    #[test]
    fn serialized_form_carries_owner_link_under_workout_id() {
        let workout = WorkoutId::new();
        let e = Exercise::new(ExerciseId::new(), workout, "Row", 0).unwrap();
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["workout_id"], serde_json::json!(workout.to_string()));
        assert_eq!(json["id"], serde_json::json!(e.id.to_string()));
    }
}
