use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use liftlog_core::{DomainError, DomainResult, Entity, OwnedEntity, UserId, WorkoutId};

/// A training session belonging to one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workout {
    pub id: WorkoutId,
    pub user_id: UserId,
    pub name: String,
    pub notes: Option<String>,
    pub performed_at: DateTime<Utc>,
}

impl Workout {
    pub fn new(
        id: WorkoutId,
        user_id: UserId,
        name: impl Into<String>,
        notes: Option<String>,
        performed_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let name = validate_name(name.into())?;
        Ok(Self {
            id,
            user_id,
            name,
            notes: normalize_notes(notes),
            performed_at,
        })
    }

    /// Apply a partial update. The owner link is never changed here.
    pub fn revise(&mut self, name: Option<String>, notes: Option<String>) -> DomainResult<()> {
        if let Some(name) = name {
            self.name = validate_name(name)?;
        }
        if notes.is_some() {
            self.notes = normalize_notes(notes);
        }
        Ok(())
    }
}

impl Entity for Workout {
    type Id = WorkoutId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl OwnedEntity for Workout {
    type OwnerId = UserId;

    fn owner_id(&self) -> Self::OwnerId {
        self.user_id
    }
}

fn validate_name(name: String) -> DomainResult<String> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(DomainError::validation("workout name cannot be empty"));
    }
    if name.chars().count() > 120 {
        return Err(DomainError::validation("workout name is longer than 120 characters"));
    }
    Ok(name)
}

fn normalize_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
}
