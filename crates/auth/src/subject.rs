//! Subject types, their fields, and the tagged instances rules are evaluated against.

use core::str::FromStr;
use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AccessError;

/// Closed set of resource kinds that can be protected.
///
/// Every variant has exactly one owner-link field and exactly one resolver
/// binding. Adding a level to the hierarchy means adding a variant here, an
/// entry in [`crate::ResourceBindings`], and a rule in [`crate::define_ability`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceType {
    User,
    Workout,
    Exercise,
    Set,
}

impl ResourceType {
    pub const ALL: [ResourceType; 4] = [
        ResourceType::User,
        ResourceType::Workout,
        ResourceType::Exercise,
        ResourceType::Set,
    ];

    /// Wire tag used in route declarations.
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceType::User => "USER",
            ResourceType::Workout => "WORKOUT",
            ResourceType::Exercise => "EXERCISE",
            ResourceType::Set => "SET",
        }
    }

    /// Field linking an instance to its owner. Users own themselves.
    pub fn owner_link(self) -> Field {
        match self {
            ResourceType::User => Field::Id,
            ResourceType::Workout => Field::UserId,
            ResourceType::Exercise => Field::WorkoutId,
            ResourceType::Set => Field::ExerciseId,
        }
    }

    /// Fields every instance of this type carries.
    pub fn has_field(self, field: Field) -> bool {
        field == Field::Id || field == self.owner_link()
    }
}

impl core::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| AccessError::InvalidResourceType(s.to_string()))
    }
}

/// Identifier-valued fields a condition can test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Id,
    UserId,
    WorkoutId,
    ExerciseId,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::UserId => "user_id",
            Field::WorkoutId => "workout_id",
            Field::ExerciseId => "exercise_id",
        }
    }
}

impl core::fmt::Display for Field {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resource-type declaration attached to a protected route.
///
/// Kept as an opaque string until the resolver parses it, so a misconfigured
/// route surfaces as `InvalidResourceType` instead of failing to build.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceTag(Cow<'static, str>);

impl ResourceTag {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<ResourceType> for ResourceTag {
    fn from(value: ResourceType) -> Self {
        Self(Cow::Borrowed(value.as_str()))
    }
}

impl core::fmt::Display for ResourceTag {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonical, explicitly tagged view of a fetched record.
///
/// Produced by entity coercion; rules never inspect the concrete record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubjectInstance {
    subject: ResourceType,
    id: Uuid,
    owner_value: Uuid,
}

impl SubjectInstance {
    /// Build an instance. For `USER` the owner value is forced to `id`.
    pub fn new(subject: ResourceType, id: Uuid, owner_value: Uuid) -> Self {
        let owner_value = match subject {
            ResourceType::User => id,
            _ => owner_value,
        };
        Self {
            subject,
            id,
            owner_value,
        }
    }

    pub fn user(id: Uuid) -> Self {
        Self::new(ResourceType::User, id, id)
    }

    pub fn subject(&self) -> ResourceType {
        self.subject
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn owner_link(&self) -> Field {
        self.subject.owner_link()
    }

    pub fn owner_value(&self) -> Uuid {
        self.owner_value
    }

    /// Value of `field`, or `None` if this subject type does not carry it.
    pub fn field(&self, field: Field) -> Option<Uuid> {
        if field == Field::Id {
            Some(self.id)
        } else if field == self.owner_link() {
            Some(self.owner_value)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_parse_back_to_their_type() {
        for t in ResourceType::ALL {
            assert_eq!(t.as_str().parse::<ResourceType>().unwrap(), t);
        }
    }

    #[test]
    fn unknown_tag_is_invalid_resource_type() {
        let err = "INVALID".parse::<ResourceType>().unwrap_err();
        assert!(matches!(err, AccessError::InvalidResourceType(ref t) if t == "INVALID"));
    }

    #[test]
    fn tags_are_case_sensitive() {
        assert!("workout".parse::<ResourceType>().is_err());
    }

    #[test]
    fn every_type_carries_id_and_its_owner_link() {
        for t in ResourceType::ALL {
            assert!(t.has_field(Field::Id));
            assert!(t.has_field(t.owner_link()));
        }
        assert!(!ResourceType::Set.has_field(Field::WorkoutId));
        assert!(!ResourceType::Workout.has_field(Field::ExerciseId));
    }

    #[test]
    fn users_are_self_owned() {
        let id = Uuid::now_v7();
        let instance = SubjectInstance::new(ResourceType::User, id, Uuid::nil());
        assert_eq!(instance.owner_value(), id);
        assert_eq!(instance.field(Field::Id), Some(id));
    }

    #[test]
    fn field_lookup_is_limited_to_declared_fields() {
        let (id, workout) = (Uuid::now_v7(), Uuid::now_v7());
        let exercise = SubjectInstance::new(ResourceType::Exercise, id, workout);
        assert_eq!(exercise.field(Field::WorkoutId), Some(workout));
        assert_eq!(exercise.field(Field::UserId), None);
    }
}
