//! Normalizes fetched records into the tagged shape rules evaluate.

use serde_json::Value as JsonValue;
use uuid::Uuid;

use liftlog_core::{Entity, OwnedEntity};
use liftlog_workouts::{Exercise, User, Workout, WorkoutSet};

use crate::error::AccessError;
use crate::subject::{Field, ResourceType, SubjectInstance};

/// A record as handed back by a repository.
///
/// Typed stores return the domain model; document stores may return an
/// untagged JSON body with its kind alongside.
#[derive(Debug, Clone, PartialEq)]
pub enum RawRecord {
    User(User),
    Workout(Workout),
    Exercise(Exercise),
    Set(WorkoutSet),
    Document { kind: String, body: JsonValue },
}

impl RawRecord {
    pub fn kind(&self) -> &str {
        match self {
            RawRecord::User(_) => ResourceType::User.as_str(),
            RawRecord::Workout(_) => ResourceType::Workout.as_str(),
            RawRecord::Exercise(_) => ResourceType::Exercise.as_str(),
            RawRecord::Set(_) => ResourceType::Set.as_str(),
            RawRecord::Document { kind, .. } => kind,
        }
    }
}

impl From<User> for RawRecord {
    fn from(value: User) -> Self {
        RawRecord::User(value)
    }
}

impl From<Workout> for RawRecord {
    fn from(value: Workout) -> Self {
        RawRecord::Workout(value)
    }
}

impl From<Exercise> for RawRecord {
    fn from(value: Exercise) -> Self {
        RawRecord::Exercise(value)
    }
}

impl From<WorkoutSet> for RawRecord {
    fn from(value: WorkoutSet) -> Self {
        RawRecord::Set(value)
    }
}

/// Copy `raw` into a [`SubjectInstance`] tagged as `resource_type`.
///
/// The record is only read. Kinds outside the known types fail with
/// `UnrecognizedEntityType`; a known kind that differs from `resource_type`
/// fails with `EntityTypeMismatch`.
pub fn to_entity(raw: &RawRecord, resource_type: ResourceType) -> Result<SubjectInstance, AccessError> {
    let instance = match raw {
        RawRecord::User(user) => SubjectInstance::user(user.id().into()),
        RawRecord::Workout(workout) => owned(ResourceType::Workout, workout),
        RawRecord::Exercise(exercise) => owned(ResourceType::Exercise, exercise),
        RawRecord::Set(set) => owned(ResourceType::Set, set),
        RawRecord::Document { kind, body } => from_document(kind, body)?,
    };

    if instance.subject() != resource_type {
        return Err(AccessError::EntityTypeMismatch {
            expected: resource_type,
            found: raw.kind().to_string(),
        });
    }
    Ok(instance)
}

fn owned<E: OwnedEntity>(subject: ResourceType, entity: &E) -> SubjectInstance {
    SubjectInstance::new(subject, entity.id().into(), entity.owner_id().into())
}

fn from_document(kind: &str, body: &JsonValue) -> Result<SubjectInstance, AccessError> {
    let subject: ResourceType = kind
        .parse()
        .map_err(|_| AccessError::UnrecognizedEntityType(kind.to_string()))?;

    let id = read_id(body, subject, Field::Id)?;
    let owner = read_id(body, subject, subject.owner_link())?;
    Ok(SubjectInstance::new(subject, id, owner))
}

fn read_id(body: &JsonValue, kind: ResourceType, field: Field) -> Result<Uuid, AccessError> {
    body.get(field.as_str())
        .and_then(JsonValue::as_str)
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or(AccessError::MalformedRecord { kind, field })
}
