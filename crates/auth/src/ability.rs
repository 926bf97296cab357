use std::collections::{HashMap, HashSet};

use serde::Serialize;
use uuid::Uuid;

use liftlog_core::UserId;

use crate::caller::Caller;
use crate::error::AccessError;
use crate::ownership::OwnershipIndex;
use crate::subject::{Field, ResourceType, SubjectInstance};
use crate::Action;

/// Predicate over one identifier-valued field of an instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    FieldEquals(Field, Uuid),
    /// Membership test. An empty set never matches.
    FieldInSet(Field, HashSet<Uuid>),
}

impl Condition {
    pub fn field(&self) -> Field {
        match self {
            Condition::FieldEquals(field, _) | Condition::FieldInSet(field, _) => *field,
        }
    }

    pub fn matches(&self, instance: &SubjectInstance) -> bool {
        let Some(value) = instance.field(self.field()) else {
            return false;
        };
        match self {
            Condition::FieldEquals(_, expected) => value == *expected,
            Condition::FieldInSet(_, allowed) => allowed.contains(&value),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Condition::FieldEquals(field, value) => format!("{field} == {value}"),
            Condition::FieldInSet(field, set) => format!("{field} in <{} owned ids>", set.len()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub action: Action,
    pub subject: ResourceType,
    pub condition: Condition,
}

impl Rule {
    pub fn matches(&self, action: Action, instance: &SubjectInstance) -> bool {
        self.subject == instance.subject()
            && self.action.covers(action)
            && self.condition.matches(instance)
    }
}

/// Collects rules for one caller, validating each as it is added.
#[derive(Debug)]
pub struct AbilityBuilder {
    caller_id: UserId,
    rules: HashMap<ResourceType, Vec<Rule>>,
}

impl AbilityBuilder {
    pub fn new(caller_id: UserId) -> Self {
        Self {
            caller_id,
            rules: HashMap::new(),
        }
    }

    /// Grant `action` on `subject` when `condition` holds.
    ///
    /// Fails with `InvalidRule` if `subject` instances do not carry the
    /// condition's field.
    pub fn allow(
        mut self,
        action: Action,
        subject: ResourceType,
        condition: Condition,
    ) -> Result<Self, AccessError> {
        let field = condition.field();
        if !subject.has_field(field) {
            return Err(AccessError::InvalidRule { subject, field });
        }
        self.rules.entry(subject).or_default().push(Rule {
            action,
            subject,
            condition,
        });
        Ok(self)
    }

    pub fn build(self) -> Ability {
        Ability {
            caller_id: self.caller_id,
            rules: self.rules,
        }
    }
}

/// Immutable set of rules bound to one caller for the duration of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ability {
    caller_id: UserId,
    rules: HashMap<ResourceType, Vec<Rule>>,
}

impl Ability {
    pub fn caller_id(&self) -> UserId {
        self.caller_id
    }

    pub fn rules_for(&self, subject: ResourceType) -> &[Rule] {
        self.rules.get(&subject).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True iff any rule for the instance's subject type grants `action`.
    /// Subjects without rules are denied.
    pub fn can(&self, action: Action, instance: &SubjectInstance) -> bool {
        self.rules_for(instance.subject())
            .iter()
            .any(|rule| rule.matches(action, instance))
    }

    pub fn cannot(&self, action: Action, instance: &SubjectInstance) -> bool {
        !self.can(action, instance)
    }

    /// Same decision as [`Ability::can`], with the reasoning spelled out.
    pub fn explain(&self, action: Action, instance: &SubjectInstance) -> DecisionExplanation {
        let rules = self.rules_for(instance.subject());
        let matched = rules.iter().find(|rule| rule.matches(action, instance));

        let reason = match (matched, rules.is_empty()) {
            (Some(rule), _) => format!(
                "{} granted on {} by rule '{}'",
                rule.action,
                instance.subject(),
                rule.condition.describe()
            ),
            (None, true) => format!("no rules defined for {}", instance.subject()),
            (None, false) => format!(
                "none of {} rule(s) for {} matched {} = {}",
                rules.len(),
                instance.subject(),
                instance.owner_link(),
                instance.owner_value()
            ),
        };

        DecisionExplanation {
            caller_id: self.caller_id,
            action,
            subject: instance.subject(),
            resource_id: instance.id(),
            granted: matched.is_some(),
            rules_considered: rules.len(),
            matched_condition: matched.map(|rule| rule.condition.describe()),
            reason,
        }
    }
}

/// Auditable account of a single authorization decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecisionExplanation {
    pub caller_id: UserId,
    pub action: Action,
    pub subject: ResourceType,
    pub resource_id: Uuid,
    pub granted: bool,
    pub rules_considered: usize,
    pub matched_condition: Option<String>,
    pub reason: String,
}

/// Build the caller's ability from its current ownership graph.
///
/// - A user manages itself.
/// - A workout is managed by the user it links to.
/// - An exercise is managed if its workout is owned.
/// - A set is managed if its exercise is owned.
pub fn define_ability(caller: &Caller) -> Result<Ability, AccessError> {
    let caller_id = Uuid::from(caller.id);
    let (owned_workouts, owned_exercises) = OwnershipIndex::build(caller).into_parts();

    Ok(AbilityBuilder::new(caller.id)
        .allow(Action::Manage, ResourceType::User, Condition::FieldEquals(Field::Id, caller_id))?
        .allow(Action::Manage, ResourceType::Workout, Condition::FieldEquals(Field::UserId, caller_id))?
        .allow(Action::Manage, ResourceType::Exercise, Condition::FieldInSet(Field::WorkoutId, owned_workouts))?
        .allow(Action::Manage, ResourceType::Set, Condition::FieldInSet(Field::ExerciseId, owned_exercises))?
        .build())
}

#[cfg(test)]
mod tests {
    use liftlog_core::{ExerciseId, WorkoutId};
    use proptest::prelude::*;

    use super::*;
    use crate::caller::{OwnedExercise, OwnedWorkout};

    fn uuid(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    const USER_1: u128 = 1;
    const USER_2: u128 = 2;
    const WORKOUT_1: u128 = 11;
    const EXERCISE_1: u128 = 21;
    const SET_1: u128 = 31;

    /// user-1 owns workout-1 → exercise-1 → set-1.
    fn user_1() -> Caller {
        Caller::new(UserId::from_uuid(uuid(USER_1))).with_workout(
            OwnedWorkout::new(WorkoutId::from_uuid(uuid(WORKOUT_1))).with_exercise(
                OwnedExercise::new(ExerciseId::from_uuid(uuid(EXERCISE_1)))
                    .with_set(liftlog_core::SetId::from_uuid(uuid(SET_1))),
            ),
        )
    }

    fn set_1() -> SubjectInstance {
        SubjectInstance::new(ResourceType::Set, uuid(SET_1), uuid(EXERCISE_1))
    }

    #[test]
    fn owner_manages_nested_set() {
        let ability = define_ability(&user_1()).unwrap();
        assert!(ability.can(Action::Manage, &set_1()));
    }

    #[test]
    fn other_user_cannot_manage_set() {
        let ability = define_ability(&Caller::new(UserId::from_uuid(uuid(USER_2)))).unwrap();
        assert!(ability.cannot(Action::Manage, &set_1()));
    }

    #[test]
    fn caller_without_workouts_is_denied_exercise_in_foreign_workout() {
        let ability = define_ability(&Caller::new(UserId::new())).unwrap();
        let exercise = SubjectInstance::new(ResourceType::Exercise, uuid(500), uuid(99));
        assert!(!ability.can(Action::Manage, &exercise));
    }

    #[test]
    fn user_manages_only_itself() {
        let ability = define_ability(&user_1()).unwrap();
        assert!(ability.can(Action::Manage, &SubjectInstance::user(uuid(USER_1))));
        assert!(!ability.can(Action::Manage, &SubjectInstance::user(uuid(USER_2))));
    }

    #[test]
    fn manage_rules_cover_narrower_actions() {
        let ability = define_ability(&user_1()).unwrap();
        for action in [Action::Read, Action::Update, Action::Delete] {
            assert!(ability.can(action, &set_1()));
        }
    }

    #[test]
    fn subject_without_rules_fails_closed() {
        let ability = AbilityBuilder::new(UserId::new())
            .allow(Action::Manage, ResourceType::User, Condition::FieldEquals(Field::Id, uuid(1)))
            .unwrap()
            .build();
        let workout = SubjectInstance::new(ResourceType::Workout, uuid(2), uuid(1));
        assert!(!ability.can(Action::Manage, &workout));

        let explanation = ability.explain(Action::Manage, &workout);
        assert!(!explanation.granted);
        assert_eq!(explanation.rules_considered, 0);
    }

    #[test]
    fn rule_on_missing_field_is_rejected_at_construction() {
        let result = AbilityBuilder::new(UserId::new()).allow(
            Action::Manage,
            ResourceType::Set,
            Condition::FieldEquals(Field::WorkoutId, uuid(1)),
        );
        assert!(matches!(
            result,
            Err(AccessError::InvalidRule { subject: ResourceType::Set, field: Field::WorkoutId })
        ));
    }

    #[test]
    fn additional_rules_are_ored() {
        let ability = AbilityBuilder::new(UserId::new())
            .allow(Action::Read, ResourceType::Workout, Condition::FieldEquals(Field::UserId, uuid(1)))
            .unwrap()
            .allow(Action::Read, ResourceType::Workout, Condition::FieldInSet(Field::Id, HashSet::from([uuid(7)])))
            .unwrap()
            .build();

        let shared = SubjectInstance::new(ResourceType::Workout, uuid(7), uuid(2));
        assert!(ability.can(Action::Read, &shared));
        assert!(!ability.can(Action::Delete, &shared));
        assert_eq!(ability.rules_for(ResourceType::Workout).len(), 2);
    }

    #[test]
    fn explanation_names_matching_condition() {
        let ability = define_ability(&user_1()).unwrap();
        let explanation = ability.explain(Action::Manage, &set_1());
        assert!(explanation.granted);
        assert_eq!(explanation.rules_considered, 1);
        assert_eq!(explanation.matched_condition.as_deref(), Some("exercise_id in <1 owned ids>"));
    }

    fn caller_strategy() -> impl Strategy<Value = Caller> {
        (
            0u128..4,
            prop::collection::vec((0u128..16, prop::collection::vec(0u128..32, 0..4)), 0..4),
        )
            .prop_map(|(user, workouts)| Caller {
                id: UserId::from_uuid(uuid(user)),
                workouts: workouts
                    .into_iter()
                    .map(|(w, exercises)| OwnedWorkout {
                        id: WorkoutId::from_uuid(uuid(w)),
                        exercises: exercises
                            .into_iter()
                            .map(|e| OwnedExercise::new(ExerciseId::from_uuid(uuid(e))))
                            .collect(),
                    })
                    .collect(),
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: a workout is manageable iff it links to the caller.
        #[test]
        fn workout_ownership_is_user_link(caller in caller_strategy(), id in 0u128..16, owner in 0u128..4) {
            let ability = define_ability(&caller).unwrap();
            let workout = SubjectInstance::new(ResourceType::Workout, uuid(id), uuid(owner));
            prop_assert_eq!(ability.can(Action::Manage, &workout), uuid(owner) == Uuid::from(caller.id));
        }

        /// Property: an exercise is manageable iff its workout is one of the caller's.
        #[test]
        fn exercise_ownership_is_workout_membership(caller in caller_strategy(), id in 0u128..32, workout in 0u128..16) {
            let ability = define_ability(&caller).unwrap();
            let exercise = SubjectInstance::new(ResourceType::Exercise, uuid(id), uuid(workout));
            let expected = caller.workouts.iter().any(|w| Uuid::from(w.id) == uuid(workout));
            prop_assert_eq!(ability.can(Action::Manage, &exercise), expected);
        }

        /// Property: a set is manageable iff its exercise belongs to one of the caller's workouts.
        #[test]
        fn set_ownership_is_exercise_membership(caller in caller_strategy(), id in 0u128..64, exercise in 0u128..32) {
            let ability = define_ability(&caller).unwrap();
            let set = SubjectInstance::new(ResourceType::Set, uuid(id), uuid(exercise));
            let expected = caller
                .workouts
                .iter()
                .flat_map(|w| &w.exercises)
                .any(|e| Uuid::from(e.id) == uuid(exercise));
            prop_assert_eq!(ability.can(Action::Manage, &set), expected);
        }

        /// Property: with no workouts, no exercise or set is manageable.
        #[test]
        fn empty_caller_manages_no_children(user in 0u128..4, id in 0u128..64, parent in 0u128..64) {
            let ability = define_ability(&Caller::new(UserId::from_uuid(uuid(user)))).unwrap();
            prop_assert!(!ability.can(Action::Manage, &SubjectInstance::new(ResourceType::Exercise, uuid(id), uuid(parent))));
            prop_assert!(!ability.can(Action::Manage, &SubjectInstance::new(ResourceType::Set, uuid(id), uuid(parent))));
        }

        /// Property: abilities built from the same snapshot decide identically.
        #[test]
        fn abilities_from_same_snapshot_agree(caller in caller_strategy(), id in 0u128..32, parent in 0u128..32) {
            let first = define_ability(&caller).unwrap();
            let second = define_ability(&caller).unwrap();
            for subject in ResourceType::ALL {
                let instance = SubjectInstance::new(subject, uuid(id), uuid(parent));
                prop_assert_eq!(first.can(Action::Manage, &instance), second.can(Action::Manage, &instance));
            }
        }
    }
}
