//! `liftlog-auth` — resource-ownership authorization core.
//!
//! This crate is intentionally decoupled from HTTP and storage: repositories
//! and the caller's ownership graph come in through the ports in
//! [`resolver`] and [`ownership`].

pub mod ability;
pub mod action;
pub mod caller;
pub mod coercion;
pub mod error;
pub mod guard;
pub mod ownership;
pub mod resolver;
pub mod subject;

pub use ability::{Ability, AbilityBuilder, Condition, DecisionExplanation, Rule, define_ability};
pub use action::Action;
pub use caller::{Caller, OwnedExercise, OwnedWorkout};
pub use coercion::{RawRecord, to_entity};
pub use error::{AccessError, Denial, DenialKind, RepositoryError};
pub use guard::{AccessContext, AuthorizationGuard, Decision};
pub use ownership::{OwnershipGraphReader, OwnershipIndex, OwnershipSource, SequentialOwnership};
pub use resolver::{ResourceAccessor, ResourceBindings, ResourceResolver};
pub use subject::{Field, ResourceTag, ResourceType, SubjectInstance};
