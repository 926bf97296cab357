//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug + Into<uuid::Uuid>;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}

/// An entity that hangs off exactly one parent in the ownership hierarchy.
///
/// Users are the roots of the hierarchy and do not implement this.
pub trait OwnedEntity: Entity {
    /// Identifier of the owning parent (user for workouts, workout for exercises, ...).
    type OwnerId: Copy + Eq + core::fmt::Debug + Into<uuid::Uuid>;

    fn owner_id(&self) -> Self::OwnerId;
}
