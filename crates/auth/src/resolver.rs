//! Static binding from resource type to the repository that fetches it.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::coercion::RawRecord;
use crate::error::{AccessError, RepositoryError};
use crate::subject::{ResourceTag, ResourceType};

/// Fetches one kind of record by identifier.
///
/// `Ok(None)` means the record does not exist; `Err` is reserved for
/// failures of the store itself.
#[async_trait]
pub trait ResourceAccessor: Send + Sync {
    async fn fetch_by_id(&self, id: Uuid) -> Result<Option<RawRecord>, RepositoryError>;
}

#[async_trait]
impl<A> ResourceAccessor for Arc<A>
where
    A: ResourceAccessor + ?Sized,
{
    async fn fetch_by_id(&self, id: Uuid) -> Result<Option<RawRecord>, RepositoryError> {
        (**self).fetch_by_id(id).await
    }
}

/// One accessor per resource type.
pub struct ResourceBindings {
    pub user: Arc<dyn ResourceAccessor>,
    pub workout: Arc<dyn ResourceAccessor>,
    pub exercise: Arc<dyn ResourceAccessor>,
    pub set: Arc<dyn ResourceAccessor>,
}

/// Resolves a resource type (or a route's raw tag) to its accessor.
///
/// Cheap to clone; shared by every request.
#[derive(Clone)]
pub struct ResourceResolver {
    bindings: Arc<ResourceBindings>,
}

impl ResourceResolver {
    pub fn new(bindings: ResourceBindings) -> Self {
        Self {
            bindings: Arc::new(bindings),
        }
    }

    pub fn resolve(&self, resource_type: ResourceType) -> &dyn ResourceAccessor {
        let accessor = match resource_type {
            ResourceType::User => &self.bindings.user,
            ResourceType::Workout => &self.bindings.workout,
            ResourceType::Exercise => &self.bindings.exercise,
            ResourceType::Set => &self.bindings.set,
        };
        accessor.as_ref()
    }

    /// Parse a declared tag and resolve it. Unknown tags are a route
    /// configuration error (`InvalidResourceType`).
    pub fn resolve_tag(
        &self,
        tag: &ResourceTag,
    ) -> Result<(ResourceType, &dyn ResourceAccessor), AccessError> {
        let resource_type: ResourceType = tag.as_str().parse()?;
        Ok((resource_type, self.resolve(resource_type)))
    }
}

impl core::fmt::Debug for ResourceResolver {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ResourceResolver")
            .field("types", &ResourceType::ALL)
            .finish()
    }
}
