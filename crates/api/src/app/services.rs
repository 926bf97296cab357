use std::sync::Arc;

use liftlog_auth::{AuthorizationGuard, OwnershipSource, SequentialOwnership};
use liftlog_infra::{InMemoryTrainingStore, build_resolver};

use crate::config::{ApiConfig, OwnershipReads};

/// Shared, request-independent services.
pub struct AppServices {
    pub store: Arc<InMemoryTrainingStore>,
    pub guard: AuthorizationGuard,
}

impl AppServices {
    /// In-memory wiring (dev/test).
    pub fn in_memory(config: &ApiConfig) -> Self {
        Self::with_store(Arc::new(InMemoryTrainingStore::new()), config.ownership_reads)
    }

    pub fn with_store(store: Arc<InMemoryTrainingStore>, reads: OwnershipReads) -> Self {
        let ownership: Arc<dyn OwnershipSource> = match reads {
            OwnershipReads::Hierarchical => store.clone(),
            OwnershipReads::Sequential => Arc::new(SequentialOwnership::new(store.clone())),
        };
        let guard = AuthorizationGuard::new(build_resolver(&store), ownership);
        Self { store, guard }
    }
}
