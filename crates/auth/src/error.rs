//! Authorization error taxonomy.
//!
//! Denials share a single shape ([`Denial`]) so the transport layer can map
//! them to status codes in one place. Everything else is either a route
//! configuration fault or a repository failure passed through untouched.

use serde::Serialize;
use thiserror::Error;

use crate::subject::{Field, ResourceType};

/// Why a request was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    CallerMissing,
    ResourceNotFound,
    PermissionDenied,
}

impl DenialKind {
    pub fn message(self) -> &'static str {
        match self {
            DenialKind::CallerMissing => "caller missing",
            DenialKind::ResourceNotFound => "resource not found",
            DenialKind::PermissionDenied => "no permission",
        }
    }
}

/// Externally visible denial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Denial {
    pub kind: DenialKind,
    pub message: String,
}

impl Denial {
    pub fn new(kind: DenialKind) -> Self {
        Self {
            kind,
            message: kind.message().to_string(),
        }
    }
}

impl core::fmt::Display for Denial {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Opaque failure raised by a repository collaborator.
#[derive(Debug, Error)]
#[error("repository error: {0}")]
pub struct RepositoryError(#[from] anyhow::Error);

impl RepositoryError {
    pub fn msg(message: impl core::fmt::Display + core::fmt::Debug + Send + Sync + 'static) -> Self {
        Self(anyhow::Error::msg(message))
    }
}

#[derive(Debug, Error)]
pub enum AccessError {
    #[error("{0}")]
    Denied(Denial),

    #[error("route does not declare a resource type")]
    ResourceTypeNotDeclared,

    #[error("invalid resource type '{0}'")]
    InvalidResourceType(String),

    #[error("unrecognized entity type '{0}'")]
    UnrecognizedEntityType(String),

    #[error("expected a {expected} record, got '{found}'")]
    EntityTypeMismatch { expected: ResourceType, found: String },

    #[error("malformed {kind} record: field '{field}' is missing or not an identifier")]
    MalformedRecord { kind: ResourceType, field: Field },

    #[error("rule for {subject} references field '{field}' that {subject} instances do not carry")]
    InvalidRule { subject: ResourceType, field: Field },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl AccessError {
    pub fn denied(kind: DenialKind) -> Self {
        Self::Denied(Denial::new(kind))
    }

    pub fn denial(&self) -> Option<&Denial> {
        match self {
            AccessError::Denied(d) => Some(d),
            _ => None,
        }
    }

    pub fn is_denial(&self) -> bool {
        self.denial().is_some()
    }
}
