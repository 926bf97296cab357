use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use liftlog_core::{DomainError, DomainResult, Entity, UserId};

/// A registered account. Users are the roots of the ownership hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn register(
        id: UserId,
        email: impl Into<String>,
        display_name: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let email = email.into().trim().to_lowercase();
        if !is_plausible_email(&email) {
            return Err(DomainError::validation("email must look like name@domain"));
        }

        let display_name = display_name.into().trim().to_string();
        if display_name.is_empty() {
            return Err(DomainError::validation("display_name cannot be empty"));
        }

        Ok(Self {
            id,
            email,
            display_name,
            created_at,
        })
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    }
}
