use serde::{Deserialize, Serialize};

/// Action a caller wants to perform on a resource.
///
/// `Manage` is the catch-all: a rule granted for `Manage` covers every action.
/// The guard only asks for `Manage` today; the finer actions exist so rules can
/// be layered per action without changing evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Manage,
    Read,
    Create,
    Update,
    Delete,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Manage => "manage",
            Action::Read => "read",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }

    /// Whether a rule granted for `self` applies to a request for `requested`.
    pub fn covers(self, requested: Action) -> bool {
        self == Action::Manage || self == requested
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manage_covers_everything() {
        for a in [Action::Manage, Action::Read, Action::Create, Action::Update, Action::Delete] {
            assert!(Action::Manage.covers(a));
        }
    }

    #[test]
    fn narrow_actions_do_not_cover_manage() {
        assert!(Action::Read.covers(Action::Read));
        assert!(!Action::Read.covers(Action::Manage));
        assert!(!Action::Read.covers(Action::Delete));
    }
}
