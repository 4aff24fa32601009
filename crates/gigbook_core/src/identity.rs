//! Current-user identity seam.
//!
//! # Responsibility
//! - Represent the opaque user identifier handed out by the auth provider.
//! - Let services ask "who is calling" without knowing how auth works.
//!
//! # Invariants
//! - A `UserId` is never blank.
//! - Every created event/template carries the caller's `UserId`, and every
//!   read is scoped to it.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Opaque user identifier from the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wraps a provider identifier; returns `None` for blank input.
    pub fn parse(value: impl AsRef<str>) -> Option<Self> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of the current user for every core operation.
pub trait IdentityProvider {
    /// Returns the signed-in user, or `None` when unauthenticated.
    fn current_user(&self) -> Option<UserId>;
}

/// Fixed identity, used by the CLI and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    user: Option<UserId>,
}

impl StaticIdentity {
    pub fn signed_in(user: UserId) -> Self {
        Self { user: Some(user) }
    }

    pub fn anonymous() -> Self {
        Self { user: None }
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Option<UserId> {
        self.user.clone()
    }
}

impl<T: IdentityProvider + ?Sized> IdentityProvider for &T {
    fn current_user(&self) -> Option<UserId> {
        (**self).current_user()
    }
}
