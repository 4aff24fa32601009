//! Service-level error taxonomy.
//!
//! # Invariants
//! - `Validation` errors are raised before any store write.
//! - `Unauthenticated` is raised before the store is touched at all.
//! - Store failures are surfaced as-is and never retried.

use crate::model::validation::ValidationError;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type CoreResult<T> = Result<T, CoreError>;

/// Error returned by every ledger, checklist and template operation.
#[derive(Debug)]
pub enum CoreError {
    /// Bad input; nothing was written.
    Validation(ValidationError),
    /// The id does not resolve for the current user.
    NotFound { entity: &'static str, id: Uuid },
    /// The identity provider yielded no user.
    Unauthenticated,
    /// Any other persistence failure.
    Store(RepoError),
}

impl CoreError {
    /// Stable short code used in log lines and toasts.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound { .. } => "not_found",
            Self::Unauthenticated => "unauthenticated",
            Self::Store(_) => "store",
        }
    }
}

impl Display for CoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Unauthenticated => write!(f, "no signed-in user"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for CoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for CoreError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound { entity, id } => Self::NotFound { entity, id },
            other => Self::Store(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CoreError;
    use crate::model::validation::ValidationError;
    use crate::repo::RepoError;
    use uuid::Uuid;

    #[test]
    fn repo_errors_map_to_semantic_variants() {
        let id = Uuid::new_v4();
        let not_found: CoreError = RepoError::NotFound { entity: "event", id }.into();
        assert!(matches!(not_found, CoreError::NotFound { entity: "event", id: found } if found == id));

        let validation: CoreError = RepoError::Validation(ValidationError::NilId).into();
        assert!(matches!(validation, CoreError::Validation(ValidationError::NilId)));

        let store: CoreError = RepoError::InvalidData("bad".to_string()).into();
        assert_eq!(store.code(), "store");
    }
}
