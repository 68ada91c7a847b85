use super::projects::store::StoreError;
use super::validation::ValidationError;

/// Failure surfaced by project and application operations.
#[derive(Debug, thiserror::Error)]
pub enum MatchingError {
    #[error("{entity} `{id}` not found")]
    NotFound { entity: &'static str, id: String },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("cannot move {entity} from `{from}` to `{to}`")]
    InvalidTransition {
        entity: &'static str,
        from: &'static str,
        to: &'static str,
    },
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("storage failure: {0}")]
    Storage(StoreError),
}

impl MatchingError {
    pub fn project_not_found(id: impl ToString) -> Self {
        MatchingError::NotFound {
            entity: "project",
            id: id.to_string(),
        }
    }

    pub fn application_not_found(worker: impl ToString) -> Self {
        MatchingError::NotFound {
            entity: "application",
            id: worker.to_string(),
        }
    }

    /// Stable machine-readable tag used in HTTP error bodies.
    pub const fn kind(&self) -> &'static str {
        match self {
            MatchingError::NotFound { .. } => "not_found",
            MatchingError::Validation(_) => "validation",
            MatchingError::Conflict(_) => "conflict",
            MatchingError::InvalidTransition { .. } => "invalid_transition",
            MatchingError::Forbidden(_) => "forbidden",
            MatchingError::Storage(_) => "storage",
        }
    }
}

impl From<StoreError> for MatchingError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Conflict | StoreError::VersionMismatch { .. } => {
                MatchingError::Conflict(value.to_string())
            }
            other => MatchingError::Storage(other),
        }
    }
}
