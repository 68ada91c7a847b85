use chrono::Utc;
use tracing::{debug, warn};

use super::domain::{Project, ProjectFilter, ProjectId};
use crate::marketplace::error::MatchingError;

/// Stored project paired with the revision it was read at.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionedProject {
    pub project: Project,
    pub version: u64,
}

/// Storage abstraction so the services can be exercised against any backend.
///
/// Every successful write bumps the document version; `compare_and_swap` only
/// succeeds against the version the caller read.
pub trait ProjectStore: Send + Sync {
    fn insert(&self, project: Project) -> Result<VersionedProject, StoreError>;
    fn fetch(&self, id: &ProjectId) -> Result<Option<VersionedProject>, StoreError>;
    fn list(&self, filter: &ProjectFilter) -> Result<Vec<Project>, StoreError>;
    fn compare_and_swap(
        &self,
        project: Project,
        expected_version: u64,
    ) -> Result<VersionedProject, StoreError>;
    /// Returns whether a document was removed.
    fn remove(&self, id: &ProjectId) -> Result<bool, StoreError>;
}

/// Error enumeration for storage failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("document changed concurrently (expected version {expected}, found {found})")]
    VersionMismatch { expected: u64, found: u64 },
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Result of applying an in-memory change to a freshly read document.
pub(crate) enum Mutation<T> {
    Write(T),
    Unchanged(T),
}

/// Optimistic read-modify-write against a single project document.
///
/// `change` runs against the latest stored copy on every attempt, so checks it
/// makes (duplicates, status rules) always see committed state. Either the whole
/// change lands in one `compare_and_swap` or nothing is written.
pub(crate) fn read_modify_write<S, T, F>(
    store: &S,
    id: &ProjectId,
    max_attempts: u32,
    mut change: F,
) -> Result<(T, Project), MatchingError>
where
    S: ProjectStore + ?Sized,
    F: FnMut(&mut Project) -> Result<Mutation<T>, MatchingError>,
{
    let attempts = max_attempts.max(1);
    for attempt in 1..=attempts {
        let current = store
            .fetch(id)?
            .ok_or_else(|| MatchingError::project_not_found(id))?;
        let mut project = current.project.clone();

        let value = match change(&mut project)? {
            Mutation::Unchanged(value) => return Ok((value, current.project)),
            Mutation::Write(value) => value,
        };
        project.updated_at = Utc::now();

        match store.compare_and_swap(project, current.version) {
            Ok(stored) => return Ok((value, stored.project)),
            Err(StoreError::VersionMismatch { expected, found }) => {
                debug!(project_id = %id, attempt, expected, found, "write lost race, retrying");
            }
            Err(StoreError::NotFound) => return Err(MatchingError::project_not_found(id)),
            Err(other) => return Err(other.into()),
        }
    }

    warn!(project_id = %id, attempts, "giving up after repeated write conflicts");
    Err(MatchingError::Conflict(format!(
        "project `{id}` was modified concurrently; retry the request"
    )))
}
