use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{Project, ProjectDraft, ProjectFilter, ProjectId, ProjectPatch};
use super::store::{read_modify_write, Mutation, ProjectStore, StoreError};
use crate::config::StoreConfig;
use crate::marketplace::error::MatchingError;
use crate::marketplace::validation::{
    validate_draft, validate_patch, ValidatedPatch, ValidationError,
};

static PROJECT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_project_id() -> ProjectId {
    let id = PROJECT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ProjectId(format!("prj-{id:06}"))
}

/// Project lifecycle operations on top of a [`ProjectStore`].
pub struct ProjectService<S> {
    store: Arc<S>,
    config: StoreConfig,
}

impl<S> ProjectService<S>
where
    S: ProjectStore + 'static,
{
    pub fn new(store: Arc<S>, config: StoreConfig) -> Self {
        Self { store, config }
    }

    pub fn list_projects(&self, filter: &ProjectFilter) -> Result<Vec<Project>, MatchingError> {
        Ok(self.store.list(filter)?)
    }

    pub fn get_project(&self, id: &ProjectId) -> Result<Project, MatchingError> {
        self.store
            .fetch(id)?
            .map(|stored| stored.project)
            .ok_or_else(|| MatchingError::project_not_found(id))
    }

    /// Validate and persist a new project. Nothing is stored when validation fails.
    pub fn create_project(&self, draft: ProjectDraft) -> Result<Project, MatchingError> {
        let new_project = validate_draft(draft)?;
        let now = Utc::now();

        let project = Project {
            id: next_project_id(),
            title: new_project.title,
            description: new_project.description,
            location: new_project.location,
            project_type: new_project.project_type,
            employment_type: new_project.employment_type,
            timeline: new_project.timeline,
            hourly_rate: new_project.hourly_rate,
            status: new_project.status,
            contractor: new_project.contractor,
            workers: Vec::new(),
            progress: new_project.progress,
            created_at: now,
            updated_at: now,
        };

        let stored = self.store.insert(project)?;
        info!(
            project_id = %stored.project.id,
            contractor = %stored.project.contractor,
            status = stored.project.status.label(),
            "project created"
        );
        Ok(stored.project)
    }

    /// Merge the present fields of `patch` into the stored project.
    pub fn update_project(
        &self,
        id: &ProjectId,
        patch: ProjectPatch,
    ) -> Result<Project, MatchingError> {
        let patch = validate_patch(patch)?;
        if patch.is_empty() {
            return self.get_project(id);
        }

        let (_, project) =
            read_modify_write(&*self.store, id, self.config.max_write_attempts, |project| {
                apply_patch(project, &patch)?;
                Ok(Mutation::Write(()))
            })?;

        info!(project_id = %project.id, status = project.status.label(), "project updated");
        Ok(project)
    }

    /// Remove the project with its applications. Deleting an absent id succeeds.
    pub fn delete_project(&self, id: &ProjectId) -> Result<bool, MatchingError> {
        let removed = match self.store.remove(id) {
            Ok(removed) => removed,
            Err(StoreError::NotFound) => false,
            Err(other) => return Err(other.into()),
        };
        if removed {
            info!(project_id = %id, "project deleted");
        }
        Ok(removed)
    }
}

fn apply_patch(project: &mut Project, patch: &ValidatedPatch) -> Result<(), MatchingError> {
    if let Some(contractor) = &patch.contractor {
        if contractor != &project.contractor {
            return Err(ValidationError::ImmutableField("contractor").into());
        }
    }

    if let Some(next) = patch.status {
        if next != project.status && !project.status.can_transition_to(next) {
            return Err(MatchingError::InvalidTransition {
                entity: "project",
                from: project.status.label(),
                to: next.label(),
            });
        }
        project.status = next;
    }

    if let Some(title) = &patch.title {
        project.title = title.clone();
    }
    if let Some(description) = &patch.description {
        let trimmed = description.trim();
        project.description = (!trimmed.is_empty()).then(|| trimmed.to_string());
    }
    if let Some(location) = &patch.location {
        project.location = location.clone();
    }
    if let Some(project_type) = patch.project_type {
        project.project_type = project_type;
    }
    if let Some(employment_type) = patch.employment_type {
        project.employment_type = employment_type;
    }
    if let Some(timeline) = patch.timeline {
        project.timeline = Some(timeline);
    }
    if let Some(hourly_rate) = patch.hourly_rate {
        project.hourly_rate = Some(hourly_rate);
    }
    if let Some(progress) = patch.progress {
        project.progress = progress;
    }
    Ok(())
}
