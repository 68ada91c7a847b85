use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use super::access::{ContractorCapability, WorkerCapability};
use super::applications::domain::{
    Application, ApplicationList, ApplicationStatus, ApplicationSubmission,
};
use super::applications::manager::ApplicationManager;
use super::directory::{ContractorDetails, ContractorDirectory};
use super::error::MatchingError;
use super::projects::domain::{
    Project, ProjectDraft, ProjectFilter, ProjectId, ProjectPatch, WorkerId,
};
use super::projects::service::ProjectService;
use super::projects::store::ProjectStore;
use crate::config::StoreConfig;

/// Outward representation of a project.
///
/// `applicantsCount` is computed from the embedded applications and
/// `contractorDetails` is resolved from the directory at read time; neither is
/// ever read from caller input.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectView {
    #[serde(flatten)]
    pub project: Project,
    pub applicants_count: usize,
    pub contractor_details: Option<ContractorDetails>,
}

/// Facade composing the project service and the application manager behind
/// capability-checked operations.
pub struct MatchingApi<S, D> {
    projects: ProjectService<S>,
    applications: ApplicationManager<S>,
    directory: Arc<D>,
}

impl<S, D> MatchingApi<S, D>
where
    S: ProjectStore + 'static,
    D: ContractorDirectory + 'static,
{
    pub fn new(store: Arc<S>, directory: Arc<D>, config: StoreConfig) -> Self {
        Self {
            projects: ProjectService::new(store.clone(), config),
            applications: ApplicationManager::new(store, config),
            directory,
        }
    }

    pub fn projects(&self) -> &ProjectService<S> {
        &self.projects
    }

    pub fn applications(&self) -> &ApplicationManager<S> {
        &self.applications
    }

    pub fn list_projects(&self, filter: &ProjectFilter) -> Result<Vec<ProjectView>, MatchingError> {
        let projects = self.projects.list_projects(filter)?;
        Ok(projects
            .into_iter()
            .map(|project| self.view(project))
            .collect())
    }

    pub fn get_project(&self, id: &ProjectId) -> Result<ProjectView, MatchingError> {
        let project = self.projects.get_project(id)?;
        Ok(self.view(project))
    }

    /// Post a project owned by the calling contractor.
    pub fn post_project(
        &self,
        capability: &ContractorCapability,
        mut draft: ProjectDraft,
    ) -> Result<ProjectView, MatchingError> {
        if let Some(claimed) = &draft.contractor {
            if claimed != capability.contractor() {
                return Err(MatchingError::Forbidden(format!(
                    "cannot post a project on behalf of contractor `{claimed}`"
                )));
            }
        }
        draft.contractor = Some(capability.contractor().clone());

        let project = self.projects.create_project(draft)?;
        Ok(self.view(project))
    }

    pub fn update_project(
        &self,
        capability: &ContractorCapability,
        id: &ProjectId,
        patch: ProjectPatch,
    ) -> Result<ProjectView, MatchingError> {
        let existing = self.projects.get_project(id)?;
        capability.ensure_owns(&existing.contractor)?;

        let project = self.projects.update_project(id, patch)?;
        Ok(self.view(project))
    }

    /// Delete an owned project. An id that no longer resolves is treated as already deleted.
    pub fn delete_project(
        &self,
        capability: &ContractorCapability,
        id: &ProjectId,
    ) -> Result<(), MatchingError> {
        match self.projects.get_project(id) {
            Ok(existing) => capability.ensure_owns(&existing.contractor)?,
            Err(MatchingError::NotFound { .. }) => return Ok(()),
            Err(other) => return Err(other),
        }
        self.projects.delete_project(id)?;
        Ok(())
    }

    /// Apply as the calling worker. The submitted applicant profile is stored by value.
    pub fn apply_to_project(
        &self,
        capability: &WorkerCapability,
        project_id: &ProjectId,
        submission: ApplicationSubmission,
    ) -> Result<Application, MatchingError> {
        self.applications
            .apply(project_id, capability.worker(), submission)
    }

    /// Accept or reject an application on a project owned by the caller.
    pub fn review_application(
        &self,
        capability: &ContractorCapability,
        project_id: &ProjectId,
        worker: &WorkerId,
        decision: ApplicationStatus,
    ) -> Result<Application, MatchingError> {
        let project = self.projects.get_project(project_id)?;
        capability.ensure_owns(&project.contractor)?;

        self.applications
            .set_application_status(project_id, worker, decision)
    }

    /// Applications on a project owned by the caller.
    pub fn project_applications(
        &self,
        capability: &ContractorCapability,
        project_id: &ProjectId,
        status: Option<ApplicationStatus>,
    ) -> Result<ApplicationList, MatchingError> {
        let project = self.projects.get_project(project_id)?;
        capability.ensure_owns(&project.contractor)?;

        self.applications.list_applications(project_id, status)
    }

    fn view(&self, project: Project) -> ProjectView {
        let contractor_details = match self.directory.lookup(&project.contractor) {
            Ok(details) => details,
            Err(err) => {
                warn!(contractor = %project.contractor, error = %err, "contractor lookup failed");
                None
            }
        };

        ProjectView {
            applicants_count: project.applicants_count(),
            contractor_details,
            project,
        }
    }
}
