use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{Application, ApplicationList, ApplicationStatus, ApplicationSubmission};
use crate::config::StoreConfig;
use crate::marketplace::error::MatchingError;
use crate::marketplace::projects::domain::{ProjectId, ProjectStatus, WorkerId};
use crate::marketplace::projects::store::{read_modify_write, Mutation, ProjectStore};
use crate::marketplace::validation::validate_submission;

/// Maintains the applications embedded in each project document.
///
/// Every change is a single versioned write of the parent project, so the
/// application list and the applicant count it implies can never disagree.
pub struct ApplicationManager<S> {
    store: Arc<S>,
    config: StoreConfig,
}

impl<S> ApplicationManager<S>
where
    S: ProjectStore + 'static,
{
    pub fn new(store: Arc<S>, config: StoreConfig) -> Self {
        Self { store, config }
    }

    /// Append a pending application for `worker`.
    pub fn apply(
        &self,
        project_id: &ProjectId,
        worker: &WorkerId,
        submission: ApplicationSubmission,
    ) -> Result<Application, MatchingError> {
        let submission = validate_submission(submission)?;

        let (application, project) = read_modify_write(
            &*self.store,
            project_id,
            self.config.max_write_attempts,
            |project| {
                if project.status != ProjectStatus::Active {
                    return Err(MatchingError::Conflict(format!(
                        "project `{}` is not accepting applications (status `{}`)",
                        project.id,
                        project.status.label()
                    )));
                }
                if project.has_applicant(worker) {
                    return Err(MatchingError::Conflict(format!(
                        "worker `{worker}` already applied to project `{}`",
                        project.id
                    )));
                }

                let application = Application::new(worker.clone(), submission.clone(), Utc::now());
                project.workers.push(application.clone());
                Ok(Mutation::Write(application))
            },
        )?;

        info!(
            project_id = %project_id,
            worker = %worker,
            applicants = project.applicants_count(),
            "application submitted"
        );
        Ok(application)
    }

    /// Move an application out of `pending`. Re-sending the current status is a no-op.
    pub fn set_application_status(
        &self,
        project_id: &ProjectId,
        worker: &WorkerId,
        status: ApplicationStatus,
    ) -> Result<Application, MatchingError> {
        let (application, _) = read_modify_write(
            &*self.store,
            project_id,
            self.config.max_write_attempts,
            |project| {
                let application = project
                    .workers
                    .iter_mut()
                    .find(|application| &application.worker == worker)
                    .ok_or_else(|| MatchingError::application_not_found(worker))?;

                if application.status == status {
                    return Ok(Mutation::Unchanged(application.clone()));
                }
                if application.status.is_terminal() {
                    return Err(MatchingError::InvalidTransition {
                        entity: "application",
                        from: application.status.label(),
                        to: status.label(),
                    });
                }

                application.status = status;
                Ok(Mutation::Write(application.clone()))
            },
        )?;

        info!(
            project_id = %project_id,
            worker = %worker,
            status = application.status.label(),
            "application reviewed"
        );
        Ok(application)
    }

    /// Applications in the order they were submitted, optionally narrowed by status.
    pub fn list_applications(
        &self,
        project_id: &ProjectId,
        status: Option<ApplicationStatus>,
    ) -> Result<ApplicationList, MatchingError> {
        let stored = self
            .store
            .fetch(project_id)?
            .ok_or_else(|| MatchingError::project_not_found(project_id))?;
        Ok(ApplicationList::new(
            project_id.clone(),
            status,
            stored.project.workers,
        ))
    }
}
