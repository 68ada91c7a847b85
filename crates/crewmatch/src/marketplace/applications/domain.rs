use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::marketplace::projects::domain::{ProjectId, WorkerId};

/// Review state of a single application. `accepted` and `rejected` are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, ApplicationStatus::Accepted | ApplicationStatus::Rejected)
    }
}

/// Worker profile fields copied into the application when it is submitted.
///
/// This is a value copy taken at apply time. Later edits to the worker's profile
/// are not reflected here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantSnapshot {
    pub business_name: String,
    #[serde(default)]
    pub business_type: Option<String>,
    #[serde(default)]
    pub years_of_experience: Option<u32>,
    #[serde(default)]
    pub license_number: Option<String>,
    #[serde(default)]
    pub insurance_info: Option<String>,
    #[serde(default)]
    pub project_types: Vec<String>,
    /// Kept in whatever shape the worker profile holds it.
    #[serde(default)]
    pub address: Option<serde_json::Value>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// What a worker sends when applying to a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSubmission {
    pub applicant: ApplicantSnapshot,
    #[serde(default)]
    pub cover_letter: Option<String>,
    #[serde(default)]
    pub expected_rate: Option<f64>,
}

/// Application embedded in its parent project's `workers` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub worker: WorkerId,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    pub cover_letter: Option<String>,
    pub expected_rate: Option<f64>,
    pub applicant: ApplicantSnapshot,
}

impl Application {
    pub fn new(worker: WorkerId, submission: ApplicationSubmission, now: DateTime<Utc>) -> Self {
        Self {
            worker,
            status: ApplicationStatus::Pending,
            applied_at: now,
            cover_letter: submission.cover_letter,
            expected_rate: submission.expected_rate,
            applicant: submission.applicant,
        }
    }
}

/// Snapshot of a project's applications taken at read time.
///
/// [`ApplicationList::iter`] can be called any number of times; every call starts
/// again from the first applicant.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationList {
    project_id: ProjectId,
    status: Option<ApplicationStatus>,
    applications: Vec<Application>,
}

impl ApplicationList {
    pub(crate) fn new(
        project_id: ProjectId,
        status: Option<ApplicationStatus>,
        applications: Vec<Application>,
    ) -> Self {
        Self {
            project_id,
            status,
            applications,
        }
    }

    pub fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    pub fn status_filter(&self) -> Option<ApplicationStatus> {
        self.status
    }

    pub fn iter(&self) -> Applications<'_> {
        Applications {
            inner: self.applications.iter(),
            status: self.status,
        }
    }
}

impl<'a> IntoIterator for &'a ApplicationList {
    type Item = &'a Application;
    type IntoIter = Applications<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy, insertion-ordered walk over an [`ApplicationList`].
#[derive(Debug, Clone)]
pub struct Applications<'a> {
    inner: std::slice::Iter<'a, Application>,
    status: Option<ApplicationStatus>,
}

impl<'a> Iterator for Applications<'a> {
    type Item = &'a Application;

    fn next(&mut self) -> Option<Self::Item> {
        let status = self.status;
        self.inner
            .by_ref()
            .find(|application| status.map_or(true, |wanted| application.status == wanted))
    }
}
