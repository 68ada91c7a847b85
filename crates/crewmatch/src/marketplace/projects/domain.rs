use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::marketplace::applications::domain::{Application, ApplicationStatus};

/// Identifier assigned to a project when it is first persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub String);

/// Reference into the contractor directory. The core never validates its shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractorId(pub String);

/// Reference into the worker directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkerId(pub String);

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ContractorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectType {
    Residential,
    Commercial,
    Industrial,
}

impl ProjectType {
    pub const LABELS: &'static [&'static str] = &["Residential", "Commercial", "Industrial"];

    pub const fn label(self) -> &'static str {
        match self {
            ProjectType::Residential => "Residential",
            ProjectType::Commercial => "Commercial",
            ProjectType::Industrial => "Industrial",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "Residential" => Some(ProjectType::Residential),
            "Commercial" => Some(ProjectType::Commercial),
            "Industrial" => Some(ProjectType::Industrial),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmploymentType {
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
    Contract,
}

impl EmploymentType {
    pub const LABELS: &'static [&'static str] = &["Full-time", "Part-time", "Contract"];

    pub const fn label(self) -> &'static str {
        match self {
            EmploymentType::FullTime => "Full-time",
            EmploymentType::PartTime => "Part-time",
            EmploymentType::Contract => "Contract",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "Full-time" => Some(EmploymentType::FullTime),
            "Part-time" => Some(EmploymentType::PartTime),
            "Contract" => Some(EmploymentType::Contract),
            _ => None,
        }
    }
}

/// Lifecycle of a posting: `draft -> active -> {completed, cancelled}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Draft,
    #[default]
    Active,
    Completed,
    Cancelled,
}

impl ProjectStatus {
    pub const LABELS: &'static [&'static str] = &["draft", "active", "completed", "cancelled"];

    pub const fn label(self) -> &'static str {
        match self {
            ProjectStatus::Draft => "draft",
            ProjectStatus::Active => "active",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "draft" => Some(ProjectStatus::Draft),
            "active" => Some(ProjectStatus::Active),
            "completed" => Some(ProjectStatus::Completed),
            "cancelled" => Some(ProjectStatus::Cancelled),
            _ => None,
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, ProjectStatus::Completed | ProjectStatus::Cancelled)
    }

    /// Forward moves only; staying in place is handled by callers as a no-op.
    pub const fn can_transition_to(self, next: ProjectStatus) -> bool {
        matches!(
            (self, next),
            (ProjectStatus::Draft, ProjectStatus::Active)
                | (ProjectStatus::Active, ProjectStatus::Completed)
                | (ProjectStatus::Active, ProjectStatus::Cancelled)
        )
    }
}

/// Planned window for the work. Either bound may be unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

/// Offered pay band per hour.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HourlyRate {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

/// Persisted project document, including its embedded applications.
///
/// The applicant counter is not stored; see [`Project::applicants_count`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub description: Option<String>,
    pub location: String,
    pub project_type: ProjectType,
    pub employment_type: EmploymentType,
    pub timeline: Option<Timeline>,
    pub hourly_rate: Option<HourlyRate>,
    pub status: ProjectStatus,
    pub contractor: ContractorId,
    pub workers: Vec<Application>,
    pub progress: u8,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn applicants_count(&self) -> usize {
        self.workers.len()
    }

    pub fn application(&self, worker: &WorkerId) -> Option<&Application> {
        self.workers
            .iter()
            .find(|application| &application.worker == worker)
    }

    pub fn has_applicant(&self, worker: &WorkerId) -> bool {
        self.application(worker).is_some()
    }

    pub fn count_with_status(&self, status: ApplicationStatus) -> usize {
        self.workers
            .iter()
            .filter(|application| application.status == status)
            .count()
    }
}

/// Unvalidated creation payload as received from callers.
///
/// Enumerations stay as raw strings so an unknown value surfaces as a validation
/// error with the offending field named, rather than a decoding failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDraft {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub project_type: Option<String>,
    #[serde(default)]
    pub employment_type: Option<String>,
    #[serde(default)]
    pub timeline: Option<Timeline>,
    #[serde(default)]
    pub hourly_rate: Option<HourlyRate>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub contractor: Option<ContractorId>,
    #[serde(default)]
    pub progress: Option<i64>,
}

/// Partial update. Absent fields leave the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub project_type: Option<String>,
    #[serde(default)]
    pub employment_type: Option<String>,
    #[serde(default)]
    pub timeline: Option<Timeline>,
    #[serde(default)]
    pub hourly_rate: Option<HourlyRate>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub contractor: Option<ContractorId>,
    #[serde(default)]
    pub progress: Option<i64>,
}

/// Listing filter. `builder` names the same party as `contractor`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFilter {
    #[serde(default)]
    pub contractor: Option<ContractorId>,
    #[serde(default)]
    pub builder: Option<ContractorId>,
}

impl ProjectFilter {
    pub fn by_contractor(contractor: ContractorId) -> Self {
        Self {
            contractor: Some(contractor),
            builder: None,
        }
    }

    pub fn matches(&self, project: &Project) -> bool {
        let contractor_ok = self
            .contractor
            .as_ref()
            .map_or(true, |contractor| contractor == &project.contractor);
        let builder_ok = self
            .builder
            .as_ref()
            .map_or(true, |builder| builder == &project.contractor);
        contractor_ok && builder_ok
    }
}
