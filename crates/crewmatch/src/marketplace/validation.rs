use chrono::NaiveDate;

use super::applications::domain::{ApplicantSnapshot, ApplicationSubmission};
use super::projects::domain::{
    ContractorId, EmploymentType, HourlyRate, ProjectDraft, ProjectPatch, ProjectStatus,
    ProjectType, Timeline,
};

pub const MAX_PROGRESS: i64 = 100;

/// Field-level rejection of caller input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("invalid value '{value}' for `{field}` (expected one of {allowed:?})")]
    InvalidEnumValue {
        field: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },
    #[error("hourlyRate.{bound} must be a finite, non-negative number (found {value})")]
    InvalidRate { bound: &'static str, value: f64 },
    #[error("hourlyRate.min ({min}) must not exceed hourlyRate.max ({max})")]
    InvertedRate { min: f64, max: f64 },
    #[error("timeline.startDate ({start}) must not be after timeline.endDate ({end})")]
    InvertedTimeline { start: NaiveDate, end: NaiveDate },
    #[error("progress must be between 0 and 100 (found {0})")]
    ProgressOutOfRange(i64),
    #[error("new projects must start as draft or active (found {0})")]
    InvalidInitialStatus(&'static str),
    #[error("field `{0}` cannot be changed after creation")]
    ImmutableField(&'static str),
    #[error("applicant snapshot requires a business name")]
    MissingBusinessName,
    #[error("expectedRate must be a finite, non-negative number (found {0})")]
    InvalidExpectedRate(f64),
}

/// Fully typed creation input produced from a [`ProjectDraft`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewProject {
    pub title: String,
    pub description: Option<String>,
    pub location: String,
    pub project_type: ProjectType,
    pub employment_type: EmploymentType,
    pub timeline: Option<Timeline>,
    pub hourly_rate: Option<HourlyRate>,
    pub status: ProjectStatus,
    pub contractor: ContractorId,
    pub progress: u8,
}

/// Typed form of a [`ProjectPatch`]. State-dependent checks (status moves,
/// contractor immutability) happen against the stored project.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub project_type: Option<ProjectType>,
    pub employment_type: Option<EmploymentType>,
    pub timeline: Option<Timeline>,
    pub hourly_rate: Option<HourlyRate>,
    pub status: Option<ProjectStatus>,
    pub contractor: Option<ContractorId>,
    pub progress: Option<u8>,
}

impl ValidatedPatch {
    pub fn is_empty(&self) -> bool {
        self == &ValidatedPatch::default()
    }
}

pub fn validate_draft(draft: ProjectDraft) -> Result<NewProject, ValidationError> {
    let title = required_text("title", draft.title)?;
    let location = required_text("location", draft.location)?;
    let project_type = match draft.project_type {
        Some(raw) => parse_project_type(&raw)?,
        None => return Err(ValidationError::MissingField("projectType")),
    };
    let contractor = match draft.contractor {
        Some(contractor) if !contractor.0.trim().is_empty() => contractor,
        _ => return Err(ValidationError::MissingField("contractor")),
    };
    let employment_type = match draft.employment_type {
        Some(raw) => parse_employment_type(&raw)?,
        None => return Err(ValidationError::MissingField("employmentType")),
    };

    let status = match draft.status {
        Some(raw) => parse_status(&raw)?,
        None => ProjectStatus::default(),
    };
    if !matches!(status, ProjectStatus::Draft | ProjectStatus::Active) {
        return Err(ValidationError::InvalidInitialStatus(status.label()));
    }

    let timeline = draft.timeline.map(check_timeline).transpose()?;
    let hourly_rate = draft.hourly_rate.map(check_rate).transpose()?;
    let progress = draft.progress.map(check_progress).transpose()?.unwrap_or(0);

    Ok(NewProject {
        title,
        description: optional_text(draft.description),
        location,
        project_type,
        employment_type,
        timeline,
        hourly_rate,
        status,
        contractor,
        progress,
    })
}

pub fn validate_patch(patch: ProjectPatch) -> Result<ValidatedPatch, ValidationError> {
    let title = patch
        .title
        .map(|raw| required_text("title", Some(raw)))
        .transpose()?;
    let location = patch
        .location
        .map(|raw| required_text("location", Some(raw)))
        .transpose()?;

    Ok(ValidatedPatch {
        title,
        description: patch.description,
        location,
        project_type: patch
            .project_type
            .as_deref()
            .map(parse_project_type)
            .transpose()?,
        employment_type: patch
            .employment_type
            .as_deref()
            .map(parse_employment_type)
            .transpose()?,
        timeline: patch.timeline.map(check_timeline).transpose()?,
        hourly_rate: patch.hourly_rate.map(check_rate).transpose()?,
        status: patch.status.as_deref().map(parse_status).transpose()?,
        contractor: patch.contractor,
        progress: patch.progress.map(check_progress).transpose()?,
    })
}

/// Normalizes the applicant snapshot that is copied into the application.
pub fn validate_submission(
    submission: ApplicationSubmission,
) -> Result<ApplicationSubmission, ValidationError> {
    let ApplicationSubmission {
        applicant,
        cover_letter,
        expected_rate,
    } = submission;

    let business_name = applicant.business_name.trim().to_string();
    if business_name.is_empty() {
        return Err(ValidationError::MissingBusinessName);
    }
    if let Some(rate) = expected_rate {
        if !rate.is_finite() || rate < 0.0 {
            return Err(ValidationError::InvalidExpectedRate(rate));
        }
    }

    Ok(ApplicationSubmission {
        applicant: ApplicantSnapshot {
            business_name,
            ..applicant
        },
        cover_letter: optional_text(cover_letter),
        expected_rate,
    })
}

fn required_text(field: &'static str, value: Option<String>) -> Result<String, ValidationError> {
    match value {
        Some(raw) if !raw.trim().is_empty() => Ok(raw.trim().to_string()),
        _ => Err(ValidationError::MissingField(field)),
    }
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}

fn parse_project_type(raw: &str) -> Result<ProjectType, ValidationError> {
    ProjectType::parse(raw).ok_or_else(|| ValidationError::InvalidEnumValue {
        field: "projectType",
        value: raw.to_string(),
        allowed: ProjectType::LABELS,
    })
}

fn parse_employment_type(raw: &str) -> Result<EmploymentType, ValidationError> {
    EmploymentType::parse(raw).ok_or_else(|| ValidationError::InvalidEnumValue {
        field: "employmentType",
        value: raw.to_string(),
        allowed: EmploymentType::LABELS,
    })
}

fn parse_status(raw: &str) -> Result<ProjectStatus, ValidationError> {
    ProjectStatus::parse(raw).ok_or_else(|| ValidationError::InvalidEnumValue {
        field: "status",
        value: raw.to_string(),
        allowed: ProjectStatus::LABELS,
    })
}

fn check_rate(rate: HourlyRate) -> Result<HourlyRate, ValidationError> {
    for (bound, value) in [("min", rate.min), ("max", rate.max)] {
        if let Some(value) = value {
            if !value.is_finite() || value < 0.0 {
                return Err(ValidationError::InvalidRate { bound, value });
            }
        }
    }
    if let (Some(min), Some(max)) = (rate.min, rate.max) {
        if min > max {
            return Err(ValidationError::InvertedRate { min, max });
        }
    }
    Ok(rate)
}

fn check_timeline(timeline: Timeline) -> Result<Timeline, ValidationError> {
    if let (Some(start), Some(end)) = (timeline.start_date, timeline.end_date) {
        if start > end {
            return Err(ValidationError::InvertedTimeline { start, end });
        }
    }
    Ok(timeline)
}

fn check_progress(progress: i64) -> Result<u8, ValidationError> {
    if (0..=MAX_PROGRESS).contains(&progress) {
        Ok(progress as u8)
    } else {
        Err(ValidationError::ProgressOutOfRange(progress))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ProjectDraft {
        ProjectDraft {
            title: Some("Site Engineer".to_string()),
            location: Some("Pune".to_string()),
            project_type: Some("Commercial".to_string()),
            employment_type: Some("Contract".to_string()),
            contractor: Some(ContractorId("C1".to_string())),
            ..ProjectDraft::default()
        }
    }

    #[test]
    fn draft_defaults_to_active_with_zero_progress() {
        let project = validate_draft(draft()).expect("valid draft");
        assert_eq!(project.status, ProjectStatus::Active);
        assert_eq!(project.progress, 0);
        assert_eq!(project.project_type, ProjectType::Commercial);
        assert_eq!(project.employment_type, EmploymentType::Contract);
    }

    #[test]
    fn each_required_field_is_reported_by_name() {
        let cases: [(&str, fn(&mut ProjectDraft)); 5] = [
            ("title", |d| d.title = None),
            ("location", |d| d.location = Some("   ".to_string())),
            ("projectType", |d| d.project_type = None),
            ("contractor", |d| d.contractor = None),
            ("employmentType", |d| d.employment_type = None),
        ];

        for (field, clear) in cases {
            let mut candidate = draft();
            clear(&mut candidate);
            assert_eq!(
                validate_draft(candidate),
                Err(ValidationError::MissingField(field))
            );
        }
    }

    #[test]
    fn unknown_enum_values_name_the_field() {
        let mut candidate = draft();
        candidate.employment_type = Some("Freelance".to_string());
        match validate_draft(candidate) {
            Err(ValidationError::InvalidEnumValue { field, value, .. }) => {
                assert_eq!(field, "employmentType");
                assert_eq!(value, "Freelance");
            }
            other => panic!("expected enum error, got {other:?}"),
        }
    }

    #[test]
    fn enum_literals_are_case_sensitive() {
        let mut candidate = draft();
        candidate.project_type = Some("commercial".to_string());
        assert!(matches!(
            validate_draft(candidate),
            Err(ValidationError::InvalidEnumValue {
                field: "projectType",
                ..
            })
        ));
    }

    #[test]
    fn inverted_rate_range_is_rejected() {
        let mut candidate = draft();
        candidate.hourly_rate = Some(HourlyRate {
            min: Some(40.0),
            max: Some(25.0),
        });
        assert_eq!(
            validate_draft(candidate),
            Err(ValidationError::InvertedRate {
                min: 40.0,
                max: 25.0
            })
        );
    }

    #[test]
    fn partial_rate_and_open_timeline_are_accepted() {
        let mut candidate = draft();
        candidate.hourly_rate = Some(HourlyRate {
            min: Some(30.0),
            max: None,
        });
        candidate.timeline = Some(Timeline {
            start_date: NaiveDate::from_ymd_opt(2025, 1, 6),
            end_date: None,
        });
        let project = validate_draft(candidate).expect("valid draft");
        assert_eq!(project.hourly_rate.and_then(|rate| rate.min), Some(30.0));
    }

    #[test]
    fn negative_rate_bound_is_rejected() {
        let mut candidate = draft();
        candidate.hourly_rate = Some(HourlyRate {
            min: Some(-1.0),
            max: None,
        });
        assert!(matches!(
            validate_draft(candidate),
            Err(ValidationError::InvalidRate { bound: "min", .. })
        ));
    }

    #[test]
    fn terminal_initial_status_is_rejected() {
        let mut candidate = draft();
        candidate.status = Some("completed".to_string());
        assert_eq!(
            validate_draft(candidate),
            Err(ValidationError::InvalidInitialStatus("completed"))
        );
    }

    #[test]
    fn progress_must_stay_within_percent_range() {
        let mut candidate = draft();
        candidate.progress = Some(101);
        assert_eq!(
            validate_draft(candidate),
            Err(ValidationError::ProgressOutOfRange(101))
        );
    }

    #[test]
    fn patch_rejects_blank_title_but_keeps_absent_fields_empty() {
        let blank = ProjectPatch {
            title: Some(" ".to_string()),
            ..ProjectPatch::default()
        };
        assert_eq!(
            validate_patch(blank),
            Err(ValidationError::MissingField("title"))
        );

        let empty = validate_patch(ProjectPatch::default()).expect("empty patch");
        assert!(empty.is_empty());
    }

    #[test]
    fn submission_requires_business_name() {
        let submission = ApplicationSubmission {
            applicant: ApplicantSnapshot {
                business_name: "  ".to_string(),
                ..ApplicantSnapshot::default()
            },
            cover_letter: None,
            expected_rate: None,
        };
        assert_eq!(
            validate_submission(submission),
            Err(ValidationError::MissingBusinessName)
        );
    }
}
