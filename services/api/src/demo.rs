use crate::infra::InMemoryContractorDirectory;
use chrono::{Duration, Local, NaiveDate};
use clap::Args;
use crewmatch::config::StoreConfig;
use crewmatch::error::AppError;
use crewmatch::marketplace::{
    ApplicantSnapshot, ApplicationStatus, ApplicationSubmission, ContractorDetails, ContractorId,
    HourlyRate, Identity, InMemoryProjectStore, MatchingApi, MatchingError, ProjectDraft,
    ProjectView, Timeline, WorkerId,
};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Project start date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) start_date: Option<NaiveDate>,
    /// Planned length of the engagement in days.
    #[arg(long, default_value_t = 90)]
    pub(crate) duration_days: i64,
    /// Print the final project document as JSON.
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        start_date,
        duration_days,
        json,
    } = args;
    let start_date = start_date.unwrap_or_else(|| Local::now().date_naive());
    let end_date = Duration::try_days(duration_days.max(0))
        .and_then(|span| start_date.checked_add_signed(span))
        .ok_or_else(|| {
            AppError::InvalidArgument(format!(
                "--duration-days {duration_days} overflows the calendar from {start_date}"
            ))
        })?;

    let contractor = ContractorId("C1".to_string());
    let directory = InMemoryContractorDirectory::from_profiles(vec![ContractorDetails {
        id: contractor.clone(),
        business_name: "Deshmukh Builders".to_string(),
        business_type: Some("Commercial builder".to_string()),
        phone_number: Some("+91 20 5550 1200".to_string()),
        email: Some("hiring@deshmukh.example".to_string()),
    }]);
    let api = MatchingApi::new(
        Arc::new(InMemoryProjectStore::default()),
        Arc::new(directory),
        StoreConfig::default(),
    );

    println!("Crew matching demo");
    let owner = Identity::Contractor(contractor).contractor()?;
    let posted = api.post_project(
        &owner,
        ProjectDraft {
            title: Some("Site Engineer".to_string()),
            description: Some("Supervise slab work for a four-storey office block.".to_string()),
            location: Some("Pune".to_string()),
            project_type: Some("Commercial".to_string()),
            employment_type: Some("Contract".to_string()),
            timeline: Some(Timeline {
                start_date: Some(start_date),
                end_date: Some(end_date),
            }),
            hourly_rate: Some(HourlyRate {
                min: Some(30.0),
                max: Some(45.0),
            }),
            ..ProjectDraft::default()
        },
    )?;
    let project_id = posted.project.id.clone();
    print_project("Posted", &posted);

    let crews = [
        ("W1", "Patil Electricals", "Electrical"),
        ("W2", "Rao Plumbing Works", "Plumbing"),
    ];
    for (worker, business_name, trade) in crews {
        let capability = Identity::Worker(WorkerId(worker.to_string())).worker()?;
        let application = api.apply_to_project(
            &capability,
            &project_id,
            ApplicationSubmission {
                applicant: ApplicantSnapshot {
                    business_name: business_name.to_string(),
                    business_type: Some(trade.to_string()),
                    years_of_experience: Some(8),
                    ..ApplicantSnapshot::default()
                },
                cover_letter: Some(format!("{business_name} can start on {start_date}.")),
                expected_rate: Some(38.0),
            },
        )?;
        println!(
            "  {} applied as {} ({})",
            application.worker,
            application.applicant.business_name,
            application.status.label()
        );
    }

    let repeat = Identity::Worker(WorkerId("W1".to_string())).worker()?;
    report_refusal(
        "Second application from W1",
        api.apply_to_project(
            &repeat,
            &project_id,
            ApplicationSubmission {
                applicant: ApplicantSnapshot {
                    business_name: "Patil Electricals".to_string(),
                    ..ApplicantSnapshot::default()
                },
                cover_letter: None,
                expected_rate: None,
            },
        ),
    );

    let accepted = api.review_application(
        &owner,
        &project_id,
        &WorkerId("W1".to_string()),
        ApplicationStatus::Accepted,
    )?;
    let rejected = api.review_application(
        &owner,
        &project_id,
        &WorkerId("W2".to_string()),
        ApplicationStatus::Rejected,
    )?;
    println!(
        "  Reviewed: {} {}, {} {}",
        accepted.worker,
        accepted.status.label(),
        rejected.worker,
        rejected.status.label()
    );

    report_refusal(
        "Rejecting accepted W1",
        api.review_application(
            &owner,
            &project_id,
            &WorkerId("W1".to_string()),
            ApplicationStatus::Rejected,
        ),
    );

    let final_view = api.get_project(&project_id)?;
    print_project("Final", &final_view);
    if json {
        match serde_json::to_string_pretty(&final_view) {
            Ok(rendered) => println!("{rendered}"),
            Err(err) => println!("  (unable to render project JSON: {err})"),
        }
    }

    Ok(())
}

fn print_project(heading: &str, view: &ProjectView) {
    let project = &view.project;
    let contractor = view
        .contractor_details
        .as_ref()
        .map(|details| details.business_name.as_str())
        .unwrap_or("unknown contractor");
    println!(
        "\n{heading}: {} [{}] {} in {} for {}",
        project.id,
        project.status.label(),
        project.title,
        project.location,
        contractor
    );
    println!(
        "  {} / {} | applicants: {} (accepted {}, pending {})",
        project.project_type.label(),
        project.employment_type.label(),
        view.applicants_count,
        project.count_with_status(ApplicationStatus::Accepted),
        project.count_with_status(ApplicationStatus::Pending)
    );
}

fn report_refusal<T>(label: &str, outcome: Result<T, MatchingError>) {
    match outcome {
        Ok(_) => println!("  {label}: unexpectedly accepted"),
        Err(err) => println!("  {label}: refused ({}: {err})", err.kind()),
    }
}
