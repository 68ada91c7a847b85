use super::common::*;
use crate::marketplace::access::Identity;
use crate::marketplace::applications::domain::ApplicationStatus;
use crate::marketplace::error::MatchingError;
use crate::marketplace::matching::MatchingApi;
use crate::marketplace::projects::domain::{ContractorId, ProjectFilter, ProjectPatch};
use crate::marketplace::projects::memory::InMemoryProjectStore;
use std::sync::Arc;

fn owner() -> Identity {
    Identity::Contractor(contractor_id())
}

fn rival() -> Identity {
    Identity::Contractor(ContractorId("C2".to_string()))
}

fn worker(name: &str) -> Identity {
    Identity::Worker(worker_id(name))
}

#[test]
fn post_project_binds_the_calling_contractor() {
    let (api, _) = build_api();
    let mut anonymous = draft();
    anonymous.contractor = None;

    let capability = owner().contractor().expect("contractor");
    let view = api.post_project(&capability, anonymous).expect("post");

    assert_eq!(view.project.contractor, contractor_id());
    assert_eq!(view.applicants_count, 0);
    let details = view.contractor_details.expect("directory entry");
    assert_eq!(details.business_name, "Deshmukh Builders");
}

#[test]
fn post_project_refuses_to_impersonate() {
    let (api, store) = build_api();
    let capability = rival().contractor().expect("contractor");

    assert!(matches!(
        api.post_project(&capability, draft()),
        Err(MatchingError::Forbidden(_))
    ));
    assert!(store.is_empty());
}

#[test]
fn only_the_owner_reviews_applications() {
    let (api, _) = build_api();
    let owner_cap = owner().contractor().expect("contractor");
    let project = api.post_project(&owner_cap, draft()).expect("post");

    let worker_cap = worker("W1").worker().expect("worker");
    api.apply_to_project(&worker_cap, &project.project.id, submission("Patil Electricals"))
        .expect("apply");

    let rival_cap = rival().contractor().expect("contractor");
    assert!(matches!(
        api.review_application(
            &rival_cap,
            &project.project.id,
            &worker_id("W1"),
            ApplicationStatus::Accepted
        ),
        Err(MatchingError::Forbidden(_))
    ));

    let reviewed = api
        .review_application(
            &owner_cap,
            &project.project.id,
            &worker_id("W1"),
            ApplicationStatus::Accepted,
        )
        .expect("owner review");
    assert_eq!(reviewed.status, ApplicationStatus::Accepted);
}

#[test]
fn workers_cannot_post_and_contractors_cannot_apply() {
    assert!(matches!(
        worker("W1").contractor(),
        Err(MatchingError::Forbidden(_))
    ));
    assert!(matches!(owner().worker(), Err(MatchingError::Forbidden(_))));
}

#[test]
fn views_report_applicant_count_from_embedded_list() {
    let (api, _) = build_api();
    let owner_cap = owner().contractor().expect("contractor");
    let project = api.post_project(&owner_cap, draft()).expect("post");

    for name in ["W1", "W2", "W3"] {
        let capability = worker(name).worker().expect("worker");
        api.apply_to_project(&capability, &project.project.id, submission("Crew"))
            .expect("apply");
    }

    let view = api.get_project(&project.project.id).expect("get");
    assert_eq!(view.applicants_count, 3);
    assert_eq!(view.project.workers.len(), 3);

    let listed = api
        .list_projects(&ProjectFilter::by_contractor(contractor_id()))
        .expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].applicants_count, 3);
}

#[test]
fn owner_scoped_update_delete_and_listing() {
    let (api, _) = build_api();
    let owner_cap = owner().contractor().expect("contractor");
    let rival_cap = rival().contractor().expect("contractor");
    let project = api.post_project(&owner_cap, draft()).expect("post");
    let id = project.project.id.clone();

    let patch = ProjectPatch {
        progress: Some(55),
        ..ProjectPatch::default()
    };
    assert!(matches!(
        api.update_project(&rival_cap, &id, patch.clone()),
        Err(MatchingError::Forbidden(_))
    ));
    let updated = api.update_project(&owner_cap, &id, patch).expect("update");
    assert_eq!(updated.project.progress, 55);

    let worker_cap = worker("W1").worker().expect("worker");
    api.apply_to_project(&worker_cap, &id, submission("Crew"))
        .expect("apply");
    assert!(matches!(
        api.project_applications(&rival_cap, &id, None),
        Err(MatchingError::Forbidden(_))
    ));
    let applications = api
        .project_applications(&owner_cap, &id, Some(ApplicationStatus::Pending))
        .expect("list");
    assert_eq!(applications.iter().count(), 1);

    assert!(matches!(
        api.delete_project(&rival_cap, &id),
        Err(MatchingError::Forbidden(_))
    ));
    api.delete_project(&owner_cap, &id).expect("delete");
    api.delete_project(&owner_cap, &id)
        .expect("deleting twice stays silent");
    assert!(matches!(
        api.get_project(&id),
        Err(MatchingError::NotFound { .. })
    ));
}

#[test]
fn directory_outage_degrades_to_missing_details() {
    let store = Arc::new(InMemoryProjectStore::default());
    let api = MatchingApi::new(store, Arc::new(OfflineDirectory), store_config());
    let capability = owner().contractor().expect("contractor");

    let view = api.post_project(&capability, draft()).expect("post");
    assert!(view.contractor_details.is_none());
}
