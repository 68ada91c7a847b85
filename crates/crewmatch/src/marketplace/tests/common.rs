use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::to_bytes;
use axum::response::Response;
use serde_json::Value;

use crate::config::StoreConfig;
use crate::marketplace::applications::domain::{ApplicantSnapshot, ApplicationSubmission};
use crate::marketplace::directory::{ContractorDetails, ContractorDirectory, DirectoryError};
use crate::marketplace::matching::MatchingApi;
use crate::marketplace::projects::domain::{
    ContractorId, Project, ProjectDraft, ProjectFilter, ProjectId, WorkerId,
};
use crate::marketplace::projects::memory::InMemoryProjectStore;
use crate::marketplace::projects::store::{ProjectStore, StoreError, VersionedProject};

pub(super) fn contractor_id() -> ContractorId {
    ContractorId("C1".to_string())
}

pub(super) fn worker_id(name: &str) -> WorkerId {
    WorkerId(name.to_string())
}

pub(super) fn draft() -> ProjectDraft {
    ProjectDraft {
        title: Some("Site Engineer".to_string()),
        location: Some("Pune".to_string()),
        project_type: Some("Commercial".to_string()),
        employment_type: Some("Contract".to_string()),
        contractor: Some(contractor_id()),
        ..ProjectDraft::default()
    }
}

pub(super) fn submission(business_name: &str) -> ApplicationSubmission {
    ApplicationSubmission {
        applicant: ApplicantSnapshot {
            business_name: business_name.to_string(),
            business_type: Some("Electrical".to_string()),
            years_of_experience: Some(7),
            license_number: Some("LIC-4471".to_string()),
            ..ApplicantSnapshot::default()
        },
        cover_letter: Some("Available from next week.".to_string()),
        expected_rate: Some(35.0),
    }
}

pub(super) fn store_config() -> StoreConfig {
    StoreConfig {
        max_write_attempts: 4,
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryDirectory {
    contractors: Arc<Mutex<HashMap<ContractorId, ContractorDetails>>>,
}

impl MemoryDirectory {
    pub(super) fn with_contractor(id: &ContractorId, business_name: &str) -> Self {
        let directory = Self::default();
        directory.contractors.lock().expect("lock").insert(
            id.clone(),
            ContractorDetails {
                id: id.clone(),
                business_name: business_name.to_string(),
                business_type: Some("General contracting".to_string()),
                phone_number: None,
                email: None,
            },
        );
        directory
    }
}

impl ContractorDirectory for MemoryDirectory {
    fn lookup(&self, id: &ContractorId) -> Result<Option<ContractorDetails>, DirectoryError> {
        Ok(self.contractors.lock().expect("lock").get(id).cloned())
    }
}

pub(super) struct OfflineDirectory;

impl ContractorDirectory for OfflineDirectory {
    fn lookup(&self, _id: &ContractorId) -> Result<Option<ContractorDetails>, DirectoryError> {
        Err(DirectoryError::Unavailable("directory offline".to_string()))
    }
}

/// Store that lets a rival writer land between our read and our write a fixed
/// number of times.
pub(super) struct RacingStore {
    pub(super) inner: InMemoryProjectStore,
    interference: AtomicU32,
}

impl RacingStore {
    pub(super) fn new(interference: u32) -> Self {
        Self {
            inner: InMemoryProjectStore::default(),
            interference: AtomicU32::new(interference),
        }
    }
}

impl ProjectStore for RacingStore {
    fn insert(&self, project: Project) -> Result<VersionedProject, StoreError> {
        self.inner.insert(project)
    }

    fn fetch(&self, id: &ProjectId) -> Result<Option<VersionedProject>, StoreError> {
        self.inner.fetch(id)
    }

    fn list(&self, filter: &ProjectFilter) -> Result<Vec<Project>, StoreError> {
        self.inner.list(filter)
    }

    fn compare_and_swap(
        &self,
        project: Project,
        expected_version: u64,
    ) -> Result<VersionedProject, StoreError> {
        let remaining = self.interference.load(Ordering::SeqCst);
        if remaining > 0 {
            self.interference.store(remaining - 1, Ordering::SeqCst);
            let rival = self
                .inner
                .fetch(&project.id)?
                .ok_or(StoreError::NotFound)?;
            let mut bumped = rival.project.clone();
            bumped.progress = bumped.progress.saturating_add(1);
            self.inner.compare_and_swap(bumped, rival.version)?;
        }
        self.inner.compare_and_swap(project, expected_version)
    }

    fn remove(&self, id: &ProjectId) -> Result<bool, StoreError> {
        self.inner.remove(id)
    }
}

/// Store whose backend is down.
pub(super) struct UnavailableStore;

impl ProjectStore for UnavailableStore {
    fn insert(&self, _project: Project) -> Result<VersionedProject, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    fn fetch(&self, _id: &ProjectId) -> Result<Option<VersionedProject>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    fn list(&self, _filter: &ProjectFilter) -> Result<Vec<Project>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    fn compare_and_swap(
        &self,
        _project: Project,
        _expected_version: u64,
    ) -> Result<VersionedProject, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    fn remove(&self, _id: &ProjectId) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

pub(super) fn build_api() -> (
    MatchingApi<InMemoryProjectStore, MemoryDirectory>,
    Arc<InMemoryProjectStore>,
) {
    let store = Arc::new(InMemoryProjectStore::default());
    let directory = Arc::new(MemoryDirectory::with_contractor(
        &contractor_id(),
        "Deshmukh Builders",
    ));
    let api = MatchingApi::new(store.clone(), directory, store_config());
    (api, store)
}

pub(super) async fn json_body(response: Response) -> Value {
    let body = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
