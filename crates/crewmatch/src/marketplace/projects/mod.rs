//! Project postings: domain model, storage seam, and lifecycle service.

pub mod domain;
pub mod memory;
pub mod service;
pub mod store;

pub use domain::{
    ContractorId, EmploymentType, HourlyRate, Project, ProjectDraft, ProjectFilter, ProjectId,
    ProjectPatch, ProjectStatus, ProjectType, Timeline, WorkerId,
};
pub use memory::InMemoryProjectStore;
pub use service::ProjectService;
pub use store::{ProjectStore, StoreError, VersionedProject};
