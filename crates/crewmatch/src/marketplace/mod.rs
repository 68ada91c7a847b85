//! Project postings and the worker applications made against them.
//!
//! Projects are stored as single documents that embed their applications, so every
//! apply or review is one optimistic write of the parent project. The
//! [`MatchingApi`] facade adds the capability checks external callers go through,
//! and [`matching_router`] exposes it over HTTP.

pub mod access;
pub mod applications;
pub mod directory;
pub mod error;
pub mod matching;
pub mod projects;
pub mod router;
pub mod validation;

#[cfg(test)]
mod tests;

pub use access::{ContractorCapability, Identity, WorkerCapability};
pub use applications::{
    ApplicantSnapshot, Application, ApplicationList, ApplicationManager, ApplicationStatus,
    ApplicationSubmission, Applications,
};
pub use directory::{ContractorDetails, ContractorDirectory, DirectoryError};
pub use error::MatchingError;
pub use matching::{MatchingApi, ProjectView};
pub use projects::{
    ContractorId, EmploymentType, HourlyRate, InMemoryProjectStore, Project, ProjectDraft,
    ProjectFilter, ProjectId, ProjectPatch, ProjectService, ProjectStatus, ProjectStore,
    ProjectType, StoreError, Timeline, VersionedProject, WorkerId,
};
pub use router::{matching_router, USER_ID_HEADER, USER_ROLE_HEADER};
pub use validation::ValidationError;
