//! Worker applications embedded in project documents.

pub mod domain;
pub mod manager;

pub use domain::{
    ApplicantSnapshot, Application, ApplicationList, ApplicationStatus, ApplicationSubmission,
    Applications,
};
pub use manager::ApplicationManager;
