use serde::{Deserialize, Serialize};

use super::projects::domain::ContractorId;

/// Public contractor profile attached to project views as `contractorDetails`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractorDetails {
    pub id: ContractorId,
    pub business_name: String,
    #[serde(default)]
    pub business_type: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Lookup hook into the contractor directory owned by another service.
pub trait ContractorDirectory: Send + Sync {
    fn lookup(&self, id: &ContractorId) -> Result<Option<ContractorDetails>, DirectoryError>;
}

/// Directory lookup error.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("directory unavailable: {0}")]
    Unavailable(String),
}
