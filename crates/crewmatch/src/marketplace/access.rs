use super::error::MatchingError;
use super::projects::domain::{ContractorId, WorkerId};

/// Caller identity as resolved by the upstream auth provider. Credentials are
/// never checked here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Contractor(ContractorId),
    Worker(WorkerId),
}

impl Identity {
    pub fn from_parts(role: &str, id: &str) -> Option<Self> {
        let id = id.trim();
        if id.is_empty() {
            return None;
        }
        match role.trim().to_ascii_lowercase().as_str() {
            "contractor" => Some(Identity::Contractor(ContractorId(id.to_string()))),
            "worker" => Some(Identity::Worker(WorkerId(id.to_string()))),
            _ => None,
        }
    }

    pub const fn role(&self) -> &'static str {
        match self {
            Identity::Contractor(_) => "contractor",
            Identity::Worker(_) => "worker",
        }
    }

    pub fn contractor(&self) -> Result<ContractorCapability, MatchingError> {
        match self {
            Identity::Contractor(id) => Ok(ContractorCapability { id: id.clone() }),
            Identity::Worker(_) => Err(MatchingError::Forbidden(
                "operation requires a contractor identity".to_string(),
            )),
        }
    }

    pub fn worker(&self) -> Result<WorkerCapability, MatchingError> {
        match self {
            Identity::Worker(id) => Ok(WorkerCapability { id: id.clone() }),
            Identity::Contractor(_) => Err(MatchingError::Forbidden(
                "operation requires a worker identity".to_string(),
            )),
        }
    }
}

/// Proof that the caller acts as a specific contractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractorCapability {
    id: ContractorId,
}

impl ContractorCapability {
    pub fn contractor(&self) -> &ContractorId {
        &self.id
    }

    pub fn ensure_owns(&self, owner: &ContractorId) -> Result<(), MatchingError> {
        if &self.id == owner {
            Ok(())
        } else {
            Err(MatchingError::Forbidden(format!(
                "contractor `{}` does not own this project",
                self.id
            )))
        }
    }
}

/// Proof that the caller acts as a specific worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerCapability {
    id: WorkerId,
}

impl WorkerCapability {
    pub fn worker(&self) -> &WorkerId {
        &self.id
    }
}
