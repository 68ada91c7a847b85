use crewmatch::marketplace::{ContractorDetails, ContractorDirectory, ContractorId, DirectoryError};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::io::{self, ErrorKind};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, RwLock};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Contractor profiles held in process memory.
#[derive(Default, Clone)]
pub(crate) struct InMemoryContractorDirectory {
    entries: Arc<RwLock<HashMap<ContractorId, ContractorDetails>>>,
}

impl InMemoryContractorDirectory {
    pub(crate) fn from_profiles(profiles: Vec<ContractorDetails>) -> Self {
        let entries = profiles
            .into_iter()
            .map(|profile| (profile.id.clone(), profile))
            .collect();
        Self {
            entries: Arc::new(RwLock::new(entries)),
        }
    }

    /// Load a JSON array of contractor profiles.
    pub(crate) fn load(path: &Path) -> io::Result<Self> {
        let raw = std::fs::read(path)?;
        let profiles: Vec<ContractorDetails> = serde_json::from_slice(&raw)
            .map_err(|err| io::Error::new(ErrorKind::InvalidData, err))?;
        Ok(Self::from_profiles(profiles))
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.read().map(|guard| guard.len()).unwrap_or(0)
    }
}

impl ContractorDirectory for InMemoryContractorDirectory {
    fn lookup(&self, id: &ContractorId) -> Result<Option<ContractorDetails>, DirectoryError> {
        let guard = self
            .entries
            .read()
            .map_err(|_| DirectoryError::Unavailable("directory lock poisoned".to_string()))?;
        Ok(guard.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: &str, name: &str) -> ContractorDetails {
        ContractorDetails {
            id: ContractorId(id.to_string()),
            business_name: name.to_string(),
            business_type: None,
            phone_number: None,
            email: None,
        }
    }

    #[test]
    fn lookup_returns_registered_profiles_only() {
        let directory = InMemoryContractorDirectory::from_profiles(vec![
            profile("C1", "Deshmukh Builders"),
            profile("C2", "Rao Infra"),
        ]);

        assert_eq!(directory.len(), 2);
        let found = directory
            .lookup(&ContractorId("C2".to_string()))
            .expect("lookup")
            .expect("present");
        assert_eq!(found.business_name, "Rao Infra");
        assert!(directory
            .lookup(&ContractorId("C9".to_string()))
            .expect("lookup")
            .is_none());
    }

    #[test]
    fn load_reads_camel_case_profiles() {
        let path = std::env::temp_dir().join(format!(
            "crewmatch-contractors-{}.json",
            std::process::id()
        ));
        std::fs::write(
            &path,
            r#"[{"id":"C1","businessName":"Deshmukh Builders","email":"site@deshmukh.example"}]"#,
        )
        .expect("write fixture");

        let directory = InMemoryContractorDirectory::load(&path).expect("load");
        std::fs::remove_file(&path).ok();

        let found = directory
            .lookup(&ContractorId("C1".to_string()))
            .expect("lookup")
            .expect("present");
        assert_eq!(found.email.as_deref(), Some("site@deshmukh.example"));
    }

    #[test]
    fn load_rejects_malformed_files() {
        let path = std::env::temp_dir().join(format!(
            "crewmatch-contractors-bad-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, "{ not json").expect("write fixture");

        let err = match InMemoryContractorDirectory::load(&path) {
            Ok(_) => panic!("malformed profiles should not load"),
            Err(err) => err,
        };
        std::fs::remove_file(&path).ok();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }
}
