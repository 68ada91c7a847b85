use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::domain::{Project, ProjectFilter, ProjectId};
use super::store::{ProjectStore, StoreError, VersionedProject};

#[derive(Default)]
struct Documents {
    records: HashMap<ProjectId, VersionedProject>,
    order: Vec<ProjectId>,
}

/// Process-local document store. Listing follows insertion order.
#[derive(Default, Clone)]
pub struct InMemoryProjectStore {
    documents: Arc<Mutex<Documents>>,
}

impl InMemoryProjectStore {
    fn lock(&self) -> Result<MutexGuard<'_, Documents>, StoreError> {
        self.documents
            .lock()
            .map_err(|_| StoreError::Unavailable("project store mutex poisoned".to_string()))
    }

    pub fn len(&self) -> usize {
        self.lock().map(|guard| guard.records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ProjectStore for InMemoryProjectStore {
    fn insert(&self, project: Project) -> Result<VersionedProject, StoreError> {
        let mut guard = self.lock()?;
        if guard.records.contains_key(&project.id) {
            return Err(StoreError::Conflict);
        }
        let stored = VersionedProject {
            project,
            version: 1,
        };
        guard.order.push(stored.project.id.clone());
        guard
            .records
            .insert(stored.project.id.clone(), stored.clone());
        Ok(stored)
    }

    fn fetch(&self, id: &ProjectId) -> Result<Option<VersionedProject>, StoreError> {
        let guard = self.lock()?;
        Ok(guard.records.get(id).cloned())
    }

    fn list(&self, filter: &ProjectFilter) -> Result<Vec<Project>, StoreError> {
        let guard = self.lock()?;
        Ok(guard
            .order
            .iter()
            .filter_map(|id| guard.records.get(id))
            .map(|stored| &stored.project)
            .filter(|project| filter.matches(project))
            .cloned()
            .collect())
    }

    fn compare_and_swap(
        &self,
        project: Project,
        expected_version: u64,
    ) -> Result<VersionedProject, StoreError> {
        let mut guard = self.lock()?;
        let slot = guard
            .records
            .get_mut(&project.id)
            .ok_or(StoreError::NotFound)?;
        if slot.version != expected_version {
            return Err(StoreError::VersionMismatch {
                expected: expected_version,
                found: slot.version,
            });
        }
        slot.project = project;
        slot.version += 1;
        Ok(slot.clone())
    }

    fn remove(&self, id: &ProjectId) -> Result<bool, StoreError> {
        let mut guard = self.lock()?;
        let removed = guard.records.remove(id).is_some();
        if removed {
            guard.order.retain(|existing| existing != id);
        }
        Ok(removed)
    }
}
