use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering::SeqCst;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use super::ProcessDescriptor;
use super::ProcessRegistry;
use super::RegistryError;

/// A registry of process definitions held in memory.
///
/// Processes are listed in deployment order. Redeploying a process replaces
/// its descriptor but keeps its position.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    processes: DashMap<String, Deployed>,
    next_position: AtomicU64,
}

#[derive(Debug)]
struct Deployed {
    position: u64,
    descriptor: Arc<ProcessDescriptor>,
}

impl InMemoryRegistry {
    /// Deploys a process, returns the descriptor it replaces if any.
    pub fn deploy(&self, descriptor: ProcessDescriptor) -> Option<Arc<ProcessDescriptor>> {
        let descriptor = Arc::new(descriptor);
        match self.processes.entry(descriptor.id().to_owned()) {
            Entry::Occupied(mut entry) => {
                debug!(id = %entry.key(), "Redeploy process");
                let position = entry.get().position;
                let previous = entry.insert(Deployed {
                    position,
                    descriptor,
                });
                Some(previous.descriptor)
            }
            Entry::Vacant(entry) => {
                debug!(id = %entry.key(), "Deploy process");
                let position = self.next_position.fetch_add(1, SeqCst);
                entry.insert(Deployed {
                    position,
                    descriptor,
                });
                None
            }
        }
    }

    /// Removes a process, returns its descriptor if it was deployed.
    pub fn undeploy(&self, id: &str) -> Option<Arc<ProcessDescriptor>> {
        let (_, deployed) = self.processes.remove(id)?;
        debug!(id, "Undeploy process");
        Some(deployed.descriptor)
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }
}

impl FromIterator<ProcessDescriptor> for InMemoryRegistry {
    fn from_iter<T: IntoIterator<Item = ProcessDescriptor>>(descriptors: T) -> Self {
        let registry = Self::default();
        for descriptor in descriptors {
            registry.deploy(descriptor);
        }
        registry
    }
}

impl ProcessRegistry for InMemoryRegistry {
    fn process_ids(&self) -> Result<Vec<String>, RegistryError> {
        let mut ids = self
            .processes
            .iter()
            .map(|entry| (entry.position, entry.key().clone()))
            .collect::<Vec<_>>();
        ids.sort_by_key(|(position, _)| *position);
        Ok(ids.into_iter().map(|(_, id)| id).collect())
    }

    fn process_by_id(&self, id: &str) -> Result<Arc<ProcessDescriptor>, RegistryError> {
        self.processes
            .get(id)
            .map(|deployed| deployed.descriptor.clone())
            .ok_or_else(|| RegistryError::NotFound(id.to_owned()))
    }
}
