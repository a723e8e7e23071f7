//! Process definitions read from the `*.sw.json` files of a resources folder.

use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use nameth::NamedEnumValues as _;
use nameth::nameth;
use serde::Deserialize;
use tracing::debug;

use super::DESCRIPTION_KEY;
use super::InvalidDescriptorError;
use super::Metadata;
use super::ProcessDescriptor;
use super::ProcessRegistry;
use super::RegistryError;
use super::in_memory::InMemoryRegistry;

/// File extension of serverless workflow definitions.
pub const DEFINITION_EXTENSION: &str = ".sw.json";

/// A registry backed by a folder of serverless workflow definitions.
///
/// Files are read on every call: definitions added, edited or removed on
/// disk are visible immediately. The id of a process is the name of its
/// file without the [DEFINITION_EXTENSION], ids are listed in file name order.
#[derive(Clone, Debug)]
pub struct DirectoryRegistry {
    root: PathBuf,
}

/// The subset of a serverless workflow definition exposed by the registry.
#[derive(Debug, Deserialize)]
struct WorkflowDefinition {
    id: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    metadata: Metadata,
}

impl DirectoryRegistry {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn definition_path(&self, id: &str) -> Option<PathBuf> {
        is_process_id(id).then(|| self.root.join(format!("{id}{DEFINITION_EXTENSION}")))
    }
}

/// Ids that can't be resolved back to a single file of the root folder.
fn is_process_id(id: &str) -> bool {
    !id.is_empty() && id != "." && id != ".." && !id.contains(['/', '\\'])
}

impl ProcessRegistry for DirectoryRegistry {
    fn process_ids(&self) -> Result<Vec<String>, RegistryError> {
        let list_error = |error: std::io::Error| DirectoryRegistryError::ListDirectory {
            path: self.root.clone(),
            error,
        };
        let mut ids = vec![];
        for entry in std::fs::read_dir(&self.root).map_err(list_error)? {
            let entry = entry.map_err(list_error)?;
            let file_name = entry.file_name();
            let Some(id) = file_name
                .to_str()
                .and_then(|file_name| file_name.strip_suffix(DEFINITION_EXTENSION))
            else {
                continue;
            };
            if !is_process_id(id) {
                debug!("Skipping {}", entry.path().display());
                continue;
            }
            if !entry.path().is_file() {
                continue;
            }
            ids.push(id.to_owned());
        }
        ids.sort();
        Ok(ids)
    }

    fn process_by_id(&self, id: &str) -> Result<Arc<ProcessDescriptor>, RegistryError> {
        let not_found = || RegistryError::NotFound(id.to_owned());
        let path = self.definition_path(id).ok_or_else(not_found)?;
        let source = match std::fs::read_to_string(&path) {
            Ok(source) => source,
            Err(error) if error.kind() == ErrorKind::NotFound => return Err(not_found()),
            Err(error) => return Err(DirectoryRegistryError::ReadDefinition { path, error })?,
        };
        let definition: WorkflowDefinition = match serde_json::from_str(&source) {
            Ok(definition) => definition,
            Err(error) => return Err(DirectoryRegistryError::ParseDefinition { path, error })?,
        };
        if definition.id != id {
            return Err(DirectoryRegistryError::IdMismatch {
                path,
                id: definition.id,
            })?;
        }

        let mut descriptor = ProcessDescriptor::new(definition.id, definition.name)
            .map_err(|error| DirectoryRegistryError::InvalidDefinition {
                path: path.clone(),
                error,
            })?;
        for (key, value) in definition.metadata {
            descriptor = descriptor.with_metadata(key, value);
        }
        if let Some(description) = definition.description {
            descriptor = descriptor.with_metadata(DESCRIPTION_KEY, description);
        }
        debug!("Loaded {}", path.display());
        Ok(Arc::new(descriptor.with_source(source)))
    }
}

/// Deploys all the definitions of a resources folder into an [InMemoryRegistry].
///
/// Unlike the [DirectoryRegistry], later changes on disk are not reflected.
pub fn load_directory(root: impl Into<PathBuf>) -> Result<InMemoryRegistry, RegistryError> {
    let directory = DirectoryRegistry::new(root);
    let registry = InMemoryRegistry::default();
    for id in directory.process_ids()? {
        match directory.process_by_id(&id) {
            Ok(descriptor) => {
                registry.deploy(Arc::unwrap_or_clone(descriptor));
            }
            Err(RegistryError::NotFound(id)) => debug!(%id, "Definition removed while loading"),
            Err(error) => return Err(error),
        }
    }
    debug!(
        "Loaded {} definitions from {}",
        registry.len(),
        directory.root().display()
    );
    Ok(registry)
}

#[nameth]
#[derive(thiserror::Error, Debug)]
pub enum DirectoryRegistryError {
    #[error("[{n}] Failed to list '{}': {error}", .path.display(), n = self.name())]
    ListDirectory {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("[{n}] Failed to read '{}': {error}", .path.display(), n = self.name())]
    ReadDefinition {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("[{n}] Failed to parse '{}': {error}", .path.display(), n = self.name())]
    ParseDefinition {
        path: PathBuf,
        error: serde_json::Error,
    },

    #[error("[{n}] The definition '{}' declares id '{id}'", .path.display(), n = self.name())]
    IdMismatch { path: PathBuf, id: String },

    #[error("[{n}] Invalid definition '{}': {error}", .path.display(), n = self.name())]
    InvalidDefinition {
        path: PathBuf,
        error: InvalidDescriptorError,
    },
}
