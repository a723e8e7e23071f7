//! The process engine, as seen by the management API.
//!
//! A [ProcessRegistry] lists the deployed process definitions and returns
//! their [ProcessDescriptor]s. Registries can be mutated while they are
//! being read: an id listed by [ProcessRegistry::process_ids] may be gone by
//! the time [ProcessRegistry::process_by_id] is called, in which case the
//! lookup fails with [RegistryError::NotFound].

use std::sync::Arc;

use nameth::NamedEnumValues as _;
use nameth::nameth;
use serde_json::Value;

use self::directory::DirectoryRegistryError;

pub mod directory;
pub mod in_memory;

/// Metadata key holding the description of a process.
pub const DESCRIPTION_KEY: &str = "Description";

/// Free-form annotations attached to a process definition by its author.
pub type Metadata = serde_json::Map<String, Value>;

/// A process definition deployed in the engine.
#[derive(Clone, Debug, PartialEq)]
pub struct ProcessDescriptor {
    id: String,
    name: String,
    metadata: Metadata,
    source: Option<String>,
}

impl ProcessDescriptor {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self, InvalidDescriptorError> {
        let id = id.into();
        let name = name.into();
        if id.is_empty() {
            return Err(InvalidDescriptorError::EmptyId);
        }
        if name.is_empty() {
            return Err(InvalidDescriptorError::EmptyName(id));
        }
        Ok(Self {
            id,
            name,
            metadata: Metadata::default(),
            source: None,
        })
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Attaches the text of the workflow definition.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

/// Read access to the process definitions deployed in the engine.
pub trait ProcessRegistry: Send + Sync + 'static {
    /// Every process id currently deployed, in registry iteration order.
    fn process_ids(&self) -> Result<Vec<String>, RegistryError>;

    /// The descriptor of a deployed process.
    fn process_by_id(&self, id: &str) -> Result<Arc<ProcessDescriptor>, RegistryError>;

    /// The description of a process, read from its [DESCRIPTION_KEY] metadata.
    ///
    /// Returns `default` if the key is missing or if its value is not text.
    fn extract_description(&self, descriptor: &ProcessDescriptor, default: &str) -> String {
        match descriptor.metadata().get(DESCRIPTION_KEY) {
            Some(Value::String(description)) => description.clone(),
            Some(value @ (Value::Number(_) | Value::Bool(_))) => value.to_string(),
            Some(Value::Null | Value::Array(_) | Value::Object(_)) | None => default.to_owned(),
        }
    }
}

#[nameth]
#[derive(thiserror::Error, Debug)]
pub enum RegistryError {
    #[error("[{n}] Process '{0}' is not deployed", n = self.name())]
    NotFound(String),

    #[error("[{n}] {0}", n = self.name())]
    Directory(#[from] DirectoryRegistryError),

    /// Failures of other process engines.
    #[error("[{n}] {0}", n = self.name())]
    Engine(Box<dyn std::error::Error + Send + Sync>),
}

impl RegistryError {
    pub fn engine(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Engine(error.into())
    }
}

#[nameth]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidDescriptorError {
    #[error("[{n}] The process id is empty", n = self.name())]
    EmptyId,

    #[error("[{n}] The name of process '{0}' is empty", n = self.name())]
    EmptyName(String),
}
