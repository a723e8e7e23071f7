use nameth::NamedEnumValues as _;
use nameth::nameth;
use serde::Deserialize;
use serde::Serialize;

/// Client-facing metadata of a deployed process definition.
///
/// The `description` is only present in the full shape of the listing.
/// Values are compared field by field, the id and the name are never empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawProcessMetadataView")]
pub struct ProcessMetadataView {
    id: String,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl ProcessMetadataView {
    /// Full view: `{ id, name, description }`.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, InvalidViewError> {
        Self::make(id.into(), name.into(), Some(description.into()))
    }

    /// Reduced view: `{ id, name }`.
    pub fn reduced(id: impl Into<String>, name: impl Into<String>) -> Result<Self, InvalidViewError> {
        Self::make(id.into(), name.into(), None)
    }

    fn make(
        id: String,
        name: String,
        description: Option<String>,
    ) -> Result<Self, InvalidViewError> {
        if id.is_empty() {
            return Err(InvalidViewError::EmptyId);
        }
        if name.is_empty() {
            return Err(InvalidViewError::EmptyName(id));
        }
        Ok(Self {
            id,
            name,
            description,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

#[derive(Deserialize)]
struct RawProcessMetadataView {
    id: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
}

impl TryFrom<RawProcessMetadataView> for ProcessMetadataView {
    type Error = InvalidViewError;

    fn try_from(raw: RawProcessMetadataView) -> Result<Self, Self::Error> {
        Self::make(raw.id, raw.name, raw.description)
    }
}

/// One entry of the listing: a bare id, or the metadata of the process.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProcessView {
    Id(String),
    Metadata(ProcessMetadataView),
}

impl ProcessView {
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Metadata(view) => view.id(),
        }
    }
}

impl From<ProcessMetadataView> for ProcessView {
    fn from(view: ProcessMetadataView) -> Self {
        Self::Metadata(view)
    }
}

/// Body of `GET /management/processes/`.
///
/// All entries share the same shape: either a JSON array of strings or a
/// JSON array of objects.
pub type ProcessListing = Vec<ProcessView>;

#[nameth]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidViewError {
    #[error("[{n}] The process id is empty", n = self.name())]
    EmptyId,

    #[error("[{n}] The name of process '{0}' is empty", n = self.name())]
    EmptyName(String),
}
