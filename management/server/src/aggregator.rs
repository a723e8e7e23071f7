//! Builds the client-facing views of the deployed processes.

use std::sync::Arc;

use axum::http::StatusCode;
use nameth::NamedEnumValues as _;
use nameth::nameth;
use swf_management_common::api::processes::InvalidViewError;
use swf_management_common::api::processes::ProcessListing;
use swf_management_common::api::processes::ProcessMetadataView;
use swf_management_common::api::processes::ProcessView;
use swf_management_common::http_error::IsHttpError;
use tracing::debug;

use self::listing_config::ListingConfig;
use self::listing_config::ResponseShape;
use crate::registry::ProcessDescriptor;
use crate::registry::ProcessRegistry;
use crate::registry::RegistryError;

pub mod listing_config;

/// Reads the registry on every call and shapes the result per [ListingConfig].
pub struct Aggregator {
    registry: Arc<dyn ProcessRegistry>,
    config: ListingConfig,
}

impl Aggregator {
    pub fn new(registry: Arc<dyn ProcessRegistry>, config: ListingConfig) -> Self {
        Self { registry, config }
    }

    pub fn config(&self) -> &ListingConfig {
        &self.config
    }

    /// Lists all the deployed processes.
    ///
    /// Processes that are undeployed between listing the ids and reading
    /// their descriptor are skipped. Any other registry error fails the
    /// whole listing.
    pub fn list(&self) -> Result<ProcessListing, AggregationError> {
        let ids = self
            .registry
            .process_ids()
            .map_err(AggregationError::ListProcesses)?;
        let mut listing = Vec::with_capacity(ids.len());
        for id in ids {
            let descriptor = match self.registry.process_by_id(&id) {
                Ok(descriptor) => descriptor,
                Err(RegistryError::NotFound(id)) => {
                    debug!(%id, "Process undeployed while listing");
                    continue;
                }
                Err(error) => return Err(AggregationError::ReadProcess { id, error }),
            };
            listing.push(self.view(&descriptor)?);
        }
        if self.config.shape == ResponseShape::Ids || self.config.sorted {
            listing.sort_by(|a, b| a.id().cmp(b.id()));
        }
        Ok(listing)
    }

    /// The view of a single process.
    pub fn get(&self, id: &str) -> Result<ProcessView, GetProcessError> {
        let descriptor = self.descriptor(id)?;
        Ok(self.view(&descriptor)?)
    }

    /// The source of the workflow definition of a process.
    pub fn source(&self, id: &str) -> Result<String, GetProcessError> {
        let descriptor = self.descriptor(id)?;
        descriptor
            .source()
            .map(str::to_owned)
            .ok_or_else(|| GetProcessError::NoSource(id.to_owned()))
    }

    fn descriptor(&self, id: &str) -> Result<Arc<ProcessDescriptor>, GetProcessError> {
        self.registry.process_by_id(id).map_err(|error| match error {
            RegistryError::NotFound(id) => GetProcessError::NotFound(id),
            error => GetProcessError::Registry(error),
        })
    }

    fn view(&self, descriptor: &ProcessDescriptor) -> Result<ProcessView, InvalidViewError> {
        let (id, name) = (descriptor.id(), descriptor.name());
        Ok(match self.config.shape {
            ResponseShape::Ids => ProcessView::Id(id.to_owned()),
            ResponseShape::IdAndName => ProcessMetadataView::reduced(id, name)?.into(),
            ResponseShape::Full => {
                let description = self
                    .registry
                    .extract_description(descriptor, &self.config.default_description);
                ProcessMetadataView::new(id, name, description)?.into()
            }
        })
    }
}

#[nameth]
#[derive(thiserror::Error, Debug)]
pub enum AggregationError {
    #[error("[{n}] Failed to list the processes: {0}", n = self.name())]
    ListProcesses(RegistryError),

    #[error("[{n}] Failed to read process '{id}': {error}", n = self.name())]
    ReadProcess { id: String, error: RegistryError },

    #[error("[{n}] {0}", n = self.name())]
    InvalidView(#[from] InvalidViewError),
}

impl IsHttpError for AggregationError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

#[nameth]
#[derive(thiserror::Error, Debug)]
pub enum GetProcessError {
    #[error("[{n}] Process '{0}' is not deployed", n = self.name())]
    NotFound(String),

    #[error("[{n}] Process '{0}' doesn't have a source", n = self.name())]
    NoSource(String),

    #[error("[{n}] {0}", n = self.name())]
    Registry(RegistryError),

    #[error("[{n}] {0}", n = self.name())]
    InvalidView(#[from] InvalidViewError),
}

impl IsHttpError for GetProcessError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } | Self::NoSource { .. } => StatusCode::NOT_FOUND,
            Self::Registry { .. } | Self::InvalidView { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
