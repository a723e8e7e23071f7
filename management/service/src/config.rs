//! Configuration of the service, read from a TOML file and the command line.
//!
//! ```toml
//! host = "0.0.0.0"
//! port = 8080
//! resources = "src/main/resources"
//! registry = "live"
//!
//! [listing]
//! shape = "full"
//! sorted = false
//! default_description = "default description"
//! ```

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use nameth::NamedEnumValues as _;
use nameth::nameth;
use serde::Deserialize;
use swf_management_server::aggregator::listing_config::ListingConfig;
use swf_management_server::registry::ProcessRegistry;
use swf_management_server::registry::RegistryError;
use swf_management_server::registry::directory::DirectoryRegistry;
use swf_management_server::registry::directory::load_directory;
use swf_management_server::server::management_config::ManagementConfig;
use tracing::info;

use crate::cli::Cli;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_RESOURCES: &str = "resources";

/// The content of the configuration file.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub resources: Option<PathBuf>,
    pub registry: RegistryMode,
    pub tracing: bool,
    pub listing: ListingConfig,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: None,
            resources: None,
            registry: RegistryMode::default(),
            tracing: true,
            listing: ListingConfig::default(),
        }
    }
}

impl FileConfig {
    pub fn read(path: &Path) -> Result<Self, ServiceConfigError> {
        let content = std::fs::read_to_string(path).map_err(|error| ServiceConfigError::Read {
            path: path.to_owned(),
            error,
        })?;
        toml::from_str(&content).map_err(|error| ServiceConfigError::Parse {
            path: path.to_owned(),
            error,
        })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RegistryMode {
    /// Definitions are read from disk on every request.
    #[default]
    Live,

    /// Definitions are loaded once at startup.
    Preloaded,
}

/// The resolved configuration of the service.
pub struct ServiceConfig {
    host: String,
    port: u16,
    listing: ListingConfig,
    registry: Arc<dyn ProcessRegistry>,
}

impl ServiceConfig {
    /// Reads the configuration file named on the command line, if any.
    pub fn file_config(cli: &Cli) -> Result<FileConfig, ServiceConfigError> {
        match &cli.config {
            Some(path) => FileConfig::read(path),
            None => Ok(FileConfig::default()),
        }
    }

    /// Merges the command line into the file config and opens the registry.
    pub fn new(cli: &Cli, file: FileConfig) -> Result<Self, ServiceConfigError> {
        let resources = cli
            .resources
            .clone()
            .or(file.resources)
            .unwrap_or_else(|| DEFAULT_RESOURCES.into());
        let registry: Arc<dyn ProcessRegistry> = match cli.registry.unwrap_or(file.registry) {
            RegistryMode::Live => {
                info!("Serving definitions from {}", resources.display());
                Arc::new(DirectoryRegistry::new(resources))
            }
            RegistryMode::Preloaded => {
                let registry = load_directory(&resources)?;
                info!(
                    "Loaded {} definitions from {}",
                    registry.len(),
                    resources.display()
                );
                Arc::new(registry)
            }
        };
        let mut listing = file.listing;
        listing.sorted |= cli.sorted;
        Ok(Self {
            host: cli
                .host
                .clone()
                .or(file.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_owned()),
            port: cli.port.or(file.port).unwrap_or(DEFAULT_PORT),
            listing,
            registry,
        })
    }
}

impl ManagementConfig for ServiceConfig {
    /// Tracing is enabled by `main` before the registry is loaded.
    fn enable_tracing(&self) -> bool {
        false
    }

    fn host(&self) -> &str {
        &self.host
    }

    fn port(&self) -> u16 {
        self.port
    }

    fn listing(&self) -> ListingConfig {
        self.listing.clone()
    }

    fn registry(&self) -> Arc<dyn ProcessRegistry> {
        self.registry.clone()
    }
}

#[nameth]
#[derive(thiserror::Error, Debug)]
pub enum ServiceConfigError {
    #[error("[{n}] Failed to read '{}': {error}", .path.display(), n = self.name())]
    Read {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("[{n}] Failed to parse '{}': {error}", .path.display(), n = self.name())]
    Parse {
        path: PathBuf,
        error: toml::de::Error,
    },

    #[error("[{n}] {0}", n = self.name())]
    LoadResources(#[from] RegistryError),
}
