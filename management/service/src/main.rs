use clap::Parser as _;
use nameth::NamedEnumValues as _;
use nameth::nameth;
use swf_management_common::handle::ServerStopError;
use swf_management_common::tracing::EnableTracingError;
use swf_management_common::tracing::enable_tracing;
use swf_management_server::server::Server;
use swf_management_server::server::ServerError;

use self::cli::Cli;
use self::config::ServiceConfig;
use self::config::ServiceConfigError;

mod cli;
mod config;

#[tokio::main]
async fn main() -> Result<(), ServiceError> {
    let cli = Cli::parse();
    let file_config = ServiceConfig::file_config(&cli)?;
    if file_config.tracing && !cli.quiet {
        enable_tracing()?;
    }

    let config = ServiceConfig::new(&cli, file_config)?;
    let handle = Server::run(config).await?;

    tokio::signal::ctrl_c().await.map_err(ServiceError::Signal)?;
    let () = handle.stop("Interrupted").await?;
    Ok(())
}

#[nameth]
#[derive(thiserror::Error, Debug)]
enum ServiceError {
    #[error("[{n}] {0}", n = self.name())]
    Config(#[from] ServiceConfigError),

    #[error("[{n}] {0}", n = self.name())]
    EnableTracing(#[from] EnableTracingError),

    #[error("[{n}] {0}", n = self.name())]
    Server(#[from] ServerError),

    #[error("[{n}] Failed to listen for Ctrl-C: {0}", n = self.name())]
    Signal(std::io::Error),

    #[error("[{n}] {0}", n = self.name())]
    Stop(#[from] ServerStopError),
}
