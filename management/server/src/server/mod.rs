use std::net::SocketAddr;
use std::net::ToSocketAddrs;
use std::pin::Pin;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::Shared;
use futures::future::join_all;
use nameth::NamedEnumValues as _;
use nameth::nameth;
use swf_management_common::handle::ServerHandle;
use swf_management_common::handle::ServerSignals;
use swf_management_common::tracing::EnableTracingError;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::Instrument as _;
use tracing::Span;
use tracing::debug;
use tracing::info;
use tracing::warn;

use self::management_config::ManagementConfig;
use crate::aggregator::Aggregator;

mod app;
mod blocking;
pub mod management_config;
mod processes;

#[cfg(test)]
mod tests;

pub struct Server {
    shutdown: Shared<Pin<Box<dyn Future<Output = ()> + Send + Sync>>>,
    aggregator: Aggregator,
}

impl Server {
    /// Binds all the addresses of the configured host and serves the management API.
    ///
    /// The returned handle stops the server.
    pub async fn run<C: ManagementConfig>(config: C) -> Result<ServerHandle, ServerError> {
        if config.enable_tracing() {
            swf_management_common::tracing::enable_tracing()?;
        }

        let (signals, handle) = ServerHandle::new();
        let ServerSignals {
            shutdown,
            terminated,
        } = signals;
        let shutdown: Pin<Box<dyn Future<Output = ()> + Send + Sync>> =
            Box::pin(ServerSignals::shutdown_requested(shutdown));

        let aggregator = Aggregator::new(config.registry(), config.listing());
        debug!("Listing config: {:?}", aggregator.config());
        let server = Arc::new(Self {
            shutdown: shutdown.shared(),
            aggregator,
        });

        let (host, port) = (config.host(), config.port());
        let socket_addrs = (host, port).to_socket_addrs();
        let socket_addrs = socket_addrs.map_err(|error| ServerError::ToSocketAddrs {
            host: host.to_owned(),
            port,
            error,
        })?;

        let mut listeners = vec![];
        for socket_addr in socket_addrs {
            let listener = TcpListener::bind(socket_addr)
                .await
                .map_err(|error| ServerError::Bind { socket_addr, error })?;
            listeners.push((socket_addr, listener));
        }

        let mut terminated_rxs = vec![];
        for (socket_addr, listener) in listeners {
            info!("Listening on {socket_addr}");
            let task = server.clone().run_endpoint(listener, Span::current());
            let (terminated_tx, terminated_rx) = oneshot::channel();
            terminated_rxs.push(terminated_rx);
            tokio::spawn(
                async move {
                    if let Err(error) = task.await {
                        warn!("Failed {error}");
                    }
                    let _: Result<(), ()> = terminated_tx.send(());
                }
                .in_current_span(),
            );
        }

        tokio::spawn(
            async move {
                let _: Vec<Result<(), oneshot::error::RecvError>> = join_all(terminated_rxs).await;
                let _: Result<(), ()> = terminated.send(());
            }
            .in_current_span(),
        );
        Ok(handle)
    }

    async fn run_endpoint(
        self: Arc<Self>,
        listener: TcpListener,
        span: Span,
    ) -> Result<(), RunServerError> {
        let app = self.make_app(span);
        let shutdown = self.shutdown.clone();
        debug!("Serving...");
        let () = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(RunServerError::Serve)?;
        debug!("Serving: done");
        Ok(())
    }
}

#[nameth]
#[derive(thiserror::Error, Debug)]
pub enum ServerError {
    #[error("[{n}] {0}", n = self.name())]
    EnableTracing(#[from] EnableTracingError),

    #[error("[{n}] Failed to get socket address for {host}:{port}: {error}", n = self.name())]
    ToSocketAddrs {
        host: String,
        port: u16,
        error: std::io::Error,
    },

    #[error("[{n}] Failed to listen on {socket_addr}: {error}", n = self.name())]
    Bind {
        socket_addr: SocketAddr,
        error: std::io::Error,
    },
}

#[nameth]
#[derive(thiserror::Error, Debug)]
pub enum RunServerError {
    #[error("[{n}] {0}", n = self.name())]
    Serve(std::io::Error),
}
