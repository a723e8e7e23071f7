use nameth::NamedEnumValues as _;
use nameth::nameth;
use tokio::sync::oneshot;
use tracing::info;
use tracing::warn;

/// Controls a server running in the background.
///
/// Call [ServerHandle::stop] to shut the server down gracefully, or
/// [ServerHandle::stopped] to wait until it terminates on its own.
#[must_use]
pub struct ServerHandle {
    shutdown_tx: Option<oneshot::Sender<String>>,
    terminated_rx: Option<oneshot::Receiver<()>>,
}

/// The server side of a [ServerHandle].
pub struct ServerSignals {
    /// Resolves when the server must shut down.
    pub shutdown: oneshot::Receiver<String>,

    /// Must be notified once the server has fully terminated.
    pub terminated: oneshot::Sender<()>,
}

impl ServerSignals {
    /// Waits for the shutdown request and logs its reason.
    pub async fn shutdown_requested(shutdown: oneshot::Receiver<String>) {
        match shutdown.await {
            Ok(reason) => info!("Server shutdown: {reason}"),
            Err(oneshot::error::RecvError { .. }) => warn!("Server handle dropped"),
        }
    }
}

impl ServerHandle {
    pub fn new() -> (ServerSignals, Self) {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let (terminated_tx, terminated_rx) = oneshot::channel();
        let signals = ServerSignals {
            shutdown: shutdown_rx,
            terminated: terminated_tx,
        };
        let handle = Self {
            shutdown_tx: Some(shutdown_tx),
            terminated_rx: Some(terminated_rx),
        };
        (signals, handle)
    }

    /// Requests a graceful shutdown and waits for the server to terminate.
    pub async fn stop(mut self, reason: impl std::fmt::Display) -> Result<(), ServerStopError> {
        let shutdown_tx = self.shutdown_tx.take().ok_or(ServerStopError::NotRunning)?;
        shutdown_tx
            .send(reason.to_string())
            .map_err(|_| ServerStopError::NotRunning)?;
        self.stopped().await
    }

    /// Waits for the server to terminate.
    pub async fn stopped(mut self) -> Result<(), ServerStopError> {
        let terminated_rx = self
            .terminated_rx
            .take()
            .ok_or(ServerStopError::ShutdownError)?;
        terminated_rx
            .await
            .map_err(|_| ServerStopError::ShutdownError)
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        if self.terminated_rx.is_some() && !std::thread::panicking() {
            warn!("The server was not shutdown");
        }
    }
}

#[nameth]
#[derive(thiserror::Error, Debug)]
pub enum ServerStopError {
    #[error("[{n}] The server was not running", n = self.name())]
    NotRunning,

    #[error("[{n}] The server did not fully shutdown", n = self.name())]
    ShutdownError,
}
