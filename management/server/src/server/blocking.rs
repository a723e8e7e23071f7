use axum::http::StatusCode;
use nameth::NamedEnumValues as _;
use nameth::nameth;
use swf_management_common::http_error::IsHttpError;
use tokio::task::JoinError;
use tracing::Span;

/// Runs a registry lookup on the blocking thread pool, in the current span.
pub(super) async fn blocking<T, E>(
    lookup: impl FnOnce() -> Result<T, E> + Send + 'static,
) -> Result<T, BlockingError<E>>
where
    T: Send + 'static,
    E: std::error::Error + Send + 'static,
{
    let span = Span::current();
    tokio::task::spawn_blocking(move || span.in_scope(lookup))
        .await?
        .map_err(BlockingError::Failed)
}

#[nameth]
#[derive(thiserror::Error, Debug)]
pub enum BlockingError<E: std::error::Error> {
    #[error(transparent)]
    Failed(E),

    #[error("[{n}] The registry lookup did not complete: {0}", n = self.name())]
    Join(#[from] JoinError),
}

impl<E: IsHttpError> IsHttpError for BlockingError<E> {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Failed(error) => error.status_code(),
            Self::Join { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
