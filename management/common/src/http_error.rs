use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use tracing::debug;
use tracing::warn;

/// A trait implemented by errors that translate to HTTP status codes.
pub trait IsHttpError: std::error::Error + Sized {
    fn status_code(&self) -> StatusCode;
}

/// A wrapper to translate errors into http [Response]s.
///
/// The body is the plain-text message of the error. Server errors are
/// logged since the client can't do anything about them.
#[derive(thiserror::Error, Debug, Clone)]
#[error(transparent)]
pub struct HttpError<E>(#[from] E);

impl<E: IsHttpError> IntoResponse for HttpError<E> {
    fn into_response(self) -> Response {
        let status_code = self.0.status_code();
        let message = self.to_string();
        if status_code.is_server_error() {
            warn!("{status_code}: {message}");
        } else {
            debug!("{status_code}: {message}");
        }
        (status_code, message).into_response()
    }
}
