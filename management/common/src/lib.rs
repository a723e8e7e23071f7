//! Types shared by the SWF management server and its clients.

pub mod api;
pub mod handle;
pub mod http_error;
pub mod tracing;
