use std::future::ready;
use std::sync::Arc;

use autoclone::autoclone;
use axum::Router;
use axum::extract::Path;
use axum::routing::get;
use swf_management_common::api::PROCESSES_PATH;
use swf_management_common::api::STATUS_PATH;
use swf_management_common::api::STATUS_UP;
use tower_http::trace::DefaultMakeSpan;
use tower_http::trace::TraceLayer;
use tracing::Instrument as _;
use tracing::Level;
use tracing::Span;

use super::Server;

impl Server {
    #[autoclone]
    pub(super) fn make_app(self: &Arc<Self>, span: Span) -> Router {
        let server = self.clone();
        let list_processes = move || {
            autoclone!(server, span);
            server.list_processes().instrument(span)
        };
        Router::new()
            .route(STATUS_PATH, get(|| ready(STATUS_UP)))
            .route(PROCESSES_PATH, get(list_processes.clone()))
            .route(&format!("{PROCESSES_PATH}/"), get(list_processes))
            .route(
                &format!("{PROCESSES_PATH}/{{process_id}}"),
                get(move |Path(process_id): Path<String>| {
                    autoclone!(server, span);
                    server.get_process(process_id).instrument(span)
                }),
            )
            .route(
                &format!("{PROCESSES_PATH}/{{process_id}}/source"),
                get(move |Path(process_id): Path<String>| {
                    autoclone!(server, span);
                    server.get_process_source(process_id).instrument(span)
                }),
            )
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::default().level(Level::DEBUG)),
            )
    }
}
