use std::sync::Arc;

use axum::Json;
use axum::http::HeaderName;
use axum::http::header::CONTENT_TYPE;
use swf_management_common::api::APPLICATION_JSON;
use swf_management_common::api::processes::ProcessListing;
use swf_management_common::api::processes::ProcessView;
use swf_management_common::http_error::HttpError;
use tracing::Instrument as _;
use tracing::debug;
use tracing::info_span;

use super::Server;
use super::blocking::BlockingError;
use super::blocking::blocking;
use crate::aggregator::AggregationError;
use crate::aggregator::GetProcessError;

impl Server {
    /// `GET /management/processes/`
    pub(super) async fn list_processes(
        self: Arc<Self>,
    ) -> Result<Json<ProcessListing>, HttpError<BlockingError<AggregationError>>> {
        let listing = blocking(move || self.aggregator.list())
            .instrument(info_span!("ListProcesses"))
            .await?;
        debug!("Listed {} processes", listing.len());
        Ok(Json(listing))
    }

    /// `GET /management/processes/{process_id}`
    pub(super) async fn get_process(
        self: Arc<Self>,
        process_id: String,
    ) -> Result<Json<ProcessView>, HttpError<BlockingError<GetProcessError>>> {
        let span = info_span!("GetProcess", %process_id);
        let view = blocking(move || self.aggregator.get(&process_id))
            .instrument(span)
            .await?;
        Ok(Json(view))
    }

    /// `GET /management/processes/{process_id}/source`
    pub(super) async fn get_process_source(
        self: Arc<Self>,
        process_id: String,
    ) -> Result<([(HeaderName, &'static str); 1], String), HttpError<BlockingError<GetProcessError>>>
    {
        let span = info_span!("GetProcessSource", %process_id);
        let source = blocking(move || self.aggregator.source(&process_id))
            .instrument(span)
            .await?;
        Ok(([(CONTENT_TYPE, APPLICATION_JSON)], source))
    }
}
