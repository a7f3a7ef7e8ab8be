use std::sync::Arc;

use axum::{
    extract::{FromRequest, Multipart, Query, Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::HttpAppError;
use crate::handlers::SessionQuery;
use crate::services::upload::UploadService;
use crate::state::AppState;
use crate::utils::upload::{upload_session, with_progress};

/// Accept a multipart upload of one or more `files` parts.
///
/// Answers with the plain-text success message once every accepted file went through
/// its local phase, or with the JSON outcome report when remote puts are awaited.
#[tracing::instrument(skip(state, query, request))]
pub async fn upload_files(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SessionQuery>,
    request: Request,
) -> Result<Response, HttpAppError> {
    let session = upload_session(request.headers(), query.session.as_deref());
    let sink = state.progress.sink(session.as_deref());
    let request = with_progress(request, sink);

    let multipart = Multipart::from_request(request, &state).await?;

    let service = UploadService::new(state.pipeline.clone(), state.config.limits.clone());
    let report = service.ingest(multipart).await?;

    if state.config.limits.wait_for_remote {
        Ok((StatusCode::OK, Json(report)).into_response())
    } else {
        Ok((StatusCode::OK, report.message).into_response())
    }
}
