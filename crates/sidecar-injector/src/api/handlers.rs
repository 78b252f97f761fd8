use axum::{
    body::Bytes,
    extract,
    http::{header, StatusCode},
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::{error, warn};

use crate::{
    api::{api_error::ApiError, service::mutate, state::ApiServerState},
    errors::PipelineError,
};

#[tracing::instrument(
    name = "mutation",
    fields(
        request_uid=tracing::field::Empty,
        host=crate::config::HOSTNAME.as_str(),
        name=tracing::field::Empty,
        namespace=tracing::field::Empty,
        operation=tracing::field::Empty,
        kind_group=tracing::field::Empty,
        kind_version=tracing::field::Empty,
        kind=tracing::field::Empty,
        resource=tracing::field::Empty,
        allowed=tracing::field::Empty,
        mutated=tracing::field::Empty,
    ),
    skip_all)]
/// Compute the patch injecting the sidecars into the Pod under review.
pub(crate) async fn mutate_handler(
    extract::State(state): extract::State<Arc<ApiServerState>>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let payload = mutate(state.template_source.as_ref(), &body).map_err(handle_pipeline_error)?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        payload,
    ))
}

pub(crate) async fn readiness_handler() -> StatusCode {
    StatusCode::OK
}

fn handle_pipeline_error(error: PipelineError) -> ApiError {
    match error {
        PipelineError::Decode(_) | PipelineError::Extract(_) => {
            warn!(error = %error, "rejecting admission review");

            ApiError {
                status: StatusCode::BAD_REQUEST,
                message: error.to_string(),
            }
        }
        PipelineError::Encode(_) => {
            error!(error = %error, "cannot encode admission review response");

            ApiError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "Something went wrong".to_owned(),
            }
        }
    }
}
