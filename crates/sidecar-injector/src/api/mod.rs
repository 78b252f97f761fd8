pub(crate) mod api_error;
pub(crate) mod handlers;
pub(crate) mod service;
pub(crate) mod state;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::template::TemplateSource;

pub(crate) fn router(template_source: Arc<dyn TemplateSource>) -> Router {
    let state = Arc::new(state::ApiServerState { template_source });

    Router::new()
        .route("/mutate", post(handlers::mutate_handler))
        .route("/readiness", get(handlers::readiness_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
