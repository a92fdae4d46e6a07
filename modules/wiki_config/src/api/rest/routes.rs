//! Route registration and API key gate

use super::{dto::*, error::Problem, handlers};
use crate::domain::Service;
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;
use utoipa::OpenApi;

/// Schemas exposed by the configuration endpoints
#[derive(OpenApi)]
#[openapi(components(schemas(FieldDto, ConfigurationResponse, UpdateFieldRequest, StatusDto)))]
pub struct ConfigurationApiDoc;

/// Register all REST routes
///
/// Every route sits behind the API key gate: with `ApiKeys` empty the
/// endpoints answer 403, otherwise the `Authorization` header must carry
/// one of the configured keys.
pub fn register_routes(router: Router, service: Arc<Service>) -> Router {
    let configuration = Router::new()
        .route("/configuration", get(list_configuration_handler))
        .route("/configuration/status", get(get_status_handler))
        .route("/configuration/save", post(save_configuration_handler))
        .route("/configuration/reload", post(reload_configuration_handler))
        .route(
            "/configuration/{field}",
            get(get_field_handler).put(update_field_handler),
        )
        .route_layer(middleware::from_fn_with_state(
            service.clone(),
            require_api_key,
        ))
        .layer(Extension(service));

    router.merge(configuration)
}

/// Reject requests while the REST API is disabled or the key is unknown
async fn require_api_key(
    State(service): State<Arc<Service>>,
    request: Request,
    next: Next,
) -> Response {
    if !service.is_rest_api_enabled() {
        return Problem::rest_api_disabled().into_response();
    }

    let accepted = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.strip_prefix("Bearer ").unwrap_or(value).trim())
        .is_some_and(|key| service.accepts_api_key(key));

    if !accepted {
        tracing::debug!(uri = %request.uri(), "Rejected configuration request without a valid API key");
        return Problem::unauthorized().into_response();
    }

    next.run(request).await
}

// ===== Handler wrappers that extract service from Extension =====

async fn list_configuration_handler(
    Extension(service): Extension<Arc<Service>>,
) -> Result<axum::Json<ConfigurationResponse>, Problem> {
    handlers::list_configuration(service).await
}

async fn get_status_handler(
    Extension(service): Extension<Arc<Service>>,
) -> Result<axum::Json<StatusDto>, Problem> {
    handlers::get_status(service).await
}

async fn get_field_handler(
    Extension(service): Extension<Arc<Service>>,
    path: axum::extract::Path<String>,
) -> Result<axum::Json<FieldDto>, Problem> {
    handlers::get_field(service, path).await
}

async fn update_field_handler(
    Extension(service): Extension<Arc<Service>>,
    path: axum::extract::Path<String>,
    json: axum::Json<UpdateFieldRequest>,
) -> Result<axum::Json<FieldDto>, Problem> {
    handlers::update_field(service, path, json).await
}

async fn save_configuration_handler(
    Extension(service): Extension<Arc<Service>>,
) -> Result<StatusCode, Problem> {
    handlers::save_configuration(service).await
}

async fn reload_configuration_handler(
    Extension(service): Extension<Arc<Service>>,
) -> Result<StatusCode, Problem> {
    handlers::reload_configuration(service).await
}
