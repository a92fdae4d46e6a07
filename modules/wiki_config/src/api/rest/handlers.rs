//! HTTP request handlers - thin layer that delegates to domain service

use super::{
    dto::*,
    error::{map_domain_error, Problem},
    mapper,
};
use crate::contract::ConfigField;
use crate::domain::Service;
use axum::{extract::Path, http::StatusCode, Json};
use std::sync::Arc;

/// List every field with its current value
pub async fn list_configuration(
    service: Arc<Service>,
) -> Result<Json<ConfigurationResponse>, Problem> {
    let loaded = service.snapshot();
    Ok(Json(mapper::configuration_response(&loaded)))
}

/// Lifecycle status (normal operation or setup)
pub async fn get_status(service: Arc<Service>) -> Result<Json<StatusDto>, Problem> {
    let loaded = service.snapshot();
    Ok(Json(mapper::status_dto(&loaded, service.store_description())))
}

/// Get a single field
pub async fn get_field(
    service: Arc<Service>,
    Path(name): Path<String>,
) -> Result<Json<FieldDto>, Problem> {
    let field: ConfigField = name.parse().map_err(map_domain_error)?;
    let loaded = service.snapshot();
    Ok(Json(mapper::field_dto(field, &loaded)))
}

/// Assign a field in memory; call save to persist
pub async fn update_field(
    service: Arc<Service>,
    Path(name): Path<String>,
    Json(req): Json<UpdateFieldRequest>,
) -> Result<Json<FieldDto>, Problem> {
    let field: ConfigField = name.parse().map_err(map_domain_error)?;
    let value = mapper::json_to_value(field, req.value).map_err(map_domain_error)?;

    service.set(field, value).await.map_err(map_domain_error)?;

    let loaded = service.snapshot();
    Ok(Json(mapper::field_dto(field, &loaded)))
}

/// Persist and reload
pub async fn save_configuration(service: Arc<Service>) -> Result<StatusCode, Problem> {
    service.save().await.map_err(map_domain_error)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Reload from the store, discarding unsaved changes
pub async fn reload_configuration(service: Arc<Service>) -> Result<StatusCode, Problem> {
    service.reload().await.map_err(map_domain_error)?;
    Ok(StatusCode::NO_CONTENT)
}
