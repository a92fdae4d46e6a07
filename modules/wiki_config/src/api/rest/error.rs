//! HTTP error mapping to RFC-9457 Problem Details

use crate::contract::ConfigError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// RFC-9457 Problem Details for HTTP API errors
#[derive(Debug, Serialize)]
pub struct Problem {
    /// A URI reference that identifies the problem type
    #[serde(rename = "type")]
    pub type_uri: String,

    /// A short, human-readable summary of the problem type
    pub title: String,

    /// The HTTP status code
    pub status: u16,

    /// A human-readable explanation specific to this occurrence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Problem {
    /// Create a new Problem Details response
    pub fn new(status: StatusCode, title: impl Into<String>) -> Self {
        Self {
            type_uri: format!("https://httpstatuses.io/{}", status.as_u16()),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
        }
    }

    /// Add detail message
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// `ApiKeys` is empty
    pub fn rest_api_disabled() -> Self {
        Self::new(StatusCode::FORBIDDEN, "REST API Disabled")
            .with_detail("No API keys are configured for this wiki")
    }

    /// Missing or unknown API key
    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized")
            .with_detail("A configured API key is required in the Authorization header")
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Map domain errors to HTTP Problem Details
pub fn map_domain_error(error: ConfigError) -> Problem {
    match error {
        ConfigError::UnknownField { name } => Problem::new(
            StatusCode::NOT_FOUND,
            "Field Not Found",
        )
        .with_detail(format!("Configuration field '{}' does not exist", name)),

        ConfigError::TypeMismatch { field, expected } => Problem::new(
            StatusCode::BAD_REQUEST,
            "Type Mismatch",
        )
        .with_detail(format!("Field '{}' expects a {} value", field, expected)),

        ConfigError::SetupIncomplete { missing } => Problem::new(
            StatusCode::CONFLICT,
            "Setup Incomplete",
        )
        .with_detail(format!("Required fields are unset: {}", missing.join(", "))),

        ConfigError::DuplicateKey { .. } | ConfigError::CaseVariantKey { .. } => {
            let detail = error.to_string();
            tracing::error!("Backing store is malformed: {}", detail);
            Problem::new(StatusCode::INTERNAL_SERVER_ERROR, "Malformed Configuration Store")
                .with_detail(detail)
        }

        ConfigError::Load { .. } | ConfigError::Save { .. } => {
            tracing::error!("Configuration store error: {}", error);
            Problem::new(StatusCode::SERVICE_UNAVAILABLE, "Configuration Store Unavailable")
                .with_detail("The configuration store could not be accessed")
        }
    }
}
