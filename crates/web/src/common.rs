use std::io;

use axum::{
    extract::{
        multipart::MultipartError,
        rejection::{JsonRejection, QueryRejection},
        OriginalUri, Query, Request,
    },
    http::{Method, StatusCode},
    response::IntoResponse,
    routing::MethodFilter,
    Json,
};
use btcmap::ApiError;
use database::DatabaseError;
use model::{ExampleData, ValidationError};
use schemars::{schema_for, schema_for_value, JsonSchema};
use serde::{Deserialize, Serialize};

pub type RouteResult<O> = Result<O, RouteErrorResponse>;

/// A `MethodFilter` that matches all http methods.
pub(crate) const METHOD_FILTER_ALL: MethodFilter = MethodFilter::GET
    .or(MethodFilter::POST)
    .or(MethodFilter::PATCH)
    .or(MethodFilter::PUT)
    .or(MethodFilter::DELETE);

// - Services returning commonly used responses -

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SchemaParams {
    #[serde(default = "Default::default")]
    example_data: bool,
}

pub(crate) async fn schema<T: ExampleData + JsonSchema + Serialize>(
    Query(params): Query<SchemaParams>,
) -> impl IntoResponse {
    if params.example_data {
        Json(schema_for_value!(T::example_data()))
    } else {
        Json(schema_for!(T))
    }
}

pub(crate) async fn route_not_found(
    OriginalUri(original_uri): OriginalUri,
    req: Request,
) -> impl IntoResponse {
    log::warn!("Route not found: {} {}", req.method(), original_uri.path());
    RouteErrorResponse::not_found(req.method(), original_uri.path())
}

// - Commonly used responeses -

/// Uniform error envelope: `{"success": false, "error": ...}`, plus the
/// requested path and method for unmapped routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteErrorResponse {
    #[serde(skip)]
    pub status_code: StatusCode,

    pub success: bool,

    pub error: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

impl RouteErrorResponse {
    pub fn new(status_code: StatusCode) -> Self {
        Self {
            status_code,
            success: false,
            error: status_code
                .canonical_reason()
                .unwrap_or("i dunno what happened here :/")
                .to_owned(),
            path: None,
            method: None,
        }
    }

    pub fn not_found(method: &Method, path: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND)
            .with_method(method)
            .with_path(path)
            .with_message("Route not found")
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE).with_message(message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST).with_message(message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR).with_message(message)
    }

    pub fn with_method(mut self, method: &Method) -> Self {
        self.method = Some(method.to_string());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.error = message.into();
        self
    }
}

impl From<ValidationError> for RouteErrorResponse {
    fn from(value: ValidationError) -> Self {
        Self::bad_request(value.to_string())
    }
}

impl From<ApiError> for RouteErrorResponse {
    fn from(value: ApiError) -> Self {
        match value {
            ApiError::Validation(why) => why.into(),
            other => Self::internal(other.to_string()),
        }
    }
}

impl From<DatabaseError> for RouteErrorResponse {
    fn from(value: DatabaseError) -> Self {
        log::error!("{value}");
        Self::internal(value.to_string())
    }
}

impl From<io::Error> for RouteErrorResponse {
    fn from(value: io::Error) -> Self {
        log::error!("I/O error: {value}");
        Self::internal(format!("Could not store file: {value}"))
    }
}

impl From<JsonRejection> for RouteErrorResponse {
    fn from(value: JsonRejection) -> Self {
        Self::bad_request(value.body_text())
    }
}

impl From<QueryRejection> for RouteErrorResponse {
    fn from(value: QueryRejection) -> Self {
        Self::bad_request(value.body_text())
    }
}

impl From<MultipartError> for RouteErrorResponse {
    fn from(value: MultipartError) -> Self {
        Self::new(value.status()).with_message(value.body_text())
    }
}

impl IntoResponse for RouteErrorResponse {
    fn into_response(self) -> axum::response::Response {
        (self.status_code, Json(self)).into_response()
    }
}
