use std::error;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use model::{Establishment, ValidationError};
use serde_json::Value;
use utility::geo::BoundingBox;

pub mod client;
pub mod rpc;

pub use client::{BtcMapClient, RegistryConfig};

pub const DEFAULT_SEARCH_LIMIT: usize = 100;

#[derive(Debug, Clone)]
pub enum ApiError {
    Validation(ValidationError),
    RequestError(Arc<reqwest::Error>),
    JsonError(Arc<serde_json::Error>),
    InvalidResponse {
        status_code: reqwest::StatusCode,
        url: String,
        response: Option<String>,
    },
}

impl ApiError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl error::Error for ApiError {}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApiError::Validation(e) => write!(f, "{}", e),
            ApiError::RequestError(e) => write!(f, "HTTP request error: {}", e),
            ApiError::JsonError(e) => write!(f, "JSON error: {}", e),
            ApiError::InvalidResponse {
                status_code,
                url,
                response,
            } => match response {
                Some(text) if !text.is_empty() => {
                    write!(f, "Invalid Response ({}) {}: {}", status_code, url, text)
                }
                _ => write!(f, "Invalid Response ({}) {}", status_code, url),
            },
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::Validation(e)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::RequestError(Arc::new(e))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::JsonError(Arc::new(e))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// A registry of Bitcoin-accepting places that can be written to and
/// searched. Responses are handed back as the provider sent them.
#[async_trait]
pub trait Registry: Send + Sync {
    /// Adds a new element. `name`, `lat` and `lon` are required.
    async fn add(&self, establishment: &Establishment) -> ApiResult<Value>;

    /// Changes the tags of the element `id` (e.g. `node/123`). Only the fields
    /// present in `establishment` are sent.
    async fn update(&self, id: &str, establishment: &Establishment) -> ApiResult<Value>;

    async fn search(
        &self,
        bounds: Option<BoundingBox>,
        query: Option<&str>,
        limit: usize,
    ) -> ApiResult<Vec<Value>>;
}
