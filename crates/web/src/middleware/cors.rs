use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
            ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE,
            ORIGIN,
        },
        HeaderMap, HeaderName, HeaderValue, Method, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type, Authorization, X-Requested-With";
const ALLOW_PRIVATE_NETWORK: &str = "access-control-allow-private-network";
const MAX_AGE_SECS: &str = "3600";

/// Origins allowed to read responses. `*` allows every origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedOrigins {
    any: bool,
    origins: Arc<[String]>,
}

impl Default for AllowedOrigins {
    fn default() -> Self {
        Self::parse("*")
    }
}

impl AllowedOrigins {
    /// Parses a comma separated origin list.
    pub fn parse(list: &str) -> Self {
        let origins = list
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_owned)
            .collect::<Vec<_>>();
        Self {
            any: origins.iter().any(|origin| origin == "*"),
            origins: origins.into(),
        }
    }

    pub fn allows(&self, origin: &str) -> bool {
        self.any || self.origins.iter().any(|allowed| allowed == origin)
    }
}

fn insert_common_headers(headers: &mut HeaderMap) {
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    headers.insert(
        HeaderName::from_static(ALLOW_PRIVATE_NETWORK),
        HeaderValue::from_static("true"),
    );
}

fn preflight_response() -> Response {
    let mut response = StatusCode::OK.into_response();
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    insert_common_headers(headers);
    headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static(MAX_AGE_SECS));
    response
}

/// Logs every request, answers any `OPTIONS` request directly and adds CORS
/// headers to all other responses.
pub async fn cors_middleware(
    State(allowed_origins): State<AllowedOrigins>,
    req: Request,
    next: Next,
) -> Response {
    log::info!("Request received: {} {}", req.method(), req.uri().path());

    if req.method() == Method::OPTIONS {
        return preflight_response();
    }

    let allow_origin = match req.headers().get(ORIGIN) {
        None => Some(HeaderValue::from_static("*")),
        Some(origin) => origin
            .to_str()
            .ok()
            .filter(|origin| allowed_origins.allows(origin))
            .map(|_| origin.clone()),
    };

    let mut response = next.run(req).await;
    if let Some(allow_origin) = allow_origin {
        let headers = response.headers_mut();
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin);
        insert_common_headers(headers);
    }
    response
}
