//! Cross-origin allow-list.
//!
//! `enforce_origin` runs before routing and turns away any request whose
//! `Origin` header is not on the list. Requests without `Origin` (curl,
//! server-to-server) always pass. `CorsLayer` then adds the response headers
//! and answers preflights for the origins that got through.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, Method};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use todo_core::types::MSG_ORIGIN_REJECTED;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::error::AppError;

pub const DEV_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://localhost:3001"];

#[derive(Debug, Clone)]
pub struct AllowedOrigins {
    origins: Arc<Vec<String>>,
}

impl AllowedOrigins {
    /// The two dev origins plus `external`, if one is configured.
    pub fn new(external: Option<&str>) -> Self {
        let mut origins: Vec<String> = DEV_ORIGINS.iter().map(|o| o.to_string()).collect();
        if let Some(external) = external.map(str::trim).filter(|o| !o.is_empty()) {
            origins.push(external.to_string());
        }
        Self {
            origins: Arc::new(origins),
        }
    }

    pub fn permits(&self, origin: &str) -> bool {
        self.origins.iter().any(|allowed| allowed == origin)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.origins
    }

    pub fn cors_layer(&self) -> CorsLayer {
        let values: Vec<HeaderValue> = self
            .origins
            .iter()
            .filter_map(|o| HeaderValue::from_str(o).ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(values))
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE])
    }
}

pub async fn enforce_origin(
    State(origins): State<AllowedOrigins>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(origin) = request.headers().get(header::ORIGIN) {
        let permitted = origin.to_str().map(|o| origins.permits(o)).unwrap_or(false);
        if !permitted {
            tracing::warn!(origin = ?origin, "rejected cross-origin request");
            return AppError::Forbidden(MSG_ORIGIN_REJECTED.to_string()).into_response();
        }
    }
    next.run(request).await
}
