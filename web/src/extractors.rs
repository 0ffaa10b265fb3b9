//! Custom Axum extractors.
//!
//! - [`CorrelationId`]: the request's correlation ID (set by the middleware, or read from headers)
//! - [`BearerToken`]: the raw token from an `Authorization: Bearer ...` header
//! - [`ApiJson`], [`ApiPath`] and [`ApiQuery`]: axum's extractors with rejections rendered as [`AppError`]
//!
//! # Examples
//!
//! ```
//! use showtime_web::{BearerToken, CorrelationId};
//!
//! async fn handler(correlation_id: CorrelationId, token: BearerToken) -> String {
//!     tracing::info!(%correlation_id, "Authenticated request");
//!     token.0
//! }
//! ```

use crate::error::AppError;
use crate::middleware::CORRELATION_ID_HEADER;
use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};
use std::fmt;
use uuid::Uuid;

/// Correlation ID for request tracing.
///
/// Prefers the ID stored by [`correlation_id_layer`](crate::correlation_id_layer),
/// so handlers and response headers agree. Without the middleware it falls back
/// to the `X-Correlation-ID` header, or a fresh UUID v4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrelationId(pub Uuid);

impl CorrelationId {
    /// Read the ID from request headers, generating one if absent or malformed.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let id = headers
            .get(CORRELATION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok())
            .unwrap_or_else(Uuid::new_v4);
        Self(id)
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<Self>()
            .copied()
            .unwrap_or_else(|| Self::from_headers(&parts.headers)))
    }
}

/// Bearer token from the `Authorization` header.
///
/// Rejects with 401 `login required` when the header is missing, is not a
/// bearer credential, or carries an empty token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(pub String);

impl BearerToken {
    /// Parse `Authorization: Bearer <token>`.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
        let (scheme, token) = value.split_once(' ')?;
        let token = token.trim();
        (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty())
            .then(|| Self(token.to_string()))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_headers(&parts.headers).ok_or_else(|| AppError::unauthorized("login required"))
    }
}

/// JSON body whose rejections render as `{"error", "code": "INVALID_BODY"}`.
#[derive(Debug, Clone, Copy, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Path parameters whose rejections render as `{"error", "code": "INVALID_PATH"}`.
#[derive(Debug, Clone, Copy, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// Query string whose rejections render as `{"error", "code": "INVALID_QUERY"}`.
#[derive(Debug, Clone, Copy, Default, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);
