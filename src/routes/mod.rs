//! HTTP handlers and error rendering for the user API.

use actix_web::error::{InternalError, JsonPayloadError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{Error, HttpRequest, HttpResponse, web};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::services::{ServiceError, ServiceResult};

pub mod users;

/// Structured body returned for every failed request.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub path: String,
}

/// HTTP status and error code for a service failure.
pub fn error_status(err: &ServiceError) -> (StatusCode, &'static str) {
    match err {
        ServiceError::UserNotFound(_) => (StatusCode::NOT_FOUND, "USER_NOT_FOUND"),
        ServiceError::RoleNotFound(_) => (StatusCode::NOT_FOUND, "ROLE_NOT_FOUND"),
        ServiceError::ValidationFailed(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
        // Client-attributable remote statuses pass through, e.g. a duplicate username.
        ServiceError::RemoteFailure {
            status: Some(status @ (400 | 409)),
            ..
        } => (
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_REQUEST),
            "REMOTE_FAILURE",
        ),
        ServiceError::RemoteFailure { .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, "REMOTE_FAILURE")
        }
        ServiceError::Unreachable(_) => (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE"),
    }
}

/// Renders `err` as an [`ErrorBody`] response for `req`.
pub fn error_response(err: &ServiceError, req: &HttpRequest) -> HttpResponse {
    let (status, code) = error_status(err);

    if status.is_server_error() {
        log::error!("{} {} failed: {err}", req.method(), req.path());
    } else {
        log::warn!("{} {} rejected: {err}", req.method(), req.path());
    }

    HttpResponse::build(status).json(ErrorBody {
        code,
        message: err.to_string(),
        timestamp: Utc::now(),
        path: req.path().to_string(),
    })
}

/// Maps a service result onto a response, using `ok` for the success case.
pub fn respond<T>(
    result: ServiceResult<T>,
    req: &HttpRequest,
    ok: impl FnOnce(T) -> HttpResponse,
) -> HttpResponse {
    match result {
        Ok(value) => ok(value),
        Err(err) => error_response(&err, req),
    }
}

/// Runs a blocking directory operation off the async workers.
pub async fn blocking<F, T>(f: F) -> ServiceResult<T>
where
    F: FnOnce() -> ServiceResult<T> + Send + 'static,
    T: Send + 'static,
{
    match web::block(f).await {
        Ok(result) => result,
        Err(err) => {
            log::error!("Blocking task failed: {err}");
            Err(ServiceError::RemoteFailure {
                status: None,
                message: err.to_string(),
            })
        }
    }
}

/// Rejects malformed JSON bodies with the structured 400 body.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, req| {
        bad_request(err, req)
    })
}

/// Rejects malformed query strings with the structured 400 body.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: QueryPayloadError, req| {
        bad_request(err, req)
    })
}

fn bad_request<E>(err: E, req: &HttpRequest) -> Error
where
    E: std::fmt::Debug + std::fmt::Display + 'static,
{
    let response = error_response(&ServiceError::ValidationFailed(err.to_string()), req);
    InternalError::from_response(err, response).into()
}
