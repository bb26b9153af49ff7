use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use storefront_auth::{AuthzError, InvalidRole};
use storefront_core::{DomainError, ErrorKind, PaginationError, ValidationError};
use storefront_infra::RepositoryError;
use storefront_sales::PricingError;

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn domain_error_to_response(err: &DomainError) -> Response {
    match err.kind() {
        ErrorKind::BadRequest => json_error(StatusCode::BAD_REQUEST, "bad_request", err.message()),
        ErrorKind::Forbidden => json_error(StatusCode::FORBIDDEN, "forbidden", err.message()),
        ErrorKind::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", err.message()),
        ErrorKind::Internal => {
            tracing::error!(error = %err, "request failed");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "internal server error",
            )
        }
    }
}

/// Handler error: any domain failure, rendered as a JSON error body.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        domain_error_to_response(&self.0)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

macro_rules! api_error_from {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for ApiError {
                fn from(err: $t) -> Self {
                    Self(DomainError::from(err))
                }
            }
        )*
    };
}

api_error_from!(
    AuthzError,
    InvalidRole,
    PaginationError,
    PricingError,
    RepositoryError,
    ValidationError,
);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(DomainError::bad_request(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(DomainError::bad_request(rejection.body_text()))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
