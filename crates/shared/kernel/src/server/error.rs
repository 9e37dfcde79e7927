use super::state::ApiStateError;
use crate::security::AdminGuardError;
use axum::extract::FromRequest;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt::Display;
use utoipa::ToSchema;

pub type ApiResult<T> = Result<T, ApiError>;

/// JSON body of every failed request.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Always `false`
    pub success: bool,
    /// Caller-safe description of the failure
    pub message: String,
}

/// Boundary error returned by handlers.
///
/// Carries only a status and a caller-safe message. Internal detail is logged by
/// [`ApiError::reported`] before it is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    message: Cow<'static, str>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<Cow<'static, str>>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    #[must_use]
    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
    }

    /// Logs `detail` under `error.kind` and keeps only the public message.
    ///
    /// Client errors are logged at `warn`, server errors at `error`.
    pub fn reported(
        status: StatusCode,
        kind: &'static str,
        public: &'static str,
        detail: &impl Display,
    ) -> Self {
        if status.is_server_error() {
            tracing::error!(error.kind = kind, status = status.as_u16(), "{detail}");
        } else {
            tracing::warn!(error.kind = kind, status = status.as_u16(), "{detail}");
        }
        Self::new(status, public)
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody { success: false, message: self.message.into_owned() };
        (self.status, Json(body)).into_response()
    }
}

impl From<ApiStateError> for ApiError {
    fn from(err: ApiStateError) -> Self {
        Self::reported(StatusCode::INTERNAL_SERVER_ERROR, err.kind(), err.public_message(), &err)
    }
}

impl From<AdminGuardError> for ApiError {
    fn from(err: AdminGuardError) -> Self {
        let status = match err {
            AdminGuardError::NotConfigured { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AdminGuardError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
        };
        Self::reported(status, err.kind(), err.public_message(), &err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::reported(rejection.status(), "invalid_body", "invalid request body", &rejection.body_text())
    }
}

/// `Json` extractor whose rejections use the [`ErrorBody`] shape.
#[derive(Debug, Clone, Copy, Default, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = ApiError::not_found("credential not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({ "success": false, "message": "credential not found" }));
    }

    #[test]
    fn test_reported_keeps_only_public_message() {
        let err = ApiError::reported(
            StatusCode::UNPROCESSABLE_ENTITY,
            "authentication",
            "could not decrypt credential",
            &"PKCS#7 padding check failed",
        );
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.message(), "could not decrypt credential");
    }

    #[test]
    fn test_admin_errors_map_to_status() {
        let unavailable: ApiError = AdminGuardError::NotConfigured {
            message: "no admin token".into(),
            context: None,
        }
        .into();
        assert_eq!(unavailable.status(), StatusCode::SERVICE_UNAVAILABLE);

        let denied: ApiError =
            AdminGuardError::Unauthorized { message: "bad token".into(), context: None }.into();
        assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);
    }
}
