use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pixly_core::{ErrorKind, PixlyError};
use serde_json::json;

/// A [`PixlyError`] on its way out over HTTP.
///
/// Renders as `{"error": {"message", "status"}}`. Validation failures carry
/// the list of problems as the message.
#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub struct ApiError(#[from] pub PixlyError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.kind() {
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }

        let message = match &self.0 {
            PixlyError::Validation(errors) => json!(errors),
            other => json!(other.to_string()),
        };
        let body = json!({
            "error": {
                "message": message,
                "status": status.as_u16(),
            }
        });
        (status, Json(body)).into_response()
    }
}
