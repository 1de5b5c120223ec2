use axum::{Json, http::StatusCode, response::IntoResponse, response::Response};
use serde_json::json;

use creatorhub_store::StoreError;

/// Error response carrying a short message the client can show inline.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn not_found(what: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: format!("{} not found", what),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let status = match &err {
            StoreError::UserNotFound(_)
            | StoreError::CreatorNotFound(_)
            | StoreError::PostNotFound(_) => StatusCode::NOT_FOUND,
            StoreError::AlreadySubscribed(_) | StoreError::HandleTaken(_) => StatusCode::CONFLICT,
            StoreError::InvalidAccessCode => StatusCode::FORBIDDEN,
            StoreError::InsufficientBalance { .. } => StatusCode::PAYMENT_REQUIRED,
            StoreError::InvalidAmount => StatusCode::BAD_REQUEST,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_client_statuses() {
        let cases = [
            (StoreError::PostNotFound("p".into()), StatusCode::NOT_FOUND),
            (StoreError::AlreadySubscribed("c".into()), StatusCode::CONFLICT),
            (StoreError::InvalidAccessCode, StatusCode::FORBIDDEN),
            (
                StoreError::InsufficientBalance {
                    needed: 2,
                    available: 1,
                },
                StatusCode::PAYMENT_REQUIRED,
            ),
            (StoreError::InvalidAmount, StatusCode::BAD_REQUEST),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }
}
