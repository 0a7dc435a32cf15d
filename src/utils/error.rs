use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::database::StoreError;
use crate::services::notification_service::NotificationError;

/// Every failure a handler can report. Converted to a status code plus a
/// `{"success": false, "message": ...}` body at the HTTP boundary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    DuplicateKey(String),

    #[error("Bad email or password")]
    InvalidCredentials,

    #[error("{0}")]
    InvalidToken(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Field '{field}' must be a number, got '{value}'")]
    InvalidNumber { field: String, value: String },

    /// Malformed body, path segment or query string.
    #[error("{0}")]
    BadRequest(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn invalid_number(field: &str, value: &str) -> Self {
        AppError::InvalidNumber {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    /// Message shown to the client. Server-side failures are reported generically.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Notification(_) => "Unable to deliver the notification email".to_string(),
            AppError::Database(_) | AppError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DuplicateKey(_) => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::InvalidToken(_) | AppError::Unauthorized(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::MissingField(_) | AppError::InvalidNumber { .. } | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Notification(_) => StatusCode::BAD_GATEWAY,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            log::error!("❌ {}", self);
        }

        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "success": false,
            "message": self.public_message()
        }))
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => AppError::NotFound(err.to_string()),
            StoreError::DuplicateKey { .. } => AppError::DuplicateKey(err.to_string()),
            StoreError::Backend(msg) => AppError::Database(msg),
        }
    }
}

impl From<NotificationError> for AppError {
    fn from(err: NotificationError) -> Self {
        AppError::Notification(err.to_string())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(err: bcrypt::BcryptError) -> Self {
        AppError::Internal(format!("password hashing failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::MessageBody;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::DuplicateKey("x".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::invalid_number("mass", "heavy").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Notification("down".into()).status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_server_errors_hide_details() {
        let err = AppError::Database("connection reset by 10.0.0.3".into());
        let body = err.error_response().into_body().try_into_bytes().unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["message"], "Internal server error");
        assert_eq!(json["success"], false);
    }

    #[test]
    fn test_store_errors_convert() {
        let err: AppError = StoreError::DuplicateKey {
            field: "email",
            value: "a@b.com".into(),
        }
        .into();
        assert!(matches!(err, AppError::DuplicateKey(_)));
    }
}
