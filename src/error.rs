use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use validator::ValidationErrors;

use crate::{booking::BookingError, media::MediaError, store::StoreError, uploads::UploadError};

/// Error type for HTTP handlers. Renders as `{ "error": ..., "code": ... }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("item not found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error(transparent)]
    Upload(#[from] UploadError),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(validation_message(&errors))
    }
}

impl From<MediaError> for AppError {
    fn from(err: MediaError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::Invalid(errors) => errors.into(),
            BookingError::Store(err) => AppError::Store(err),
            other => AppError::Validation(other.to_string()),
        }
    }
}

/// Joins the field messages into one line, in field order.
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));
    fields
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| match &error.message {
                Some(message) => message.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Store(StoreError::Database(err)) => classify_sqlx_error(err),
            AppError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND", self.to_string()),
            AppError::Validation(message) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message.clone())
            }
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", self.to_string()),
            AppError::Upload(UploadError::Io(err)) => {
                log::error!("Upload write failed: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "UPLOAD_FAILED",
                    self.to_string(),
                )
            }
            AppError::Upload(err) => (StatusCode::BAD_REQUEST, "INVALID_UPLOAD", err.to_string()),
        }
    }
}

/// Storage messages are passed through as-is; only the status varies.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "item not found".to_string(),
        ),
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            (StatusCode::CONFLICT, "CONFLICT", db_err.message().to_string())
        }
        sqlx::Error::Database(db_err) if db_err.is_check_violation() => (
            StatusCode::BAD_REQUEST,
            "CONSTRAINT_VIOLATION",
            db_err.message().to_string(),
        ),
        other => {
            log::error!("Database error: {other}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
                other.to_string(),
            )
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.parts().0
    }

    fn error_response(&self) -> HttpResponse {
        let (status, code, message) = self.parts();
        HttpResponse::build(status).json(json!({
            "error": message,
            "code": code,
        }))
    }
}

#[cfg(test)]
mod tests {
    use validator::Validate;

    use super::*;
    use crate::models::ContactMessageDraft;

    #[test]
    fn not_found_is_404() {
        let response = AppError::NotFound.error_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn missing_row_maps_to_404() {
        let err = AppError::Store(StoreError::Database(sqlx::Error::RowNotFound));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn validation_errors_are_joined() {
        let draft = ContactMessageDraft {
            email: "nope".to_string(),
            ..ContactMessageDraft::default()
        };
        let err = AppError::from(draft.validate().unwrap_err());

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        let message = err.to_string();
        assert!(message.contains("Please enter a valid email address."));
        assert!(message.contains("Message is required."));
        assert!(message.contains("Name is required."));
    }

    #[test]
    fn bad_upload_is_400() {
        let err = AppError::from(UploadError::NotAnImage("text/plain".to_string()));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
