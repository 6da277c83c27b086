use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::envelope::{codes, Envelope, ErrorDetails};
use crate::app::AppSettings;
use crate::Error;

/// Everything a frame handler can answer with besides success.
///
/// Caller errors map to 400-class responses; `Fault` wraps a downstream
/// failure and maps to 500 (or 404 for unknown frames when configured).
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Missing camera size")]
    MissingCameraSize,

    #[error("Camera size must be a positive integer")]
    InvalidCameraSize,

    #[error("Missing image file")]
    MissingImage,

    #[error("{message}")]
    InvalidRequest {
        message: String,
        errors: Option<serde_json::Value>,
    },

    #[error("Upload exceeds the size limit")]
    PayloadTooLarge,

    #[error("{summary}: {source}")]
    Fault {
        summary: &'static str,
        source: Error,
        expose_details: bool,
        not_found_as_404: bool,
    },
}

impl ApiError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        ApiError::InvalidRequest {
            message: message.into(),
            errors: None,
        }
    }

    /// Wrap a downstream failure, logging it with `summary` as context.
    pub fn fault(summary: &'static str, source: Error, settings: &AppSettings) -> Self {
        match &source {
            Error::NotFound { .. } => tracing::warn!("{}: {}", summary, source),
            _ => tracing::error!("{}: {}", summary, source),
        }

        ApiError::Fault {
            summary,
            source,
            expose_details: settings.expose_error_details,
            not_found_as_404: settings.not_found_as_404,
        }
    }

    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::MissingCameraSize | ApiError::InvalidCameraSize => {
                (StatusCode::BAD_REQUEST, codes::INVALID_INPUT, self.to_string())
            }
            ApiError::MissingImage => {
                (StatusCode::BAD_REQUEST, codes::MISSING_IMAGE, self.to_string())
            }
            ApiError::InvalidRequest { message, .. } => {
                (StatusCode::BAD_REQUEST, codes::INVALID_INPUT, message.clone())
            }
            ApiError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                codes::PAYLOAD_TOO_LARGE,
                self.to_string(),
            ),
            ApiError::Fault {
                summary,
                source,
                expose_details,
                not_found_as_404,
            } => {
                if let (Error::NotFound { .. }, true) = (source, *not_found_as_404) {
                    return (StatusCode::NOT_FOUND, codes::NOT_FOUND, source.to_string());
                }

                let code = match source {
                    Error::StorageNoUrl(_) => codes::STORAGE_FAILED,
                    _ => codes::INTERNAL,
                };
                let message = match (source, *expose_details) {
                    (Error::StorageNoUrl(_), false) => "Image upload failed".to_string(),
                    (_, false) => summary.to_string(),
                    (_, true) => format!("{}: {}", summary, source),
                };
                (StatusCode::INTERNAL_SERVER_ERROR, code, message)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let errors = match self {
            ApiError::InvalidRequest { errors, .. } => errors,
            _ => None,
        };

        let body = Envelope {
            code,
            status: Some(status.as_u16()),
            message,
            body: ErrorDetails { errors },
        };

        (status, Json(body)).into_response()
    }
}
