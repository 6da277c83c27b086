use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::{Form, Json};
use serde::de::DeserializeOwned;

use super::error::ApiError;
use crate::models::{CameraSize, FrameUpload};

const IMAGE_FIELD: &str = "frameImg";
const WIDTH_FIELD: &str = "cameraWidth";
const HEIGHT_FIELD: &str = "cameraHeight";

/// Body accepted either as `application/json` or as an urlencoded form.
#[derive(Debug)]
pub struct JsonOrForm<T>(pub T);

impl<T, S> FromRequest<S> for JsonOrForm<T>
where
    T: DeserializeOwned + 'static,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("application/json") {
            let Json(payload) = Json::<T>::from_request(req, state)
                .await
                .map_err(|e| body_rejection(e.status(), e.body_text()))?;
            return Ok(Self(payload));
        }

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(payload) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| body_rejection(e.status(), e.body_text()))?;
            return Ok(Self(payload));
        }

        Err(ApiError::invalid_request(
            "Expected a JSON or form-encoded request body",
        ))
    }
}

fn body_rejection(status: StatusCode, text: String) -> ApiError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge
    } else {
        ApiError::invalid_request(text)
    }
}

fn multipart_failure(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge
    } else {
        ApiError::invalid_request(err.body_text())
    }
}

/// Read the frame upload form.
///
/// Only a file part counts as `frameImg`; a plain text part of that name is
/// ignored.
///
/// Dimensions are checked before the image: a missing or blank dimension wins
/// over a missing file, and a non-numeric dimension is only reported once the
/// image is known to be present.
pub async fn read_frame_upload(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<FrameUpload, ApiError> {
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            tracing::debug!("Frame upload is not multipart: {}", rejection);
            return Err(ApiError::MissingCameraSize);
        }
    };

    let mut width: Option<String> = None;
    let mut height: Option<String> = None;
    let mut image: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_failure)? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(IMAGE_FIELD) if field.file_name().is_some() => {
                let bytes = field.bytes().await.map_err(multipart_failure)?;
                image = Some(bytes.to_vec());
            }
            Some(WIDTH_FIELD) => width = Some(field.text().await.map_err(multipart_failure)?),
            Some(HEIGHT_FIELD) => height = Some(field.text().await.map_err(multipart_failure)?),
            _ => {}
        }
    }

    let (width, height) = match (non_blank(width), non_blank(height)) {
        (Some(width), Some(height)) => (width, height),
        _ => return Err(ApiError::MissingCameraSize),
    };

    let image = image
        .filter(|bytes| !bytes.is_empty())
        .ok_or(ApiError::MissingImage)?;

    let camera_size = CameraSize::parse(&width, &height).ok_or(ApiError::InvalidCameraSize)?;

    Ok(FrameUpload { image, camera_size })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
