use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::PathRejection;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use super::envelope::{AiFrameData, CreatedFrameData, Data, Envelope, FrameData};
use super::error::ApiError;
use super::extract::{read_frame_upload, JsonOrForm};
use super::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct AiFrameRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank", message = "Prompt is required"))]
    pub prompt: String,
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// `POST /frames`
pub async fn create_frame(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Envelope<Data<CreatedFrameData>>>, ApiError> {
    let upload = read_frame_upload(multipart).await?;

    let created = state
        .app
        .create_frame(upload)
        .await
        .map_err(|e| ApiError::fault("Frame creation failed", e, state.app.settings()))?;

    Ok(Json(Envelope::success(
        "Frame created",
        Data {
            data: CreatedFrameData {
                frame_id: created.frame_id,
                frame_img_url: created.frame_img_url,
            },
        },
    )))
}

/// `POST /frames/ai`
pub async fn create_ai_frame(
    State(state): State<AppState>,
    JsonOrForm(request): JsonOrForm<AiFrameRequest>,
) -> Result<(StatusCode, Json<Envelope<AiFrameData>>), ApiError> {
    if let Err(errors) = request.validate() {
        return Err(ApiError::InvalidRequest {
            message: "Invalid AI frame request".to_string(),
            errors: serde_json::to_value(errors).ok(),
        });
    }
    let prompt = request.prompt.trim();

    let frame_ai_url = state
        .app
        .generate_ai_frame(prompt)
        .await
        .map_err(|e| ApiError::fault("AI frame generation failed", e, state.app.settings()))?;

    let body = Envelope::success(
        "AI frame background created",
        AiFrameData { frame_ai_url },
    )
    .with_status(StatusCode::CREATED.as_u16());

    Ok((StatusCode::CREATED, Json(body)))
}

/// `GET /frames/{frame_id}`
pub async fn get_frame(
    State(state): State<AppState>,
    frame_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Envelope<Data<FrameData>>>, ApiError> {
    let Path(frame_id) = frame_id.map_err(|rejection| {
        tracing::debug!("Rejected frame id: {}", rejection.body_text());
        ApiError::invalid_request("Frame id must be an integer")
    })?;

    let frame = state
        .app
        .get_frame(frame_id)
        .await
        .map_err(|e| ApiError::fault("Frame lookup failed", e, state.app.settings()))?;

    Ok(Json(Envelope::success(
        "Frame retrieved",
        Data {
            data: FrameData {
                frame_id: frame.frame_id,
                frame_url: frame.frame_url,
            },
        },
    )))
}
