//! JSON response envelope shared by every frame endpoint.
//!
//! Every body carries `code` and `message`; errors and the AI endpoint also
//! carry the numeric `status`. Endpoint-specific payloads are flattened in.

use serde::Serialize;

/// Application response codes.
pub mod codes {
    pub const SUCCESS: &str = "FRA_2001";
    /// Missing or invalid input other than the image file.
    pub const INVALID_INPUT: &str = "FRA_4001";
    pub const MISSING_IMAGE: &str = "FRA_4002";
    pub const NOT_FOUND: &str = "FRA_4041";
    pub const PAYLOAD_TOO_LARGE: &str = "FRA_4131";
    pub const STORAGE_FAILED: &str = "FRA_5001";
    pub const INTERNAL: &str = "FRA_5002";
}

#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub message: String,
    #[serde(flatten)]
    pub body: T,
}

impl<T: Serialize> Envelope<T> {
    pub fn success(message: &str, body: T) -> Self {
        Self {
            code: codes::SUCCESS,
            status: None,
            message: message.to_string(),
            body,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

/// `{ "data": T }` payload.
#[derive(Debug, Serialize)]
pub struct Data<T: Serialize> {
    pub data: T,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedFrameData {
    pub frame_id: i64,
    pub frame_img_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameData {
    pub frame_id: i64,
    pub frame_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiFrameData {
    pub frame_ai_url: String,
}

/// Error payload; `errors` holds field-level validation details.
#[derive(Debug, Default, Serialize)]
pub struct ErrorDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<serde_json::Value>,
}
