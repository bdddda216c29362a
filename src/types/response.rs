use serde::Serialize;
use utoipa::ToSchema;

/// `{"success": true}` body for deletes
#[derive(Debug, Serialize, ToSchema)]
pub struct SuccessResponse {
    #[schema(example = true)]
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Message-only response
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
