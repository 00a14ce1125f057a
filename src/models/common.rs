use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error payload inside the `{"success": false, "error": {...}}` envelope
/// that `AppError::error_response` emits. Handlers build success envelopes
/// inline; this type exists so the error shape appears in the OpenAPI doc.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}
