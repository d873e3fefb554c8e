pub mod post_dtos;
pub mod request_dtos;
pub mod session_dtos;

use serde::Serialize;

// Acknowledgement body shared by logout / delete style endpoints
#[derive(Serialize)]
pub struct AckResponse {
    pub success: bool,
    #[serde(rename = "deletedCount", skip_serializing_if = "Option::is_none")]
    pub deleted_count: Option<usize>,
}

impl AckResponse {
    pub fn ok() -> Self {
        Self { success: true, deleted_count: None }
    }

    pub fn deleted(count: usize) -> Self {
        Self { success: true, deleted_count: Some(count) }
    }
}
