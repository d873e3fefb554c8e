use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

// Body for POST /requests. The volunteer identity comes from the verified
// token, never from this payload.
#[derive(Validate, Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVolunteerRequest {
    pub post_id: Uuid,

    #[validate(length(min = 1, message = "Volunteer name is required"))]
    pub volunteer_name: String,

    #[serde(default)]
    pub suggestion: Option<String>,
}

// Query string for DELETE /requests?id=&postId=
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelRequestQuery {
    pub id: Uuid,
    pub post_id: Uuid,
}
