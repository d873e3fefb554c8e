use chrono::NaiveDateTime;
use serde::Deserialize;
use validator::Validate;

#[derive(Validate, Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,

    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,

    pub thumbnail: String,

    pub deadline: NaiveDateTime,

    #[validate(length(min = 1, message = "Organizer name is required"))]
    pub organizer_name: String,

    #[validate(range(min = 0, message = "volunteersNeeded cannot be negative"))]
    pub volunteers_needed: i32,
}

#[derive(Validate, Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    #[serde(default)] // This makes the field optional in JSON
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub deadline: Option<NaiveDateTime>,
    #[serde(default)]
    pub organizer_name: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0, message = "volunteersNeeded cannot be negative"))]
    pub volunteers_needed: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct PostSearchQuery {
    pub search: Option<String>,
}
