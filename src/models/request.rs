use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{ Deserialize, Serialize };
use uuid::Uuid;

use crate::schema::requests;

pub const REQUEST_STATUS_REQUESTED: &str = "requested";

#[derive(Debug, Clone, Queryable, Serialize, Deserialize, Selectable)]
#[diesel(table_name = requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct VolunteerRequest {
    pub id: Uuid,
    pub post_id: Uuid,
    pub post_title: String,
    pub volunteer_name: String,
    pub volunteer_email: String,
    pub suggestion: Option<String>,
    pub status: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Deserialize, Clone)]
#[diesel(table_name = requests)]
pub struct NewVolunteerRequest {
    pub post_id: Uuid,
    pub post_title: String,
    pub volunteer_name: String,
    pub volunteer_email: String,
    pub suggestion: Option<String>,
    pub status: String,
}
