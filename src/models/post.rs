use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{ Deserialize, Serialize };
use uuid::Uuid;

use crate::schema::posts;

#[derive(Debug, Clone, Queryable, Serialize, Deserialize, Selectable)]
#[diesel(table_name = posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub thumbnail: String,
    pub deadline: NaiveDateTime,
    pub organizer_name: String,
    pub organizer_email: String,
    pub slots_remaining: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Deserialize, Clone)]
#[diesel(table_name = posts)]
pub struct NewPost {
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub thumbnail: String,
    pub deadline: NaiveDateTime,
    pub organizer_name: String,
    pub organizer_email: String,
    pub slots_remaining: i32,
}

// Merge-style change set: None fields are left untouched by the update.
#[derive(AsChangeset, Deserialize, Default)]
#[diesel(table_name = posts)]
pub struct UpdatePost {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub thumbnail: Option<String>,
    pub deadline: Option<NaiveDateTime>,
    pub organizer_name: Option<String>,
    pub slots_remaining: Option<i32>,
    pub updated_at: Option<NaiveDateTime>,
}
