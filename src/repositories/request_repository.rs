use diesel::prelude::*;
use diesel::result::{ DatabaseErrorKind, Error as DieselError };
use uuid::Uuid;

use crate::{
    config::{ ConfigError, database::PgPool },
    models::{ VolunteerRequest, NewVolunteerRequest },
    schema::requests,
};

/// Insert outcome. The `(post_id, volunteer_email)` pair is unique at the
/// storage layer; a violation means a concurrent apply won the race.
#[derive(Debug)]
pub enum RequestInsert {
    Inserted(VolunteerRequest),
    DuplicatePair,
}

pub struct RequestRepository;

impl RequestRepository {
    // INSERT REQUEST
    pub fn insert(
        pool: &PgPool,
        new_request: NewVolunteerRequest
    ) -> Result<RequestInsert, ConfigError> {
        let mut conn = pool.get()?;

        match
            diesel
                ::insert_into(requests::table)
                .values(&new_request)
                .get_result::<VolunteerRequest>(&mut conn)
        {
            Ok(request) => Ok(RequestInsert::Inserted(request)),
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) =>
                Ok(RequestInsert::DuplicatePair),
            Err(e) => Err(e.into()),
        }
    }

    // GET REQUEST BY ID
    pub fn get(pool: &PgPool, request_id: Uuid) -> Result<Option<VolunteerRequest>, ConfigError> {
        let mut conn = pool.get()?;

        let request = requests::table
            .find(request_id)
            .select(VolunteerRequest::as_select())
            .first::<VolunteerRequest>(&mut conn)
            .optional()?;

        Ok(request)
    }

    // GET REQUEST BY (POST, VOLUNTEER) PAIR
    pub fn find_pair(
        pool: &PgPool,
        post_id: Uuid,
        volunteer_email: &str
    ) -> Result<Option<VolunteerRequest>, ConfigError> {
        let mut conn = pool.get()?;

        let request = requests::table
            .filter(requests::post_id.eq(post_id))
            .filter(requests::volunteer_email.eq(volunteer_email))
            .select(VolunteerRequest::as_select())
            .first::<VolunteerRequest>(&mut conn)
            .optional()?;

        Ok(request)
    }

    // DELETE REQUEST
    pub fn delete(pool: &PgPool, request_id: Uuid) -> Result<usize, ConfigError> {
        let mut conn = pool.get()?;

        let deleted = diesel::delete(requests::table.find(request_id)).execute(&mut conn)?;

        Ok(deleted)
    }

    // GET REQUESTS BY VOLUNTEER
    pub fn list_by_volunteer(
        pool: &PgPool,
        email: &str
    ) -> Result<Vec<VolunteerRequest>, ConfigError> {
        let mut conn = pool.get()?;

        let result = requests::table
            .filter(requests::volunteer_email.eq(email))
            .select(VolunteerRequest::as_select())
            .load::<VolunteerRequest>(&mut conn)?;

        Ok(result)
    }
}
