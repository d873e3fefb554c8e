use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::{
    config::{ ConfigError, database::PgPool },
    models::{ Post, NewPost, UpdatePost },
    schema::posts,
};

/// Outcome of the atomic slot adjustment. `Insufficient` is the internal
/// invariant signal: the post exists but the delta would drive the counter
/// negative, so nothing was mutated.
#[derive(Debug)]
pub enum SlotAdjust {
    Adjusted(Post),
    Insufficient,
    NotFound,
}

// PostgreSQL LIKE treats % and _ as wildcards; user input is matched literally.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

pub struct PostRepository;

impl PostRepository {
    // CREATE POST
    pub fn create(pool: &PgPool, new_post: NewPost) -> Result<Post, ConfigError> {
        let mut conn = pool.get()?;

        let post = diesel::insert_into(posts::table).values(&new_post).get_result(&mut conn)?;

        Ok(post)
    }

    // GET POST BY ID
    pub fn get(pool: &PgPool, post_id: Uuid) -> Result<Option<Post>, ConfigError> {
        let mut conn = pool.get()?;

        let post = posts::table
            .find(post_id)
            .select(Post::as_select())
            .first::<Post>(&mut conn)
            .optional()?;

        Ok(post)
    }

    // GET ALL POSTS, optionally filtered by a case-insensitive title substring
    pub fn list(pool: &PgPool, search: Option<&str>) -> Result<Vec<Post>, ConfigError> {
        let mut conn = pool.get()?;

        let mut query = posts::table.into_boxed();

        if let Some(term) = search {
            let pattern = format!("%{}%", escape_like(term));
            query = query.filter(posts::title.ilike(pattern));
        }

        let result = query.select(Post::as_select()).load::<Post>(&mut conn)?;

        Ok(result)
    }

    // GET POSTS BY ORGANIZER
    pub fn list_by_organizer(pool: &PgPool, email: &str) -> Result<Vec<Post>, ConfigError> {
        let mut conn = pool.get()?;

        let result = posts::table
            .filter(posts::organizer_email.eq(email))
            .select(Post::as_select())
            .load::<Post>(&mut conn)?;

        Ok(result)
    }

    // UPDATE POST (merge-style; None fields untouched)
    pub fn update(
        pool: &PgPool,
        post_id: Uuid,
        mut changes: UpdatePost
    ) -> Result<Option<Post>, ConfigError> {
        let mut conn = pool.get()?;

        changes.updated_at = Some(Utc::now().naive_utc());

        let updated = diesel
            ::update(posts::table.find(post_id))
            .set(&changes)
            .get_result::<Post>(&mut conn)
            .optional()?;

        Ok(updated)
    }

    // DELETE POST
    pub fn delete(pool: &PgPool, post_id: Uuid) -> Result<usize, ConfigError> {
        let mut conn = pool.get()?;

        let deleted = diesel::delete(posts::table.find(post_id)).execute(&mut conn)?;

        Ok(deleted)
    }

    /// Atomic capacity adjustment: a single guarded UPDATE, so concurrent
    /// adjustments against the same post serialize at the database and the
    /// counter can never be observed (or committed) negative. Never
    /// implemented as a read-then-write pair.
    pub fn adjust_slots(
        pool: &PgPool,
        post_id: Uuid,
        delta: i32
    ) -> Result<SlotAdjust, ConfigError> {
        let mut conn = pool.get()?;

        let updated = diesel
            ::update(
                posts::table
                    .filter(posts::id.eq(post_id))
                    .filter(posts::slots_remaining.ge(-delta))
            )
            .set(posts::slots_remaining.eq(posts::slots_remaining + delta))
            .get_result::<Post>(&mut conn)
            .optional()?;

        match updated {
            Some(post) => Ok(SlotAdjust::Adjusted(post)),
            None => {
                // The guard rejected the delta or the row is gone; look once
                // to tell the two apart. Classification only, no mutation.
                let exists = posts::table
                    .find(post_id)
                    .select(posts::id)
                    .first::<Uuid>(&mut conn)
                    .optional()?
                    .is_some();

                if exists {
                    Ok(SlotAdjust::Insufficient)
                } else {
                    Ok(SlotAdjust::NotFound)
                }
            }
        }
    }
}
