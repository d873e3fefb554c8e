use tracing::{ debug, error, warn };
use uuid::Uuid;

use crate::{
    config::{ ConfigError, database::PgPool },
    dto::request_dtos::CreateVolunteerRequest,
    errors::{ ErrorMessage, HttpError },
    models::{ NewVolunteerRequest, VolunteerRequest, REQUEST_STATUS_REQUESTED },
    repositories::{
        post_repository::{ PostRepository, SlotAdjust },
        request_repository::{ RequestInsert, RequestRepository },
    },
};

// Bounded in-task retries before the compensation is handed to reconciliation
const COMPENSATION_ATTEMPTS: u32 = 3;

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("You have already requested on this post.")]
    DuplicateRequest,

    #[error("Post does not exist")]
    PostNotFound,

    #[error("No volunteer slots remaining on this post")]
    SlotsExhausted,

    #[error("Volunteer request does not exist")]
    RequestNotFound,

    #[error("Database error: {0}")] Database(#[from] ConfigError),
}

impl From<LedgerError> for HttpError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::DuplicateRequest =>
                HttpError::bad_request(ErrorMessage::DuplicateRequest.to_string()),
            LedgerError::PostNotFound =>
                HttpError::not_found(ErrorMessage::PostNotFound.to_string()),
            LedgerError::SlotsExhausted =>
                HttpError::conflict(ErrorMessage::SlotsExhausted.to_string()),
            LedgerError::RequestNotFound =>
                HttpError::not_found(ErrorMessage::RequestNotFound.to_string()),
            LedgerError::Database(e) => {
                error!("Ledger storage error: {}", e);
                HttpError::server_error(ErrorMessage::InternalServerError.to_string())
            }
        }
    }
}

/// The request ledger pairs every live volunteer request with exactly one
/// slot decrement on its post. The slot counter itself is only ever touched
/// through `PostRepository::adjust_slots`, and every decrement that cannot be
/// matched with a persisted request row is reverted before the error
/// surfaces.
#[derive(Clone)]
pub struct RequestLedger {
    pool: PgPool,
}

impl RequestLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply to volunteer on a post: one request per (post, volunteer) pair,
    /// one slot consumed on success.
    pub fn apply(
        &self,
        volunteer_email: &str,
        payload: CreateVolunteerRequest
    ) -> Result<VolunteerRequest, LedgerError> {
        // Fast duplicate check. The unique index on the pair is the
        // authoritative guard; this read just avoids burning a decrement in
        // the common case.
        if RequestRepository::find_pair(&self.pool, payload.post_id, volunteer_email)?.is_some() {
            return Err(LedgerError::DuplicateRequest);
        }

        // Consume the slot first. A request row must never exist without a
        // successful decrement behind it.
        let post = match PostRepository::adjust_slots(&self.pool, payload.post_id, -1) {
            Ok(SlotAdjust::Adjusted(post)) => post,
            Ok(SlotAdjust::Insufficient) => {
                return Err(LedgerError::SlotsExhausted);
            }
            Ok(SlotAdjust::NotFound) => {
                return Err(LedgerError::PostNotFound);
            }
            Err(e) => {
                // Unknown outcome (e.g. timeout mid-flight). Blindly
                // incrementing here could double-credit the post, so the
                // counter is handed to reconciliation instead.
                error!(
                    post_id = %payload.post_id,
                    "Slot decrement failed with unknown outcome; reconciliation required: {}",
                    e
                );
                return Err(LedgerError::Database(e));
            }
        };

        let new_request = NewVolunteerRequest {
            post_id: payload.post_id,
            post_title: post.title.clone(),
            volunteer_name: payload.volunteer_name,
            volunteer_email: volunteer_email.to_string(),
            suggestion: payload.suggestion,
            status: REQUEST_STATUS_REQUESTED.to_string(),
        };

        match RequestRepository::insert(&self.pool, new_request) {
            Ok(RequestInsert::Inserted(request)) => Ok(request),
            Ok(RequestInsert::DuplicatePair) => {
                // Lost the race to a concurrent apply for the same pair: the
                // winner owns the slot, so give this decrement back.
                self.compensate_decrement(payload.post_id);
                Err(LedgerError::DuplicateRequest)
            }
            Err(e) => {
                self.compensate_decrement(payload.post_id);
                Err(LedgerError::Database(e))
            }
        }
    }

    /// Cancel a volunteer request: the row is removed and the slot returned.
    /// The supplied post id must match the request's own back-reference.
    pub fn cancel(&self, request_id: Uuid, post_id: Uuid) -> Result<(), LedgerError> {
        let request = RequestRepository::get(&self.pool, request_id)?.ok_or(
            LedgerError::RequestNotFound
        )?;

        if request.post_id != post_id {
            return Err(LedgerError::RequestNotFound);
        }

        // A concurrent cancel may have removed the row already; only the
        // call that actually deleted it returns the slot.
        let deleted = RequestRepository::delete(&self.pool, request_id)?;
        if deleted == 0 {
            return Err(LedgerError::RequestNotFound);
        }

        match PostRepository::adjust_slots(&self.pool, post_id, 1) {
            Ok(SlotAdjust::Adjusted(post)) => {
                // No upper bound on the counter; only the zero floor is
                // enforced.
                debug!(
                    post_id = %post.id,
                    slots_remaining = post.slots_remaining,
                    "Returned slot after cancelled request"
                );
            }
            Ok(SlotAdjust::NotFound) => {
                warn!(post_id = %post_id, "Cancelled a request whose post no longer exists");
            }
            Ok(SlotAdjust::Insufficient) => {
                // Unreachable for a positive delta; logged in case the guard
                // semantics ever change underneath us.
                error!(post_id = %post_id, "Slot increment rejected on cancel");
            }
            Err(e) => {
                error!(
                    post_id = %post_id,
                    "Slot increment failed after cancel; reconciliation required: {}",
                    e
                );
                return Err(LedgerError::Database(e));
            }
        }

        Ok(())
    }

    pub fn list_by_volunteer(&self, email: &str) -> Result<Vec<VolunteerRequest>, LedgerError> {
        Ok(RequestRepository::list_by_volunteer(&self.pool, email)?)
    }

    // Revert a decrement whose request row never materialized. Retried a
    // bounded number of times, then logged as a reconciliation task; never
    // silently dropped.
    fn compensate_decrement(&self, post_id: Uuid) {
        for attempt in 1..=COMPENSATION_ATTEMPTS {
            match PostRepository::adjust_slots(&self.pool, post_id, 1) {
                Ok(SlotAdjust::Adjusted(_)) => {
                    debug!(post_id = %post_id, "Reverted orphaned slot decrement");
                    return;
                }
                Ok(SlotAdjust::NotFound) => {
                    // Post deleted in the window; there is no counter left
                    // to revert.
                    warn!(post_id = %post_id, "Post vanished before decrement could be reverted");
                    return;
                }
                Ok(SlotAdjust::Insufficient) => {
                    error!(post_id = %post_id, "Slot increment rejected during compensation");
                    return;
                }
                Err(e) => {
                    warn!(
                        post_id = %post_id,
                        attempt,
                        "Compensating increment failed: {}",
                        e
                    );
                }
            }
        }

        error!(
            post_id = %post_id,
            "RECONCILIATION: slot decrement could not be reverted after {} attempts",
            COMPENSATION_ATTEMPTS
        );
    }
}
