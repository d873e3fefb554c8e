// Test utilities and integration tests

pub mod test_utils {
    use std::sync::Arc;

    use axum::Router;
    use diesel::{ r2d2::{ ConnectionManager, Pool }, PgConnection };
    use diesel_migrations::MigrationHarness;

    use crate::{ config::{ database::PgPool, Config, DatabaseConfig }, create_app, AppState };

    pub const TEST_JWT_SECRET: &[u8] = b"test-secret";

    /// Pool that never connects: handler tests that stop at the auth or
    /// validation layer must not need a live database.
    pub fn unconnected_pool() -> PgPool {
        let manager = ConnectionManager::<PgConnection>::new(
            "postgresql://localhost/volunteer_hub_unused"
        );
        Pool::builder().max_size(2).build_unchecked(manager)
    }

    pub fn test_config(environment: &str) -> Config {
        Config {
            environment: environment.to_string(),
            database: DatabaseConfig::with_pool(unconnected_pool()),
        }
    }

    pub fn test_app(environment: &str) -> Router {
        let state = Arc::new(AppState::for_testing(test_config(environment)));
        create_app(state.clone()).with_state(state)
    }

    /// Live pool for ledger integration tests, migrated and ready. `None`
    /// when TEST_DATABASE_URL is not set; callers skip in that case.
    pub fn test_db_pool() -> Option<PgPool> {
        let database_url = std::env::var("TEST_DATABASE_URL").ok()?;

        let manager = ConnectionManager::<PgConnection>::new(database_url);
        let pool = Pool::builder().max_size(8).build(manager).ok()?;

        let mut conn = pool.get().ok()?;
        conn.run_pending_migrations(crate::MIGRATIONS).ok()?;

        Some(pool)
    }
}

mod router_tests {
    use axum::{
        body::Body,
        http::{ header, Request, StatusCode },
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::test_utils::{ test_app, TEST_JWT_SECRET };
    use crate::utils::token::create_token;

    fn session_request(email: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/session")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(format!(r#"{{"email":"{}"}}"#, email)))
            .unwrap()
    }

    #[tokio::test]
    async fn session_sets_token_cookie_in_development() {
        let app = test_app("development");

        let response = app.oneshot(session_request("organizer@example.com")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .expect("Missing Set-Cookie header")
            .to_str()
            .unwrap();
        assert!(set_cookie.starts_with("token="));
        assert!(set_cookie.contains("HttpOnly"));
        assert!(set_cookie.contains("SameSite=Strict"));
        assert!(!set_cookie.contains("Secure"));
    }

    #[tokio::test]
    async fn session_cookie_is_cross_site_capable_in_production() {
        let app = test_app("production");

        let response = app.oneshot(session_request("organizer@example.com")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .expect("Missing Set-Cookie header")
            .to_str()
            .unwrap();
        assert!(set_cookie.contains("SameSite=None"));
        assert!(set_cookie.contains("Secure"));
    }

    #[tokio::test]
    async fn session_rejects_invalid_email() {
        let app = test_app("development");

        let response = app.oneshot(session_request("not-an-email")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn logout_expires_the_cookie() {
        let app = test_app("development");

        let response = app
            .oneshot(Request::builder().uri("/session/logout").body(Body::empty()).unwrap()).await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .expect("Missing Set-Cookie header")
            .to_str()
            .unwrap();
        assert!(set_cookie.starts_with("token=;") || set_cookie.starts_with("token=\"\""));
        assert!(set_cookie.contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn protected_routes_fail_closed_without_credential() {
        for (method, uri) in [
            ("GET", format!("/posts/{}", Uuid::new_v4())),
            ("DELETE", format!("/posts/{}", Uuid::new_v4())),
            ("POST", "/requests".to_string()),
            ("DELETE", format!("/requests?id={}&postId={}", Uuid::new_v4(), Uuid::new_v4())),
            ("GET", "/requests/by-volunteer/volunteer@example.com".to_string()),
            ("GET", "/posts/by-organizer/organizer@example.com".to_string()),
        ] {
            let app = test_app("development");
            let response = app
                .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[tokio::test]
    async fn tampered_token_is_unauthorized() {
        let app = test_app("development");
        let token = create_token("volunteer@example.com", b"wrong-secret", 3600).unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/requests/by-volunteer/volunteer@example.com")
                    .header(header::COOKIE, format!("token={}", token))
                    .body(Body::empty())
                    .unwrap()
            ).await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn identity_scoped_listings_forbid_other_identities() {
        let token = create_token("volunteer@example.com", TEST_JWT_SECRET, 3600).unwrap();

        for uri in [
            "/requests/by-volunteer/other@example.com",
            "/posts/by-organizer/other@example.com",
        ] {
            let app = test_app("development");
            let response = app
                .oneshot(
                    Request::builder()
                        .uri(uri)
                        .header(header::COOKIE, format!("token={}", token))
                        .body(Body::empty())
                        .unwrap()
                ).await
                .unwrap();

            assert_eq!(response.status(), StatusCode::FORBIDDEN);
        }
    }

    #[tokio::test]
    async fn bearer_header_is_accepted_as_fallback_transport() {
        // Forbidden (not unauthorized) proves the credential itself passed
        let app = test_app("development");
        let token = create_token("volunteer@example.com", TEST_JWT_SECRET, 3600).unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/requests/by-volunteer/other@example.com")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap()
            ).await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn root_greets_and_unknown_routes_fall_back_to_404() {
        let app = test_app("development");
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap()).await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"Hello from volunteer management server...");

        let app = test_app("development");
        let response = app
            .oneshot(Request::builder().uri("/no-such-route").body(Body::empty()).unwrap()).await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

// Ledger integration tests against a real database. Skipped (early return)
// unless TEST_DATABASE_URL points at a migrated-or-migratable PostgreSQL.
mod ledger_tests {
    use chrono::Utc;
    use diesel::prelude::*;
    use uuid::Uuid;

    use super::test_utils::test_db_pool;
    use crate::{
        config::database::PgPool,
        dto::request_dtos::CreateVolunteerRequest,
        models::{ NewPost, Post },
        repositories::post_repository::{ PostRepository, SlotAdjust },
        schema::{ posts, requests },
        services::request_service::{ LedgerError, RequestLedger },
    };

    fn create_test_post(pool: &PgPool, slots: i32) -> Post {
        PostRepository::create(pool, NewPost {
            title: format!("Beach Cleanup {}", Uuid::new_v4()),
            description: "Help clean the shoreline".to_string(),
            category: "environment".to_string(),
            location: "Shoreline Park".to_string(),
            thumbnail: "https://example.com/cleanup.png".to_string(),
            deadline: Utc::now().naive_utc() + chrono::Duration::days(30),
            organizer_name: "Test Organizer".to_string(),
            organizer_email: format!("organizer-{}@example.com", Uuid::new_v4()),
            slots_remaining: slots,
        }).expect("Failed to create test post")
    }

    fn apply_payload(post_id: Uuid) -> CreateVolunteerRequest {
        CreateVolunteerRequest {
            post_id,
            volunteer_name: "Test Volunteer".to_string(),
            suggestion: None,
        }
    }

    fn slots_of(pool: &PgPool, post_id: Uuid) -> i32 {
        PostRepository::get(pool, post_id)
            .expect("Failed to load post")
            .expect("Post vanished")
            .slots_remaining
    }

    fn live_requests_for(pool: &PgPool, post_id: Uuid) -> i64 {
        let mut conn = pool.get().expect("Failed to get test connection");
        requests::table
            .filter(requests::post_id.eq(post_id))
            .count()
            .get_result(&mut conn)
            .expect("Failed to count requests")
    }

    fn cleanup_post(pool: &PgPool, post_id: Uuid) {
        let mut conn = pool.get().expect("Failed to get test connection");
        diesel
            ::delete(requests::table.filter(requests::post_id.eq(post_id)))
            .execute(&mut conn)
            .expect("Failed to delete test requests");
        diesel
            ::delete(posts::table.find(post_id))
            .execute(&mut conn)
            .expect("Failed to delete test post");
    }

    #[test]
    fn walkthrough_of_the_full_request_lifecycle() {
        let Some(pool) = test_db_pool() else {
            return;
        };
        let ledger = RequestLedger::new(pool.clone());

        let post = create_test_post(&pool, 2);
        let a = format!("a-{}@example.com", Uuid::new_v4());
        let b = format!("b-{}@example.com", Uuid::new_v4());
        let c = format!("c-{}@example.com", Uuid::new_v4());

        // A applies
        let request_a = ledger.apply(&a, apply_payload(post.id)).expect("A's apply failed");
        assert_eq!(slots_of(&pool, post.id), 1);
        assert_eq!(request_a.volunteer_email, a);
        assert_eq!(request_a.post_title, post.title);

        // A applies again: rejected, nothing changes
        assert!(matches!(
            ledger.apply(&a, apply_payload(post.id)),
            Err(LedgerError::DuplicateRequest)
        ));
        assert_eq!(slots_of(&pool, post.id), 1);

        // B takes the last slot
        ledger.apply(&b, apply_payload(post.id)).expect("B's apply failed");
        assert_eq!(slots_of(&pool, post.id), 0);

        // C finds the post exhausted; counter stays at zero, no row appears
        assert!(matches!(
            ledger.apply(&c, apply_payload(post.id)),
            Err(LedgerError::SlotsExhausted)
        ));
        assert_eq!(slots_of(&pool, post.id), 0);
        assert_eq!(live_requests_for(&pool, post.id), 2);

        // A cancels, freeing a slot for C
        ledger.cancel(request_a.id, post.id).expect("A's cancel failed");
        assert_eq!(slots_of(&pool, post.id), 1);

        ledger.apply(&c, apply_payload(post.id)).expect("C's second apply failed");
        assert_eq!(slots_of(&pool, post.id), 0);

        // Invariant: counter equals capacity minus live requests
        assert_eq!(live_requests_for(&pool, post.id), 2);

        cleanup_post(&pool, post.id);
    }

    #[test]
    fn cancel_demands_an_existing_request_with_matching_post() {
        let Some(pool) = test_db_pool() else {
            return;
        };
        let ledger = RequestLedger::new(pool.clone());

        let post = create_test_post(&pool, 3);
        let volunteer = format!("v-{}@example.com", Uuid::new_v4());
        let request = ledger.apply(&volunteer, apply_payload(post.id)).expect("apply failed");

        // Wrong post id: rejected without touching the counter
        assert!(matches!(
            ledger.cancel(request.id, Uuid::new_v4()),
            Err(LedgerError::RequestNotFound)
        ));
        assert_eq!(slots_of(&pool, post.id), 2);

        // Unknown request id
        assert!(matches!(
            ledger.cancel(Uuid::new_v4(), post.id),
            Err(LedgerError::RequestNotFound)
        ));

        // Proper cancel restores the slot and the pair becomes usable again
        ledger.cancel(request.id, post.id).expect("cancel failed");
        assert_eq!(slots_of(&pool, post.id), 3);
        assert_eq!(live_requests_for(&pool, post.id), 0);

        ledger.apply(&volunteer, apply_payload(post.id)).expect("re-apply after cancel failed");
        assert_eq!(slots_of(&pool, post.id), 2);

        cleanup_post(&pool, post.id);
    }

    #[test]
    fn apply_on_a_missing_post_is_not_found() {
        let Some(pool) = test_db_pool() else {
            return;
        };
        let ledger = RequestLedger::new(pool.clone());

        let volunteer = format!("v-{}@example.com", Uuid::new_v4());
        assert!(matches!(
            ledger.apply(&volunteer, apply_payload(Uuid::new_v4())),
            Err(LedgerError::PostNotFound)
        ));
    }

    #[test]
    fn concurrent_applies_never_oversubscribe() {
        let Some(pool) = test_db_pool() else {
            return;
        };
        let ledger = RequestLedger::new(pool.clone());

        let post = create_test_post(&pool, 3);

        let results: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..10)
                .map(|i| {
                    let ledger = ledger.clone();
                    let post_id = post.id;
                    scope.spawn(move || {
                        let volunteer = format!("burst-{}-{}@example.com", i, Uuid::new_v4());
                        ledger.apply(&volunteer, apply_payload(post_id))
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().expect("apply thread panicked"))
                .collect()
        });

        let successes = results
            .iter()
            .filter(|r| r.is_ok())
            .count();
        assert_eq!(successes, 3);
        for result in &results {
            if let Err(e) = result {
                assert!(matches!(e, LedgerError::SlotsExhausted));
            }
        }

        // The counter bottomed out at zero and matches the persisted rows
        assert_eq!(slots_of(&pool, post.id), 0);
        assert_eq!(live_requests_for(&pool, post.id), 3);

        cleanup_post(&pool, post.id);
    }

    #[test]
    fn concurrent_duplicate_applies_decrement_exactly_once() {
        let Some(pool) = test_db_pool() else {
            return;
        };
        let ledger = RequestLedger::new(pool.clone());

        let post = create_test_post(&pool, 5);
        let volunteer = format!("dup-{}@example.com", Uuid::new_v4());

        let results: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let ledger = ledger.clone();
                    let volunteer = volunteer.clone();
                    let post_id = post.id;
                    scope.spawn(move || ledger.apply(&volunteer, apply_payload(post_id)))
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().expect("apply thread panicked"))
                .collect()
        });

        let successes = results
            .iter()
            .filter(|r| r.is_ok())
            .count();
        assert_eq!(successes, 1);

        // Exactly one row, exactly one decrement: the losers' decrements
        // were all compensated
        assert_eq!(live_requests_for(&pool, post.id), 1);
        assert_eq!(slots_of(&pool, post.id), 4);

        cleanup_post(&pool, post.id);
    }

    #[test]
    fn adjust_slots_enforces_the_floor_and_skips_missing_posts() {
        let Some(pool) = test_db_pool() else {
            return;
        };

        let post = create_test_post(&pool, 0);

        assert!(matches!(
            PostRepository::adjust_slots(&pool, post.id, -1).expect("adjust failed"),
            SlotAdjust::Insufficient
        ));
        assert_eq!(slots_of(&pool, post.id), 0);

        // No upper bound: increments past the original capacity are allowed
        assert!(matches!(
            PostRepository::adjust_slots(&pool, post.id, 1).expect("adjust failed"),
            SlotAdjust::Adjusted(_)
        ));
        assert_eq!(slots_of(&pool, post.id), 1);

        assert!(matches!(
            PostRepository::adjust_slots(&pool, Uuid::new_v4(), -1).expect("adjust failed"),
            SlotAdjust::NotFound
        ));

        cleanup_post(&pool, post.id);
    }

    #[test]
    fn title_search_is_case_insensitive_substring() {
        let Some(pool) = test_db_pool() else {
            return;
        };

        let marker = Uuid::new_v4().simple().to_string();
        let mut post = create_test_post(&pool, 1);
        post = PostRepository::update(&pool, post.id, crate::models::UpdatePost {
            title: Some(format!("River Restoration {}", marker)),
            ..Default::default()
        })
            .expect("update failed")
            .expect("post vanished");

        let needle = format!("restoration {}", marker);
        let found = PostRepository::list(&pool, Some(needle.as_str())).expect("list failed");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, post.id);

        let miss = PostRepository::list(&pool, Some("zzz-no-such-title-zzz")).expect(
            "list failed"
        );
        assert!(miss.is_empty());

        cleanup_post(&pool, post.id);
    }
}
