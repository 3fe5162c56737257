use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::{Duration, Utc};
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use tower::ServiceExt; // for `oneshot`
use uuid::Uuid;

use scooter_rental::{
    db::entities::{auth_user, refresh_token},
    test_helpers::{fixed_time, test_app_with_db},
};

fn refresh_row(token: &str, user_id: Uuid) -> refresh_token::Model {
    refresh_token::Model {
        id: Uuid::new_v4(),
        created_at: fixed_time(0),
        updated_at: fixed_time(0),
        token: token.to_string(),
        user_id,
        expires_at: Utc::now().fixed_offset() + Duration::days(30),
        revoked: false,
    }
}

fn user_row(id: Uuid) -> auth_user::Model {
    auth_user::Model {
        id,
        created_at: fixed_time(0),
        updated_at: fixed_time(0),
        email: "rider@example.com".to_string(),
        password_hash: "hashed-password".to_string(),
        role: "user".to_string(),
        last_login_at: None,
    }
}

#[tokio::test]
async fn expired_access_cookie_is_renewed_from_refresh_cookie() {
    let user_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![refresh_row("old-refresh-token", user_id)]])
        .append_query_results([vec![user_row(user_id)]])
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .append_query_results([vec![refresh_row("new-refresh-token", user_id)]])
        .into_connection();
    let app = test_app_with_db(b"renewal-secret", db);
    app.sign_in_profile(user_id);

    let request = Request::builder()
        .uri("/dashboard")
        .header(
            header::COOKIE,
            "sr-access-token=expired; sr-refresh-token=old-refresh-token",
        )
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookies: Vec<&str> = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .collect();
    assert_eq!(cookies.len(), 2, "{cookies:?}");
    assert!(cookies
        .iter()
        .any(|cookie| cookie.starts_with("sr-refresh-token=new-refresh-token;")));
    assert!(cookies
        .iter()
        .all(|cookie| cookie.contains("HttpOnly") && cookie.contains("Path=/")));
}

#[tokio::test]
async fn valid_access_token_sets_no_cookies() {
    let user_id = Uuid::new_v4();
    let app = test_app_with_db(
        b"renewal-secret",
        MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
    );
    app.sign_in_profile(user_id);
    let token = app.access_token(user_id, vec![scooter_rental::auth::Role::User]);

    let request = Request::builder()
        .uri("/en/settings")
        .header(header::COOKIE, format!("sr-access-token={token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}
