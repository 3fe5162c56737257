use axum::{
    body::{self, Body},
    http::{Request, StatusCode, header},
};
use sea_orm::{DatabaseBackend, MockDatabase};
use serde_json::Value;
use tower::ServiceExt; // for `oneshot`
use uuid::Uuid;

use scooter_rental::{
    auth::Role,
    routes::API_PREFIX,
    test_helpers::{TestApp, profile_model, test_app_with_db},
};

fn me_request(app: &TestApp, user_id: Uuid) -> Request<Body> {
    Request::builder()
        .uri(format!("{API_PREFIX}/me"))
        .header(
            header::AUTHORIZATION,
            format!("Bearer {}", app.access_token(user_id, vec![Role::User])),
        )
        .body(Body::empty())
        .expect("build request")
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn profile_is_loaded_once_then_served_from_cache() {
    let user_id = Uuid::new_v4();
    let profile = profile_model(user_id);
    // A single query result: a second database read would fail.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[profile.clone()]])
        .into_connection();
    let app = test_app_with_db(b"profile-secret", db);

    for _ in 0..2 {
        let response = app
            .router
            .clone()
            .oneshot(me_request(&app, user_id))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["data"]["profile"]["id"], profile.id.to_string());
        assert_eq!(body["data"]["identity"]["user_id"], user_id.to_string());
    }
}

#[tokio::test]
async fn identity_without_profile_is_not_authenticated() {
    let user_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<scooter_rental::db::entities::profile::Model>::new()])
        .into_connection();
    let app = test_app_with_db(b"profile-secret", db);

    let response = app
        .router
        .clone()
        .oneshot(me_request(&app, user_id))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Not authenticated");
}
