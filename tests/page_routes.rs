use axum::{
    body::{self, Body},
    http::{Request, StatusCode, header},
};
use serde_json::Value;
use tower::ServiceExt; // for `oneshot`
use uuid::Uuid;

use scooter_rental::{
    auth::Role,
    db::entities::partner_station,
    test_helpers::{TestApp, fixed_time, test_app},
};

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

fn location(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .expect("redirect location")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("build request")
}

fn signed_get(app: &TestApp, uri: &str, user_id: Uuid) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(
            header::AUTHORIZATION,
            format!("Bearer {}", app.access_token(user_id, vec![Role::User])),
        )
        .body(Body::empty())
        .expect("build request")
}

#[tokio::test]
async fn anonymous_private_page_redirects_to_default_locale_login() {
    let app = test_app(b"page-secret");

    let response = app.router.oneshot(get("/dashboard")).await.unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/en/login");
}

#[tokio::test]
async fn redirect_keeps_the_locale_from_the_path() {
    let app = test_app(b"page-secret");

    let response = app.router.oneshot(get("/fr/settings")).await.unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/fr/login");
}

#[tokio::test]
async fn redirect_falls_back_to_accept_language() {
    let app = test_app(b"page-secret");
    let request = Request::builder()
        .uri("/rental-history")
        .header(header::ACCEPT_LANGUAGE, "de-DE,fr-CA;q=0.8,en;q=0.5")
        .body(Body::empty())
        .unwrap();

    let response = app.router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/fr/login");
}

#[tokio::test]
async fn rejected_access_cookie_without_refresh_redirects() {
    let app = test_app(b"page-secret");
    let request = Request::builder()
        .uri("/partner-program")
        .header(header::COOKIE, "sr-access-token=not-a-jwt; NEXT_LOCALE=fr")
        .body(Body::empty())
        .unwrap();

    let response = app.router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/fr/login");
}

#[tokio::test]
async fn public_pages_render_without_a_session() {
    let app = test_app(b"page-secret");

    for (uri, page, locale) in [
        ("/", "home", "en"),
        ("/fr", "home", "fr"),
        ("/login", "login", "en"),
        ("/fr/register", "register", "fr"),
    ] {
        let response = app.router.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{uri}");

        let body = json_body(response).await;
        assert_eq!(body["data"]["page"], page, "{uri}");
        assert_eq!(body["data"]["locale"], locale, "{uri}");
        assert_eq!(body["data"]["authenticated"], false, "{uri}");
    }
}

#[tokio::test]
async fn api_routes_are_not_redirected() {
    let app = test_app(b"page-secret");

    let response = app.router.oneshot(get("/api/v1/public")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn signed_in_page_carries_profile_and_listing() {
    let app = test_app(b"page-secret");
    let user_id = Uuid::new_v4();
    let profile = app.sign_in_profile(user_id);
    for second in 0..3 {
        app.stations
            .seed(partner_station::Model {
                id: Uuid::new_v4(),
                created_at: fixed_time(second),
                updated_at: fixed_time(second),
                user_id: Some(profile.id),
                name: format!("Station {second}"),
                address: "Place de la Comédie".to_string(),
                max_slots: 8,
                filled_slots: 2,
                is_open: true,
            })
            .unwrap();
    }

    let response = app
        .router
        .clone()
        .oneshot(signed_get(&app, "/fr/partner-program", user_id))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["page"], "partner-program");
    assert_eq!(body["data"]["locale"], "fr");
    assert_eq!(body["data"]["authenticated"], true);
    assert_eq!(body["data"]["profile"]["id"], profile.id.to_string());
    assert_eq!(body["data"]["listing"]["total_count"], 3);
    assert_eq!(body["data"]["listing"]["pages_loaded"], 1);
}

#[tokio::test]
async fn unsupported_locale_is_not_found_for_signed_in_callers() {
    let app = test_app(b"page-secret");
    let user_id = Uuid::new_v4();
    app.sign_in_profile(user_id);

    let response = app
        .router
        .clone()
        .oneshot(signed_get(&app, "/de/dashboard", user_id))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Page not found");
}
