use actix_web::{http::StatusCode, test::TestRequest};
use storefront_engine::{
    cache::CatalogCache,
    test_utils::fixtures::{seeded_catalog, ADMIN_EMAIL, ADMIN_PASSWORD, SHOPPER_EMAIL, SHOPPER_PASSWORD},
    RemoteError,
};

use super::helpers::*;

#[actix_web::test]
async fn admin_can_log_in() {
    let _ = env_logger::try_init().ok();
    let seeded = seeded_catalog();
    let app = test_app(&seeded.db, &CatalogCache::new()).await;
    let (status, session) = login(&app, "ADMIN@loja.com", ADMIN_PASSWORD).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!session["access_token"].as_str().unwrap().is_empty());
    assert_eq!(session["identity"]["email"], ADMIN_EMAIL);
}

#[actix_web::test]
async fn wrong_password_is_unauthorized() {
    let _ = env_logger::try_init().ok();
    let seeded = seeded_catalog();
    let app = test_app(&seeded.db, &CatalogCache::new()).await;
    let (status, body) = login(&app, ADMIN_EMAIL, "senha-errada").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authentication required. Invalid e-mail or password");
}

#[actix_web::test]
async fn shoppers_cannot_log_in_to_the_back_office() {
    let _ = env_logger::try_init().ok();
    let seeded = seeded_catalog();
    let app = test_app(&seeded.db, &CatalogCache::new()).await;
    let (status, body) = login(&app, SHOPPER_EMAIL, SHOPPER_PASSWORD).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Insufficient Permissions. cliente@loja.com is not allowed to use the back-office");
}

#[actix_web::test]
async fn malformed_login_body_is_a_bad_request() {
    let _ = env_logger::try_init().ok();
    let seeded = seeded_catalog();
    let app = test_app(&seeded.db, &CatalogCache::new()).await;
    let req = TestRequest::post().uri("/auth/login").set_json(serde_json::json!({ "email": ADMIN_EMAIL }));
    let (status, body) = send_json(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Could not read request body"), "was: {body}");
    assert_eq!(seeded.db.call_count("sign_in"), 0);
}

#[actix_web::test]
async fn auth_service_failure_is_a_bad_gateway() {
    let _ = env_logger::try_init().ok();
    let seeded = seeded_catalog();
    let app = test_app(&seeded.db, &CatalogCache::new()).await;
    seeded.db.fail_next(RemoteError::new("auth service unavailable"));
    let (status, _) = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[actix_web::test]
async fn admin_routes_need_a_token() {
    let _ = env_logger::try_init().ok();
    let seeded = seeded_catalog();
    let app = test_app(&seeded.db, &CatalogCache::new()).await;
    let (status, body) = send(&app, TestRequest::get().uri("/admin/dashboard")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, r#"{"error":"Authentication required. A bearer token is required"}"#);

    let req = TestRequest::get().uri("/admin/dashboard").insert_header(("Authorization", "Basic YWRtaW46c2VuaGE="));
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(seeded.db.call_count("verify_access_token"), 0);
}

#[actix_web::test]
async fn admin_routes_reject_invalid_tokens() {
    let _ = env_logger::try_init().ok();
    let seeded = seeded_catalog();
    let app = test_app(&seeded.db, &CatalogCache::new()).await;
    let (status, body) = send(&app, bearer(TestRequest::get().uri("/admin/dashboard"), "not-a-token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("The access token is invalid or has expired"), "was: {body}");

    let token = admin_token(&app).await;
    seeded.db.revoke_tokens();
    let (status, _) = send(&app, bearer(TestRequest::get().uri("/admin/dashboard"), &token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn admin_routes_reject_non_admins() {
    let _ = env_logger::try_init().ok();
    let seeded = seeded_catalog();
    let app = test_app(&seeded.db, &CatalogCache::new()).await;
    // A shopper's session, issued directly by the auth service
    let session = {
        use storefront_engine::traits::AuthManagement;
        seeded.db.sign_in(SHOPPER_EMAIL, SHOPPER_PASSWORD).await.unwrap()
    };
    let req = bearer(TestRequest::post().uri("/admin/banners"), &session.access_token)
        .set_json(serde_json::json!({ "image_url": "https://cdn.example.com/x.jpg" }));
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(seeded.db.call_count("insert_banner"), 0);
    assert_eq!(seeded.db.banner_count(), 3);
}

#[actix_web::test]
async fn admin_token_opens_the_back_office() {
    let _ = env_logger::try_init().ok();
    let seeded = seeded_catalog();
    let app = test_app(&seeded.db, &CatalogCache::new()).await;
    let token = admin_token(&app).await;
    let (status, stats) = send_json(&app, bearer(TestRequest::get().uri("/admin/dashboard"), &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats, serde_json::json!({ "products": 3, "categories": 2, "banners": 3 }));
}
