mod common;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use common::*;
use quickcourt_backend::handlers::auth_config;
use quickcourt_backend::middlewares::AuthMiddleware;
use quickcourt_backend::models::{AuthResponse, RegisterRequest};
use quickcourt_backend::services::AuthService;
use quickcourt_backend::utils::JwtService;
use serde_json::json;

fn jwt() -> JwtService {
    JwtService::new("test-secret", 3600, 86400)
}

async fn register(service: &AuthService) -> AuthResponse {
    service
        .register(RegisterRequest {
            email: "priya@test.com".to_string(),
            password: "Password123".to_string(),
            full_name: "Priya Sharma".to_string(),
            phone: None,
        })
        .await
        .expect("Registration should succeed")
}

#[tokio::test]
async fn refresh_needs_no_access_token() {
    let pool = setup_test_db().await;
    let auth = AuthService::new(pool.clone(), jwt());
    let tokens = register(&auth).await;

    let app = test::init_service(
        App::new()
            .wrap(AuthMiddleware::new(jwt()))
            .app_data(web::Data::new(auth.clone()))
            .service(web::scope("/api").configure(auth_config)),
    )
    .await;

    // no Authorization header: an expired access token must not lock the
    // user out of getting a fresh pair
    let req = test::TestRequest::post()
        .uri("/api/auth/refresh")
        .set_json(json!({ "refresh_token": tokens.refresh_token }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert!(body["data"]["access_token"].as_str().is_some());
    assert!(body["data"]["refresh_token"].as_str().is_some());

    // an access token is no substitute for a refresh token
    let req = test::TestRequest::post()
        .uri("/api/auth/refresh")
        .set_json(json!({ "refresh_token": tokens.access_token }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_still_requires_a_bearer_token() {
    let pool = setup_test_db().await;
    let auth = AuthService::new(pool.clone(), jwt());
    let tokens = register(&auth).await;

    let app = test::init_service(
        App::new()
            .wrap(AuthMiddleware::new(jwt()))
            .app_data(web::Data::new(auth.clone()))
            .service(web::scope("/api").configure(auth_config)),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/auth/profile").to_request();
    let err = test::try_call_service(&app, req)
        .await
        .err()
        .expect("Profile without a token should be rejected");
    assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/auth/profile")
        .insert_header(("Authorization", format!("Bearer {}", tokens.access_token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["email"], "priya@test.com");
}
