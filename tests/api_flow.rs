#[macro_use]
mod common;

use std::sync::Arc;

use actix_web::{http::StatusCode, test};
use serde_json::{Value, json};

use schoolhub::models::{users::entities::UserRole, users::requests::CreateUserRequest};
use schoolhub::storage::Storage;
use schoolhub::utils::password::hash_password;

async fn seed_super_admin(storage: &Arc<dyn Storage>) {
    storage
        .create_user(CreateUserRequest {
            school_id: None,
            username: "root".to_string(),
            email: "root@example.com".to_string(),
            password: hash_password("Sup3r-secret").unwrap(),
            role: UserRole::SchoolAdmin,
            is_super_admin: true,
            display_name: None,
            phone: None,
        })
        .await
        .unwrap();
}

#[actix_web::test]
async fn login_then_manage_schools() {
    let storage = common::storage().await;
    seed_super_admin(&storage).await;
    let app = test_app!(storage);

    let health = test::TestRequest::get().uri("/api/system/health").to_request();
    let resp = test::call_service(&app, health).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let anonymous = test::TestRequest::get().uri("/api/admin/schools").to_request();
    let resp = test::call_service(&app, anonymous).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let wrong = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"username": "root", "password": "nope"}))
        .to_request();
    let resp = test::call_service(&app, wrong).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let login = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"username": "root", "password": "Sup3r-secret"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, login).await;
    let token = body["data"]["access_token"]
        .as_str()
        .expect("login returns an access token")
        .to_string();
    assert!(body["data"]["user"].get("password_hash").is_none());
    let bearer = ("Authorization", format!("Bearer {token}"));

    let create = test::TestRequest::post()
        .uri("/api/admin/schools")
        .insert_header(bearer.clone())
        .set_json(json!({"name": "Hillside", "code": "HILL"}))
        .to_request();
    let resp = test::call_service(&app, create).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let duplicate = test::TestRequest::post()
        .uri("/api/admin/schools")
        .insert_header(bearer.clone())
        .set_json(json!({"name": "Hillside Again", "code": "HILL"}))
        .to_request();
    let resp = test::call_service(&app, duplicate).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let list = test::TestRequest::get()
        .uri("/api/admin/schools")
        .insert_header(bearer)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, list).await;
    assert_eq!(body["data"]["pagination"]["total"], json!(1));
    assert_eq!(body["data"]["items"][0]["code"], json!("HILL"));
}
