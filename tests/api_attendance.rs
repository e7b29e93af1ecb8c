#[macro_use]
mod common;

use actix_web::{http::StatusCode, test};
use chrono::{Days, NaiveDate, Utc};
use serde_json::{Value, json};

use schoolhub::models::{
    students::requests::NewStudent,
    users::entities::{User, UserRole},
};
use schoolhub::storage::Storage;

fn days_ago(n: u64) -> NaiveDate {
    Utc::now().date_naive() - Days::new(n)
}

#[actix_web::test]
async fn session_is_created_once_then_returned() {
    let storage = common::storage().await;
    let school = common::school(&storage, "ATT1").await;
    let teacher = common::user(&storage, Some(school.id), "teacher", UserRole::Teacher).await;
    let class = common::class(&storage, school.id, "7A").await;
    let app = test_app!(storage);

    let body = json!({ "class_id": class.id, "session_date": days_ago(1) });

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/attendance/sessions")
            .insert_header(common::bearer(&teacher))
            .set_json(&body)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let first: Value = test::read_body_json(resp).await;
    assert_eq!(first["data"]["created"], true);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/attendance/sessions")
            .insert_header(common::bearer(&teacher))
            .set_json(&body)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let second: Value = test::read_body_json(resp).await;
    assert_eq!(second["data"]["created"], false);
    assert_eq!(second["data"]["session"]["id"], first["data"]["session"]["id"]);

    // 不能为未来日期开场次
    let tomorrow = Utc::now().date_naive() + Days::new(1);
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/attendance/sessions")
            .insert_header(common::bearer(&teacher))
            .set_json(json!({ "class_id": class.id, "session_date": tomorrow }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn locked_sessions_reject_changes() {
    let storage = common::storage().await;
    let school = common::school(&storage, "ATT2").await;
    let admin = common::user(&storage, Some(school.id), "admin", UserRole::SchoolAdmin).await;
    let root = common::super_admin(&storage).await;
    let class = common::class(&storage, school.id, "7A").await;
    let student = common::student(&storage, school.id, "S-001").await;
    common::enroll(&storage, school.id, student.id, class.id).await;
    let app = test_app!(storage);

    let mut session_ids = Vec::new();
    for day in [1, 2] {
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/attendance/sessions")
                .insert_header(common::bearer(&admin))
                .set_json(json!({ "class_id": class.id, "session_date": days_ago(day) }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        session_ids.push(body["data"]["session"]["id"].as_i64().unwrap());
    }
    let locked_id = session_ids[0];
    let session_uri = format!("/api/attendance/sessions/{locked_id}");

    // 重复加锁不是错误
    for _ in 0..2 {
        let resp = test::call_service(
            &app,
            test::TestRequest::patch()
                .uri(&session_uri)
                .insert_header(common::bearer(&admin))
                .set_json(json!({ "action": "lock" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["is_locked"], true);
    }

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!(
                "/api/attendance/sessions?school_id={}&is_locked=true",
                school.id
            ))
            .insert_header(common::bearer(&root))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["pagination"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["id"], locked_id);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/attendance/records")
            .insert_header(common::bearer(&admin))
            .set_json(json!({
                "session_id": locked_id,
                "records": [{ "student_id": student.id, "status": "present" }],
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&session_uri)
            .insert_header(common::bearer(&admin))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let resp = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri(&session_uri)
            .insert_header(common::bearer(&admin))
            .set_json(json!({ "action": "archive" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    for _ in 0..2 {
        let resp = test::call_service(
            &app,
            test::TestRequest::patch()
                .uri(&session_uri)
                .insert_header(common::bearer(&admin))
                .set_json(json!({ "action": "unlock" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["is_locked"], false);
    }

    // 解锁后可以继续点名
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/attendance/records")
            .insert_header(common::bearer(&admin))
            .set_json(json!({
                "session_id": locked_id,
                "records": [{ "student_id": student.id, "status": "late" }],
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn session_detail_only_shows_own_records_to_families() {
    let storage = common::storage().await;
    let school = common::school(&storage, "ATT3").await;
    let teacher = common::user(&storage, Some(school.id), "teacher", UserRole::Teacher).await;
    let pupil = common::user(&storage, Some(school.id), "pupil", UserRole::Student).await;
    let parent = common::user(&storage, Some(school.id), "parent", UserRole::Guardian).await;
    let class = common::class(&storage, school.id, "7A").await;

    let own = storage
        .create_student(NewStudent {
            user_id: Some(pupil.id),
            ..common::new_student(school.id, "S-001")
        })
        .await
        .unwrap();
    let classmate = storage
        .create_student(NewStudent {
            guardian_id: Some(parent.id),
            ..common::new_student(school.id, "S-002")
        })
        .await
        .unwrap();
    common::enroll(&storage, school.id, own.id, class.id).await;
    common::enroll(&storage, school.id, classmate.id, class.id).await;
    let app = test_app!(storage);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/attendance/sessions")
            .insert_header(common::bearer(&teacher))
            .set_json(json!({ "class_id": class.id, "session_date": days_ago(1) }))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    let session_id = body["data"]["session"]["id"].as_i64().unwrap();

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/attendance/records")
            .insert_header(common::bearer(&teacher))
            .set_json(json!({
                "session_id": session_id,
                "records": [
                    { "student_id": own.id, "status": "present" },
                    { "student_id": classmate.id, "status": "absent" },
                ],
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["saved"].as_array().unwrap().len(), 2);

    let detail = |user: &User| {
        test::TestRequest::get()
            .uri(&format!("/api/attendance/sessions/{session_id}"))
            .insert_header(common::bearer(user))
            .to_request()
    };

    let resp = test::call_service(&app, detail(&teacher)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["records"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["summary"]["total"], 2);

    let resp = test::call_service(&app, detail(&pupil)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let records = body["data"]["records"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["student_id"], own.id);
    assert_eq!(body["data"]["summary"]["total"], 1);
    assert_eq!(body["data"]["summary"]["present"], 1);
    assert_eq!(body["data"]["summary"]["absent"], 0);

    let resp = test::call_service(&app, detail(&parent)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let records = body["data"]["records"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["student_id"], classmate.id);
    assert_eq!(body["data"]["summary"]["total"], 1);
    assert_eq!(body["data"]["summary"]["absent"], 1);
}
