//! Testes HTTP do router completo (guardas, status e corpo de erro)

mod common;

use axum::http::{StatusCode, header::SET_COOKIE};
use serde_json::json;

use common::*;
use portaria_backend::models::auth::Role;

#[tokio::test]
async fn health_is_public() {
    let app = TestApp::new();
    let response = app.send(get("/api/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_session_is_unauthorized() {
    let app = TestApp::new();

    let response = app.send(get("/api/packages/pending", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["error"], "UNAUTHORIZED");

    let response = app.send(get("/api/auth/me", Some("garbage"))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn session_cookie_is_accepted() {
    let app = TestApp::new();
    let a = app.tenant("A").await;
    let porter = app.user("Paulo", Role::Porter, &a).await;

    let request = axum::http::Request::builder()
        .uri("/api/auth/me")
        .header("cookie", format!("app_session_id={}", app.token(&porter)))
        .body(axum::body::Body::empty())
        .unwrap();

    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["id"], porter.id.to_string());
}

#[tokio::test]
async fn user_without_condominium_is_forbidden_but_can_see_itself() {
    let app = TestApp::new();
    let loose = app.store.insert_user("Sem vínculo", Role::Manager, None).await;
    let token = app.token(&loose);

    let response = app.send(get("/api/auth/me", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.send(get("/api/reports/dashboard", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(json_body(response).await["error"], "FORBIDDEN");
}

#[tokio::test]
async fn dashboard_is_for_managers_only() {
    let app = TestApp::new();
    let a = app.tenant("A").await;
    let porter = app.user("Paulo", Role::Porter, &a).await;
    let manager = app.user("Marta", Role::Manager, &a).await;

    let response = app.send(get("/api/reports/dashboard", Some(&app.token(&porter)))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app.send(get("/api/reports/dashboard", Some(&app.token(&manager)))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["pendingNow"], 0);
    assert_eq!(body["totalThisMonth"], 0);
    assert_eq!(body["collectedThisMonth"], 0);
}

#[tokio::test]
async fn residents_cannot_register_packages() {
    let app = TestApp::new();
    let a = app.tenant("A").await;
    let jane_user = app.user("Jane", Role::Resident, &a).await;
    let jane = app.resident(&a, "Jane", "101", Some(&jane_user)).await;

    let response = app
        .send(post_json(
            "/api/packages",
            Some(&app.token(&jane_user)),
            json!({ "residentId": jane.id, "unit": "101", "kind": "parcel" }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(app.state.package_service.list_pending(&ctx(&jane_user)).await.unwrap().is_empty());
}

#[tokio::test]
async fn porter_registers_and_hands_over_a_package() {
    let app = TestApp::new();
    let a = app.tenant("A").await;
    let porter = app.user("Paulo", Role::Porter, &a).await;
    let jane = app.resident(&a, "Jane", "101", None).await;
    let token = app.token(&porter);

    let response = app
        .send(post_json(
            "/api/packages",
            Some(&token),
            json!({ "residentId": jane.id, "unit": "101", "kind": "letter", "notes": "Registrada" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = json_body(response).await["id"].as_str().unwrap().to_string();

    let response = app.send(get(&format!("/api/packages/{}", id), Some(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let package = json_body(response).await;
    assert_eq!(package["kind"], "letter");
    assert_eq!(package["status"], "pending");
    assert_eq!(package["unitLabel"], "101");

    let pickup_uri = format!("/api/packages/{}/pickup", id);
    let response = app
        .send(post_json(&pickup_uri, Some(&token), json!({ "collectedByName": "Jane" })))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .send(post_json(&pickup_uri, Some(&token), json!({ "collectedByName": "Jane" })))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "BAD_REQUEST");

    let response = app.send(get(&pickup_uri, Some(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["collectedByName"], "Jane");
}

#[tokio::test]
async fn unknown_package_is_not_found() {
    let app = TestApp::new();
    let a = app.tenant("A").await;
    let porter = app.user("Paulo", Role::Porter, &a).await;

    let uri = format!("/api/packages/{}", unknown_id());
    let response = app.send(get(&uri, Some(&app.token(&porter)))).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["error"], "NOT_FOUND");
}

#[tokio::test]
async fn invalid_resident_payload_reports_field_details() {
    let app = TestApp::new();
    let a = app.tenant("A").await;
    let manager = app.user("Marta", Role::Manager, &a).await;

    let response = app
        .send(post_json(
            "/api/residents",
            Some(&app.token(&manager)),
            json!({ "name": "", "unit": "101", "email": "not-an-email" }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "BAD_REQUEST");
    assert!(body["details"]["name"].is_array());
    assert!(body["details"]["email"].is_array());
}

#[tokio::test]
async fn manager_creates_residents_and_porter_cannot() {
    let app = TestApp::new();
    let a = app.tenant("A").await;
    let manager = app.user("Marta", Role::Manager, &a).await;
    let porter = app.user("Paulo", Role::Porter, &a).await;
    let payload = json!({ "name": "Jane", "unit": "101" });

    let response = app
        .send(post_json("/api/residents", Some(&app.token(&porter)), payload.clone()))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .send(post_json("/api/residents", Some(&app.token(&manager)), payload))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.send(get("/api/residents", Some(&app.token(&porter)))).await;
    let residents = json_body(response).await;
    assert_eq!(residents.as_array().unwrap().len(), 1);
    assert_eq!(residents[0]["unitLabel"], "101");
}

#[tokio::test]
async fn inverted_period_is_a_bad_request() {
    let app = TestApp::new();
    let a = app.tenant("A").await;
    let porter = app.user("Paulo", Role::Porter, &a).await;

    let response = app
        .send(get(
            "/api/packages?start=2025-02-01T00:00:00Z&end=2025-01-01T00:00:00Z",
            Some(&app.token(&porter)),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn notifications_flow_over_http() {
    let app = TestApp::new();
    let a = app.tenant("A").await;
    let porter = app.user("Paulo", Role::Porter, &a).await;
    let jane_user = app.user("Jane", Role::Resident, &a).await;
    let jane = app.resident(&a, "Jane", "101", Some(&jane_user)).await;
    app.register_parcel(&porter, &jane).await;
    let token = app.token(&jane_user);

    let unread = json_body(app.send(get("/api/notifications/unread", Some(&token))).await).await;
    assert_eq!(unread.as_array().unwrap().len(), 1);
    let id = unread[0]["id"].as_str().unwrap().to_string();

    let response = app
        .send(post_json(&format!("/api/notifications/{}/read", id), Some(&token), json!({})))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["success"], true);

    let response = app
        .send(post_json(&format!("/api/notifications/{}/read", unknown_id()), Some(&token), json!({})))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .send(post_json("/api/notifications/read-all", Some(&token), json!({})))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let unread = json_body(app.send(get("/api/notifications/unread", Some(&token))).await).await;
    assert!(unread.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn resident_me_is_null_for_staff() {
    let app = TestApp::new();
    let a = app.tenant("A").await;
    let porter = app.user("Paulo", Role::Porter, &a).await;

    let response = app.send(get("/api/residents/me", Some(&app.token(&porter)))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(json_body(response).await.is_null());
}

#[tokio::test]
async fn tenant_endpoints_follow_the_guard_chain() {
    let app = TestApp::new();
    let a = app.tenant("Residencial A").await;
    let porter = app.user("Paulo", Role::Porter, &a).await;
    let manager = app.user("Marta", Role::Manager, &a).await;

    let tenant = json_body(app.send(get("/api/tenant", Some(&app.token(&porter)))).await).await;
    assert_eq!(tenant["name"], "Residencial A");

    let response = app.send(get("/api/tenant/users", Some(&app.token(&porter)))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app.send(get("/api/tenant/users", Some(&app.token(&manager)))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn logout_expires_the_session_cookie() {
    let app = TestApp::new();

    let response = app.send(post_json("/api/auth/logout", None, json!({}))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response.headers()[SET_COOKIE].to_str().unwrap().to_string();
    assert!(cookie.starts_with("app_session_id="));
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn callback_without_code_is_a_bad_request() {
    let app = TestApp::new();
    let response = app.send(get("/api/oauth/callback", None)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::new();
    let response = app.send(get("/api-docs/openapi.json", None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let doc = json_body(response).await;
    assert!(doc["paths"]["/api/packages/{id}/pickup"].is_object());
}

#[tokio::test]
async fn over_long_unit_is_rejected_before_reaching_storage() {
    let app = TestApp::new();
    let a = app.tenant("A").await;
    let porter = app.user("Paulo", Role::Porter, &a).await;
    let jane = app.resident(&a, "Jane", "101", None).await;

    let response = app
        .send(post_json(
            "/api/packages",
            Some(&app.token(&porter)),
            json!({ "residentId": jane.id, "unit": "1".repeat(21), "kind": "parcel" }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "BAD_REQUEST");
    assert!(body["details"]["unit"].is_array());
    assert!(app.state.package_service.list_pending(&ctx(&porter)).await.unwrap().is_empty());
}

#[tokio::test]
async fn over_long_collector_name_keeps_the_package_pending() {
    let app = TestApp::new();
    let a = app.tenant("A").await;
    let porter = app.user("Paulo", Role::Porter, &a).await;
    let jane = app.resident(&a, "Jane", "101", None).await;
    let package = app.register_parcel(&porter, &jane).await;

    let response = app
        .send(post_json(
            &format!("/api/packages/{}/pickup", package.id),
            Some(&app.token(&porter)),
            json!({ "collectedByName": "J".repeat(256) }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(response).await["details"]["collected_by_name"].is_array());
    assert_eq!(app.store.pickup_count(package.id).await, 0);
}

#[tokio::test]
async fn over_long_resident_fields_are_rejected() {
    let app = TestApp::new();
    let a = app.tenant("A").await;
    let manager = app.user("Marta", Role::Manager, &a).await;

    let response = app
        .send(post_json(
            "/api/residents",
            Some(&app.token(&manager)),
            json!({ "name": "N".repeat(256), "unit": "101", "phone": "9".repeat(21) }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["details"]["name"].is_array());
    assert!(body["details"]["phone"].is_array());
}
