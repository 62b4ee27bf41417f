mod common;

use axum::http::StatusCode;
use common::{app_with_users, body_json, delete_auth, login, record, ADMIN_EMAIL, STAFF_EMAIL};

#[tokio::test]
async fn admin_reset_deletes_everything() {
    let (app, store) = app_with_users().await;
    store
        .seed((0..75).map(|i| record(&format!("Debitur {i}"), "LAP001", 1.0)))
        .await;
    let admin = login(&app, ADMIN_EMAIL).await;

    let response = delete_auth(&app, "/api/v1/records", &admin).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["data"]["deleted"], 75);
    assert_eq!(body["data"]["batches"], 2);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn staff_cannot_reset() {
    let (app, store) = app_with_users().await;
    store.seed([record("Budi", "LAP001", 1.0)]).await;
    let staff = login(&app, STAFF_EMAIL).await;

    let response = delete_auth(&app, "/api/v1/records", &staff).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn interrupted_reset_reports_progress() {
    let (app, store) = app_with_users().await;
    store
        .seed((0..60).map(|i| record(&format!("Debitur {i}"), "LAP001", 1.0)))
        .await;
    store.fail_deletes_after(50).await;
    let admin = login(&app, ADMIN_EMAIL).await;

    let response = delete_auth(&app, "/api/v1/records", &admin).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body = body_json(response).await;
    assert_eq!(body["code"], "PURGE_FAILED");
    assert_eq!(body["error"], "Reset stopped after deleting 50 records");
    assert_eq!(store.len().await, 10);
}
