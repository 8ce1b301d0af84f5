use asb_api::{create_router, DbState};
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn app() -> Router {
    let state = DbState::in_memory().await.unwrap();
    create_router(state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/api/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "ok");
}

#[tokio::test]
async fn test_health_reports_closed_database() {
    let state = DbState::in_memory().await.unwrap();
    state.pool.close().await;
    let app = create_router(state);

    let (status, body) = send(&app, Method::GET, "/api/health", None).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["database"], "unavailable");
}

#[tokio::test]
async fn test_invalid_endpoint() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/api/nonexistent", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert!(body["error"]["message"].is_string());
    let request_id = body["request_id"].as_str().unwrap();
    assert_eq!(request_id.len(), 36);
    assert_eq!(body.as_object().unwrap().len(), 3);
}

#[tokio::test]
async fn test_status_table() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/api/statuses", None).await;

    assert_eq!(status, StatusCode::OK);
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 13);
    assert_eq!(rows[0]["code"], 1);
    assert_eq!(rows[6]["label"], "Tidak Memenuhi Syarat");
}

#[tokio::test]
async fn test_status_lookup_fails_closed() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/api/statuses/8", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["label"], "Memenuhi Syarat");

    let (status, body) = send(&app, Method::GET, "/api/statuses/99", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["label"], "Unknown");
    assert_eq!(body["data"]["actors"], json!([]));
}

#[tokio::test]
async fn test_evaluate_for_verifier() {
    let app = app().await;
    let proposal = json!({
        "id": 41,
        "idAsbStatus": 8,
        "idVerifikatorAdpem": 3,
        "idVerifikatorBappeda": null,
        "idVerifikatorBpkad": null
    });

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/proposals/evaluate?role=BAPPEDA",
        Some(proposal.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["outcome"], "Proses");
    assert_eq!(body["data"]["actions"], json!(["approve", "reject"]));

    // ADPEM already signed
    let (_, body) = send(
        &app,
        Method::POST,
        "/api/proposals/evaluate?role=ADPEM",
        Some(proposal.clone()),
    )
    .await;
    assert_eq!(body["data"]["actions"], json!([]));

    let (_, body) = send(&app, Method::POST, "/api/proposals/evaluate", Some(proposal)).await;
    assert_eq!(body["data"]["role"], Value::Null);
    assert_eq!(body["data"]["actions"], json!([]));
}

#[tokio::test]
async fn test_evaluate_rejects_bad_input() {
    let app = app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/proposals/evaluate?role=CAMAT",
        Some(json!({ "idAsbStatus": 8 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/proposals/evaluate",
        Some(json!({ "namaAsb": "no status" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

fn dashboard() -> Value {
    json!([
        { "id": 1, "idAsbStatus": 8, "idVerifikatorAdpem": 1, "idVerifikatorBappeda": 2, "idVerifikatorBpkad": 3 },
        { "id": 2, "idAsbStatus": 8, "idVerifikatorAdpem": 1 },
        { "id": 3, "idAsbStatus": 7, "rejectReason": "Dokumen tidak lengkap" },
        { "id": 4, "asbStatus": { "id": 2 } }
    ])
}

#[tokio::test]
async fn test_summary() {
    let app = app().await;
    let (status, body) = send(&app, Method::POST, "/api/proposals/summary", Some(dashboard())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 4);
    assert_eq!(body["data"]["sukses"], 1);
    assert_eq!(body["data"]["proses"], 2);
    assert_eq!(body["data"]["tolak"], 1);
    assert_eq!(body["data"]["perStatus"]["8"], 2);
}

#[tokio::test]
async fn test_filter_by_outcome() {
    let app = app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/proposals/filter?outcome=tolak",
        Some(dashboard()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let views = body["data"].as_array().unwrap();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0]["id"], 3);
    assert_eq!(views[0]["rejectReason"], "Dokumen tidak lengkap");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/proposals/filter?outcome=maybe",
        Some(dashboard()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_draft_wizard_flow() {
    let app = app().await;

    let (status, body) = send(&app, Method::POST, "/api/drafts", Some(json!({ "opdId": 7 }))).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_str().unwrap().to_string();
    assert!(id.starts_with("draft-"));
    assert_eq!(body["data"]["statusCode"], 1);

    // skipping ahead is refused
    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/drafts/{}/steps/account-setup", id),
        Some(json!({ "rekening": "5.2.3" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "STEP_OUT_OF_ORDER");

    // submitting early is refused
    let (status, body) = send(&app, Method::POST, &format!("/api/drafts/{}/submit", id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "DRAFT_INCOMPLETE");

    for code in 1..=5 {
        let (status, _) = send(
            &app,
            Method::PUT,
            &format!("/api/drafts/{}/steps/{}", id, code),
            Some(json!({ "step": code })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(&app, Method::POST, &format!("/api/drafts/{}/submit", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["statusCode"], 6);
    assert_eq!(body["data"]["statusLabel"], "Proses Verifikasi");
    assert_eq!(body["data"]["progressPercent"], 100);

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/drafts/{}/steps/1", id),
        Some(json!({ "step": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_draft_validation() {
    let app = app().await;

    let (status, _) = send(&app, Method::POST, "/api/drafts", Some(json!({ "opdId": 0 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(&app, Method::POST, "/api/drafts", Some(json!({ "opdId": 2 }))).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/drafts/{}/steps/landscaping", id),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "UNKNOWN_STEP");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/drafts/{}/steps/general-documents", id),
        Some(json!(["not", "an", "object"])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_PAYLOAD");
}

#[tokio::test]
async fn test_draft_list_and_delete() {
    let app = app().await;

    for opd in [1, 1, 2] {
        send(&app, Method::POST, "/api/drafts", Some(json!({ "opdId": opd }))).await;
    }

    let (status, body) = send(&app, Method::GET, "/api/drafts?opdId=1&limit=1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["pagination"]["totalItems"], 2);

    let id = body["data"]["data"][0]["id"].as_str().unwrap().to_string();
    let (status, _) = send(&app, Method::DELETE, &format!("/api/drafts/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, &format!("/api/drafts/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "DRAFT_NOT_FOUND");

    let (_, body) = send(&app, Method::GET, "/api/drafts", None).await;
    assert_eq!(body["data"]["pagination"]["totalItems"], 2);
}

#[tokio::test]
async fn test_draft_list_with_huge_page_is_empty() {
    let app = app().await;
    send(&app, Method::POST, "/api/drafts", Some(json!({ "opdId": 1 }))).await;

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/drafts?page={}&limit=100", i64::MAX),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["data"], json!([]));
    assert_eq!(body["data"]["pagination"]["totalItems"], 1);
}
