#![allow(dead_code)]
use axum::{extract::Path, http::StatusCode, routing::{get, post, put}, Json, Router};
use serde_json::{json, Value};

/// Runs `app` on its own thread and returns the base URL.
pub fn spawn(app: Router) -> String {
    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        rt.block_on(async move {
            let listener = tokio::net::TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await.unwrap();
            tx.send(listener.local_addr().unwrap()).unwrap();
            axum::serve(listener, app).await.unwrap();
        });
    });
    format!("http://{}", rx.recv().unwrap())
}

pub fn requests() -> Value {
    json!([
        {"id": 1, "title": "Promote churn v2", "description": "Retrained on Q3 data", "model_name": "churn", "model_version": "2",
         "target_stage": "production", "current_stage": "staging", "author_username": "ana", "status": "open",
         "created_at_epoch": 1620000000},
        {"id": 2, "title": "Promote churn v1", "model_name": "churn", "model_version": "1",
         "target_stage": "staging", "current_stage": "none", "author_username": "ana", "reviewer_username": "rui",
         "review_comment": "lgtm", "status": "approved", "created_at_epoch": 1610000000, "closed_at_epoch": 1610003600},
        {"id": 3, "title": "Promote fraud v7", "model_name": "fraud", "model_version": "7",
         "target_stage": "production", "current_stage": "staging", "author_username": "li", "reviewer_username": "rui",
         "review_comment": "", "status": "closed", "created_at_epoch": 1615000000, "closed_at_epoch": 1615003600}
    ])
}

pub fn details(id: i64) -> Value {
    json!({
        "promote_request_id": id,
        "challenger_version_details": {"id": "2", "stage": "staging", "tags": {},
            "metrics": {"auc": 0.91, "rmse": 0.42}, "parameters": {"depth": 6, "lr": "0.1"}},
        "champion_version_details": {"id": "1", "stage": "production", "tags": {"owner": "ml"},
            "metrics": {"auc": 0.88, "f1": 0.7}, "parameters": {"depth": 4, "lr": 0.1}}
    })
}

/// A registry that accepts every write; creates come back as #42.
pub fn registry() -> Router {
    Router::new()
        .route("/checkpoint/api/models", get(|| async { Json(json!([{"name": "churn"}, {"name": "fraud"}])) }))
        .route("/checkpoint/api/models/:model/versions", get(|Path(model): Path<String>| async move {
            Json(json!([{"model_name": model, "id": "1"}, {"model_name": model, "id": "2"}]))
        }))
        .route("/checkpoint/api/stages", get(|| async { Json(json!(["none", "archived", "staging", "production"])) }))
        .route("/checkpoint/api/requests", get(|| async { Json(requests()) }).post(|Json(body): Json<Value>| async move {
            let mut created = requests()[0].clone();
            created["id"] = json!(42);
            created["title"] = body["title"].clone();
            (StatusCode::CREATED, Json(created))
        }))
        .route("/checkpoint/api/requests/:id/details", get(|Path(id): Path<i64>| async move { Json(details(id)) }))
        .route("/checkpoint/api/requests/:id", put(|| async { Json(json!({})) }))
        .route("/oauth2/userinfo", get(|| async { Json(json!({"user": "ana", "email": "ana@example.com"})) }))
}

/// Same reads, but every write is rejected with a 400.
pub fn rejecting_registry() -> Router {
    Router::new()
        .route("/checkpoint/api/models", get(|| async { Json(json!([{"name": "m"}])) }))
        .route("/checkpoint/api/models/:model/versions", get(|| async { Json(json!([{"model_name": "m", "id": "1"}])) }))
        .route("/checkpoint/api/stages", get(|| async { Json(json!(["staging", "production"])) }))
        .route("/checkpoint/api/requests", get(|| async { Json(requests()) }).post(|| async { (StatusCode::BAD_REQUEST, "Invalid body") }))
        .route("/checkpoint/api/requests/:id", put(|| async { (StatusCode::BAD_REQUEST, "Status value 'merged' is invalid") }))
        .route("/oauth2/userinfo", get(|| async { StatusCode::UNAUTHORIZED }))
}
