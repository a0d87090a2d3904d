use std::path::PathBuf;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

use asset_recommender::api::{create_router, AppState};
use asset_recommender::config::Config;

/// Medium-tier cold-start list derived from data/assets.json (stocks and funds, catalog order)
const MEDIUM_TIER: [&str; 5] = [
    "GRS003003035",
    "GRF000153004",
    "GRS015003007",
    "GRS419003009",
    "GRF000148004",
];

fn data_path(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join(file)
}

fn test_config() -> Config {
    Config {
        model_path: Some(data_path("model.json")),
        catalog_path: Some(data_path("assets.json")),
        ..Config::default()
    }
}

fn create_server(config: Config) -> TestServer {
    let state = AppState::from_config(&config).unwrap();
    let app = create_router(state);
    TestServer::new(app).unwrap()
}

fn create_test_server() -> TestServer {
    create_server(test_config())
}

fn asset_ids(body: &Value) -> Vec<String> {
    body["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["asset_id"].as_str().unwrap().to_string())
        .collect()
}

fn scores(body: &Value) -> Vec<f64> {
    body["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["score"].as_f64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["model_loaded"], true);
}

#[tokio::test]
async fn test_ready_with_model() {
    let server = create_test_server();
    server.get("/ready").await.assert_status_ok();
}

#[tokio::test]
async fn test_known_user_gets_model_recommendations() {
    let server = create_test_server();

    let response = server
        .post("/recommend")
        .json(&json!({
            "user_id": "u1001",
            "risk_tolerance": "low",
            "top_k": 4
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["source"], "model");
    assert_eq!(body["user_id"], "u1001");
    assert_eq!(asset_ids(&body).len(), 4);

    let scores = scores(&body);
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));

    for rec in body["recommendations"].as_array().unwrap() {
        assert_eq!(rec["rationale"], "model");
    }
}

#[tokio::test]
async fn test_model_scores_whole_catalog() {
    let server = create_test_server();

    for user_id in ["u1001", "u2049", "u3302"] {
        let body: Value = server
            .post("/recommend")
            .json(&json!({ "user_id": user_id, "top_k": 12 }))
            .await
            .json();
        assert_eq!(body["source"], "model");
        assert_eq!(asset_ids(&body).len(), 12);
    }

    // Assets without trained factors score mu + b_u = 2.87 - 0.12 for u2049,
    // ahead of modelled assets the user is predicted to like less.
    let body: Value = server
        .post("/recommend")
        .json(&json!({ "user_id": "u2049", "top_k": 12 }))
        .await
        .json();
    let ranked: Vec<(String, f64)> = asset_ids(&body).into_iter().zip(scores(&body)).collect();
    let position = |id: &str| ranked.iter().position(|(a, _)| a == id).unwrap();

    let (_, unmodelled) = &ranked[position("GRS260333000")];
    assert!((unmodelled - 2.75).abs() < 1e-9);
    assert!(position("GRS260333000") < position("GRS015003007"));
    assert!(position("GRS260333000") < position("GRS003003035"));
}

#[tokio::test]
async fn test_unknown_user_medium_matches_rule_table() {
    let server = create_test_server();

    let response = server
        .post("/recommend")
        .json(&json!({
            "user_id": "grace@demo.com",
            "risk_tolerance": "medium"
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["source"], "cold_start");
    assert_eq!(asset_ids(&body), MEDIUM_TIER);
    assert_eq!(scores(&body), vec![1.0, 0.8, 0.6, 0.4, 0.2]);

    for rec in body["recommendations"].as_array().unwrap() {
        assert_eq!(rec["rationale"], "rule");
    }
}

#[tokio::test]
async fn test_cold_start_tiers_follow_categories() {
    let server = create_test_server();

    let low: Value = server
        .get("/recommend")
        .add_query_param("user_id", "new-user")
        .add_query_param("risk_tolerance", "low")
        .add_query_param("top_k", 10)
        .await
        .json();
    assert_eq!(
        asset_ids(&low),
        vec![
            "GR0114028534",
            "GR0124034688",
            "GR0128014803",
            "GR0133011248",
            "GR0138014809"
        ]
    );

    let high: Value = server
        .get("/recommend")
        .add_query_param("user_id", "new-user")
        .add_query_param("risk_tolerance", "high")
        .add_query_param("top_k", 2)
        .await
        .json();
    assert_eq!(asset_ids(&high), vec!["GRS003003035", "GRS015003007"]);
}

#[tokio::test]
async fn test_get_and_post_agree() {
    let server = create_test_server();

    let via_get: Value = server
        .get("/recommend")
        .add_query_param("user_id", "u2049")
        .add_query_param("risk_tolerance", "high")
        .await
        .json();

    let via_post: Value = server
        .post("/recommend")
        .json(&json!({ "user_id": "u2049", "risk_tolerance": "high" }))
        .await
        .json();

    assert_eq!(via_get, via_post);
    assert_eq!(via_get["source"], "model");
}

#[tokio::test]
async fn test_risk_profile_alias_and_default() {
    let server = create_test_server();

    let aliased: Value = server
        .post("/recommend")
        .json(&json!({ "user_id": "new-user", "risk_profile": "Balanced" }))
        .await
        .json();
    assert_eq!(asset_ids(&aliased), MEDIUM_TIER);

    let defaulted: Value = server
        .post("/recommend")
        .json(&json!({ "user_id": "new-user" }))
        .await
        .json();
    assert_eq!(asset_ids(&defaulted), MEDIUM_TIER);
}

#[tokio::test]
async fn test_invalid_risk_tolerance() {
    let server = create_test_server();

    let response = server
        .post("/recommend")
        .json(&json!({ "user_id": "u1001", "risk_tolerance": "extreme" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body, json!({ "error": "invalid_risk_tolerance" }));
}

#[tokio::test]
async fn test_missing_user_id() {
    let server = create_test_server();

    let response = server
        .post("/recommend")
        .json(&json!({ "user_id": "   ", "risk_tolerance": "low" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>(), json!({ "error": "missing_user_id" }));

    let response = server
        .get("/recommend")
        .add_query_param("risk_tolerance", "low")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>(), json!({ "error": "missing_user_id" }));
}

#[tokio::test]
async fn test_invalid_top_k() {
    let server = create_test_server();

    let response = server
        .post("/recommend")
        .json(&json!({ "user_id": "u1001", "top_k": 500 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>(), json!({ "error": "invalid_top_k" }));

    let response = server
        .post("/recommend")
        .json(&json!({ "user_id": "u1001", "top_k": -1 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>(), json!({ "error": "invalid_top_k" }));

    let response = server
        .get("/recommend")
        .add_query_param("user_id", "u1001")
        .add_query_param("top_k", "abc")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>(), json!({ "error": "invalid_top_k" }));
}

#[tokio::test]
async fn test_mistyped_risk_tolerance_is_invalid_risk_tolerance() {
    let server = create_test_server();

    let response = server
        .post("/recommend")
        .json(&json!({ "user_id": "u1", "risk_tolerance": 5 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "invalid_risk_tolerance" })
    );
}

#[tokio::test]
async fn test_unreadable_body_is_json_error() {
    let server = create_test_server();

    let response = server
        .post("/recommend")
        .text(r#"{"user_id": "u1001"}"#)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>(), json!({ "error": "invalid_request" }));
}

#[tokio::test]
async fn test_recommend_is_idempotent() {
    let server = create_test_server();
    let request = json!({ "user_id": "u3302", "risk_tolerance": "low", "top_k": 6 });

    let first: Value = server.post("/recommend").json(&request).await.json();
    let second: Value = server.post("/recommend").json(&request).await.json();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_degraded_mode_without_model() {
    let server = create_server(Config {
        model_path: Some(data_path("missing-model.json")),
        ..test_config()
    });

    let health: Value = server.get("/health").await.json();
    assert_eq!(health["model_loaded"], false);

    let response = server.get("/ready").await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.json::<Value>(), json!({ "error": "model_unavailable" }));

    let body: Value = server
        .post("/recommend")
        .json(&json!({ "user_id": "u1001", "risk_tolerance": "medium" }))
        .await
        .json();
    assert_eq!(body["source"], "cold_start");
    assert_eq!(asset_ids(&body), MEDIUM_TIER);
}

#[tokio::test]
async fn test_builtin_rules_without_catalog() {
    let server = create_server(Config::default());

    let body: Value = server
        .post("/recommend")
        .json(&json!({ "user_id": "anyone", "risk_tolerance": "low" }))
        .await
        .json();
    assert_eq!(body["source"], "cold_start");
    assert_eq!(asset_ids(&body).len(), 5);

    let assets: Vec<Value> = server.get("/assets").await.json();
    assert!(assets.is_empty());
}

#[tokio::test]
async fn test_list_assets() {
    let server = create_test_server();
    let response = server.get("/assets").await;
    response.assert_status_ok();
    let assets: Vec<Value> = response.json();
    assert_eq!(assets.len(), 12);
    assert_eq!(assets[0]["asset_id"], "GRS003003035");
    assert_eq!(assets[0]["category"], "Stock");
}

#[tokio::test]
async fn test_request_id_header() {
    let server = create_test_server();

    let response = server.get("/health").await;
    let generated = response.header("x-request-id");
    assert!(uuid::Uuid::parse_str(generated.to_str().unwrap()).is_ok());

    let supplied = "3f1c5d2e-8a7b-4c6d-9e0f-1a2b3c4d5e6f";
    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static(supplied),
        )
        .await;
    assert_eq!(response.header("x-request-id"), supplied);
}
