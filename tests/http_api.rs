//! HTTP API tests driven through the router in-process.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use solace_registry::http::{router, AppState};
use solace_registry::registry::AgentRegistry;
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> Router {
    router(AppState {
        registry: Arc::new(AgentRegistry::new()),
    })
}

fn create_body(name: &str) -> Value {
    json!({
        "name": name,
        "description": "an http api test agent",
        "type": "trading",
        "network": "devnet",
        "capabilities": [
            {"name": "swap", "description": "token swaps", "version": "1.0.0"}
        ],
        "configuration": {
            "maxTransactionAmount": 1000.0,
            "dailyTransactionLimit": 10000.0,
            "allowedTokens": ["SOL"],
            "riskThreshold": 50
        }
    })
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(json_body) => Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(json_body.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let app = app();
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_create_agent_returns_201_with_masked_wallet() {
    let app = app();
    let (status, body) = send(&app, "POST", "/api/agents", Some(create_body("bot-1"))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "pending");
    // The stub user's wallet is masked in responses.
    assert_eq!(body["data"]["ownerWallet"], "EPjFWdd5...ZwyTDt1v");
    assert!(body["data"]["id"].as_str().unwrap().starts_with("agent_"));
}

#[tokio::test]
async fn test_create_agent_validation_failure_renders_envelope() {
    let app = app();
    let mut invalid = create_body("x");
    invalid["description"] = json!("too short");

    let (status, body) = send(&app, "POST", "/api/agents", Some(invalid)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["statusCode"], 400);
    assert!(body["error"]["requestId"]
        .as_str()
        .unwrap()
        .starts_with("req_"));
}

#[tokio::test]
async fn test_duplicate_name_returns_409() {
    let app = app();
    send(&app, "POST", "/api/agents", Some(create_body("bot-1"))).await;
    let (status, body) = send(&app, "POST", "/api/agents", Some(create_body("bot-1"))).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT_ERROR");
}

#[tokio::test]
async fn test_get_unknown_agent_returns_404_envelope() {
    let app = app();
    let (status, body) = send(&app, "GET", "/api/agents/agent_missing", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND_ERROR");
    assert_eq!(body["error"]["message"], "Agent not found");
}

#[tokio::test]
async fn test_deploy_then_delete_flow() {
    let app = app();
    let (_, created) = send(&app, "POST", "/api/agents", Some(create_body("bot-1"))).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    // Deploy from pending succeeds.
    let deploy_body = json!({
        "network": "devnet",
        "wallet": "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v"
    });
    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/agents/{id}/deploy"),
        Some(deploy_body.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["success"], true);
    assert!(!body["data"]["contractAddress"].as_str().unwrap().is_empty());

    // A second deploy is a domain-rule violation (422).
    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/agents/{id}/deploy"),
        Some(deploy_body),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "AGENT_ERROR");

    // Deleting while active is rejected the same way.
    let (status, _) = send(&app, "DELETE", &format!("/api/agents/{id}"), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Pause, delete, and the agent is gone.
    let (status, body) = send(&app, "POST", &format!("/api/agents/{id}/pause"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "paused");

    let (status, _) = send(&app, "DELETE", &format!("/api/agents/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &format!("/api/agents/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deploy_rejects_malformed_wallet() {
    let app = app();
    let (_, created) = send(&app, "POST", "/api/agents", Some(create_body("bot-1"))).await;
    let id = created["data"]["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/agents/{id}/deploy"),
        Some(json!({"network": "devnet", "wallet": "bogus"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_update_rejects_status_field() {
    let app = app();
    let (_, created) = send(&app, "POST", "/api/agents", Some(create_body("bot-1"))).await;
    let id = created["data"]["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/agents/{id}"),
        Some(json!({"status": "active"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_update_merges_configuration() {
    let app = app();
    let (_, created) = send(&app, "POST", "/api/agents", Some(create_body("bot-1"))).await;
    let id = created["data"]["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/agents/{id}"),
        Some(json!({"configuration": {"riskThreshold": 80}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["configuration"]["riskThreshold"], 80.0);
    assert_eq!(body["data"]["configuration"]["maxTransactionAmount"], 1000.0);
}

#[tokio::test]
async fn test_private_agents_hidden_from_unscoped_listing_but_in_my() {
    let app = app();
    // The stub user owns this private agent.
    send(&app, "POST", "/api/agents", Some(create_body("private-bot"))).await;

    let (status, body) = send(&app, "GET", "/api/agents", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pagination"]["total"], 0);

    let (status, body) = send(&app, "GET", "/api/agents/my", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pagination"]["total"], 1);
    assert_eq!(body["data"]["agents"][0]["name"], "private-bot");
}

#[tokio::test]
async fn test_list_pagination_shape() {
    let app = app();
    for i in 0..3 {
        let mut body = create_body(&format!("bot-{i}"));
        body["isPublic"] = json!(true);
        send(&app, "POST", "/api/agents", Some(body)).await;
    }

    let (status, body) = send(&app, "GET", "/api/agents?limit=2&offset=0", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["agents"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["pagination"]["total"], 3);
    assert_eq!(body["data"]["pagination"]["hasNext"], true);

    let (_, body) = send(&app, "GET", "/api/agents?limit=2&offset=2", None).await;
    assert_eq!(body["data"]["agents"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["pagination"]["hasNext"], false);
}

#[tokio::test]
async fn test_list_rejects_invalid_filters() {
    let app = app();

    let (status, body) = send(&app, "GET", "/api/agents?limit=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, _) = send(&app, "GET", "/api/agents?type=quant", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/api/agents?minReputation=101", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_statistics_endpoint() {
    let app = app();
    let (_, created) = send(&app, "POST", "/api/agents", Some(create_body("bot-1"))).await;
    let id = created["data"]["id"].as_str().unwrap();

    let (status, body) = send(&app, "GET", &format!("/api/agents/{id}/statistics"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["transactionsCount"], 0);
    assert_eq!(body["data"]["totalEarnings"], 0.0);
}

#[tokio::test]
async fn test_unknown_route_renders_envelope() {
    let app = app();
    let (status, body) = send(&app, "GET", "/api/unknown", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND_ERROR");
}
