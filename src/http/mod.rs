//! HTTP surface over the registry.
//!
//! Thin request parsing and response shaping: every success is
//! `{"success": true, "data": ...}` and every failure renders the uniform
//! error envelope with the request id. Authentication is a stub — a fixed
//! mock user is attached to every request until real token verification
//! replaces it.

use crate::agent::model::{Agent, CreateAgentInput, DeploymentConfig, UpdateAgentInput};
use crate::agent::query::{AgentFilters, AgentPage, MAX_LIMIT, MAX_SEARCH_LEN};
use crate::agent::validation;
use crate::error::RegistryError;
use crate::error_context;
use crate::ids;
use crate::registry::AgentRegistry;
use axum::extract::{Path, Query, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<AgentRegistry>,
}

/// Identity attached by the auth stub.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub wallet: String,
}

impl AuthUser {
    fn mock() -> Self {
        Self {
            id: "user_123".to_string(),
            wallet: "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// A registry error bound to its request, rendered as the error envelope.
pub struct ApiError {
    error: RegistryError,
    request_id: String,
}

impl ApiError {
    fn new(error: RegistryError, request_id: &RequestId) -> Self {
        Self {
            error,
            request_id: request_id.0.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        warn!(
            request_id = %self.request_id,
            error_code = self.error.code(),
            status_code = self.error.status_code(),
            error = %self.error,
            "request failed"
        );

        let status = StatusCode::from_u16(self.error.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = Json(self.error.envelope(Some(&self.request_id)));
        (status, body).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/agents", post(create_agent).get(list_agents))
        .route("/api/agents/my", get(my_agents))
        .route(
            "/api/agents/:id",
            get(get_agent).put(update_agent).delete(delete_agent),
        )
        .route("/api/agents/:id/deploy", post(deploy_agent))
        .route("/api/agents/:id/pause", post(pause_agent))
        .route("/api/agents/:id/resume", post(resume_agent))
        .route("/api/agents/:id/statistics", get(agent_statistics))
        .fallback(unknown_route)
        .layer(middleware::from_fn(auth_stub))
        .layer(middleware::from_fn(request_context))
        .with_state(state)
}

/// Attach a generated request id and log the request outcome.
async fn request_context(mut req: Request, next: Next) -> Response {
    let request_id = RequestId(ids::request_id());
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    req.extensions_mut().insert(request_id.clone());
    let response = next.run(req).await;

    info!(
        request_id = %request_id.0,
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        "request handled"
    );
    response
}

/// Mock authentication: a fixed user on every request.
async fn auth_stub(mut req: Request, next: Next) -> Response {
    req.extensions_mut().insert(AuthUser::mock());
    next.run(req).await
}

async fn health() -> impl IntoResponse {
    Json(json!({"success": true, "data": {"status": "ok"}}))
}

async fn unknown_route(Extension(rid): Extension<RequestId>, req: Request) -> ApiError {
    ApiError::new(
        RegistryError::not_found(format!("Route {} {}", req.method(), req.uri().path())),
        &rid,
    )
}

async fn create_agent(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Extension(rid): Extension<RequestId>,
    Json(body): Json<Value>,
) -> Result<Response, ApiError> {
    let input: CreateAgentInput = parse_body(body).map_err(|e| ApiError::new(e, &rid))?;

    let agent = state
        .registry
        .create(input, &user.id, &user.wallet)
        .await
        .map_err(|e| ApiError::new(e, &rid))?;

    Ok((StatusCode::CREATED, success(agent_view(&agent))).into_response())
}

async fn list_agents(
    State(state): State<AppState>,
    Extension(rid): Extension<RequestId>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let filters = parse_filters(&params).map_err(|e| ApiError::new(e, &rid))?;
    let page = state
        .registry
        .list(&filters)
        .await
        .map_err(|e| ApiError::new(e, &rid))?;

    Ok(success(page_view(&filters, &page)).into_response())
}

async fn my_agents(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Extension(rid): Extension<RequestId>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let filters = parse_filters(&params)
        .map(|f| f.for_owner(&user.id))
        .map_err(|e| ApiError::new(e, &rid))?;
    let page = state
        .registry
        .list(&filters)
        .await
        .map_err(|e| ApiError::new(e, &rid))?;

    Ok(success(page_view(&filters, &page)).into_response())
}

async fn get_agent(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Extension(rid): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let agent = state
        .registry
        .get(&id, Some(&user.id))
        .await
        .map_err(|e| ApiError::new(e, &rid))?;

    Ok(success(agent_view(&agent)).into_response())
}

async fn update_agent(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Extension(rid): Extension<RequestId>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Response, ApiError> {
    let input: UpdateAgentInput = parse_body(body).map_err(|e| ApiError::new(e, &rid))?;

    let agent = state
        .registry
        .update(&id, input, &user.id)
        .await
        .map_err(|e| ApiError::new(e, &rid))?;

    Ok(success(agent_view(&agent)).into_response())
}

async fn delete_agent(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Extension(rid): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    state
        .registry
        .delete(&id, &user.id)
        .await
        .map_err(|e| ApiError::new(e, &rid))?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

async fn deploy_agent(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Extension(rid): Extension<RequestId>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Response, ApiError> {
    let config: DeploymentConfig = parse_body(body).map_err(|e| ApiError::new(e, &rid))?;
    validate_deployment(&config).map_err(|e| ApiError::new(e, &rid))?;

    let result = state
        .registry
        .deploy(&id, config, &user.id)
        .await
        .map_err(|e| ApiError::new(e, &rid))?;

    Ok(success(serde_json::to_value(&result).unwrap_or_default()).into_response())
}

async fn pause_agent(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Extension(rid): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let agent = state
        .registry
        .pause(&id, &user.id)
        .await
        .map_err(|e| ApiError::new(e, &rid))?;

    Ok(success(agent_view(&agent)).into_response())
}

async fn resume_agent(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Extension(rid): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let agent = state
        .registry
        .resume(&id, &user.id)
        .await
        .map_err(|e| ApiError::new(e, &rid))?;

    Ok(success(agent_view(&agent)).into_response())
}

async fn agent_statistics(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Extension(rid): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let statistics = state
        .registry
        .statistics(&id, Some(&user.id))
        .await
        .map_err(|e| ApiError::new(e, &rid))?;

    Ok(success(serde_json::to_value(&statistics).unwrap_or_default()).into_response())
}

fn success(data: Value) -> Json<Value> {
    Json(json!({"success": true, "data": data}))
}

/// Deserialize a JSON body into its typed input, reporting schema problems
/// as validation errors in the envelope.
fn parse_body<T: serde::de::DeserializeOwned>(body: Value) -> Result<T, RegistryError> {
    serde_json::from_value(body).map_err(|e| RegistryError::validation(e.to_string()))
}

/// Edge checks the body schema cannot express.
fn validate_deployment(config: &DeploymentConfig) -> Result<(), RegistryError> {
    if !validation::validate_wallet_address(&config.wallet) {
        return Err(RegistryError::validation("Invalid wallet address"));
    }
    if let Some(program_id) = &config.program_id {
        if !validation::validate_wallet_address(program_id) {
            return Err(RegistryError::validation("Invalid program id"));
        }
    }
    if config.initial_funding.is_some_and(|v| v <= 0.0) {
        return Err(RegistryError::validation("Initial funding must be positive"));
    }
    if config.compute_units.is_some_and(|v| v == 0) {
        return Err(RegistryError::validation("Compute units must be positive"));
    }
    if config.priority_fee.is_some_and(|v| v <= 0.0) {
        return Err(RegistryError::validation("Priority fee must be positive"));
    }
    Ok(())
}

/// Agents leave the API with the owner wallet masked.
fn agent_view(agent: &Agent) -> Value {
    let mut value = serde_json::to_value(agent).unwrap_or_default();
    if let Some(wallet) = value.get_mut("ownerWallet") {
        *wallet = Value::String(mask_wallet(&agent.owner_wallet));
    }
    value
}

fn mask_wallet(wallet: &str) -> String {
    if wallet.len() <= 16 {
        return wallet.to_string();
    }
    format!("{}...{}", &wallet[..8], &wallet[wallet.len() - 8..])
}

fn page_view(filters: &AgentFilters, page: &AgentPage) -> Value {
    let limit = filters.limit();
    let offset = filters.offset();
    json!({
        "agents": page.agents.iter().map(agent_view).collect::<Vec<_>>(),
        "pagination": {
            "total": page.total,
            "limit": limit,
            "offset": offset,
            "hasNext": offset + limit < page.total,
        },
    })
}

/// Query-string filters. Multi-value fields take comma-separated values
/// (`type=trading,oracle`).
fn parse_filters(params: &HashMap<String, String>) -> Result<AgentFilters, RegistryError> {
    let mut filters = AgentFilters::default();

    if let Some(raw) = params.get("type") {
        filters.agent_type = Some(parse_list(raw)?);
    }
    if let Some(raw) = params.get("status") {
        filters.status = Some(parse_list(raw)?);
    }
    if let Some(raw) = params.get("network") {
        filters.network = Some(parse_list(raw)?);
    }
    if let Some(owner_id) = params.get("ownerId") {
        filters.owner_id = Some(owner_id.clone());
    }
    if let Some(raw) = params.get("isPublic") {
        filters.is_public = Some(raw.parse::<bool>().map_err(|_| {
            RegistryError::validation(format!("isPublic must be true or false, got: {raw}"))
        })?);
    }
    if let Some(raw) = params.get("tags") {
        filters.tags = Some(raw.split(',').map(|t| t.trim().to_string()).collect());
    }
    if let Some(raw) = params.get("minReputation") {
        let min = raw
            .parse::<f64>()
            .map_err(|_| RegistryError::validation(format!("invalid minReputation: {raw}")))?;
        if !(0.0..=100.0).contains(&min) {
            return Err(RegistryError::validation(
                "minReputation must be between 0 and 100",
            ));
        }
        filters.min_reputation = Some(min);
    }
    if let Some(search) = params.get("search") {
        if search.chars().count() > MAX_SEARCH_LEN {
            return Err(RegistryError::validation(format!(
                "search term too long (max {MAX_SEARCH_LEN} chars)"
            )));
        }
        filters.search = Some(search.clone());
    }
    if let Some(raw) = params.get("sortBy") {
        filters.sort_by = Some(raw.parse()?);
    }
    if let Some(raw) = params.get("sortOrder") {
        filters.sort_order = Some(raw.parse()?);
    }
    if let Some(raw) = params.get("limit") {
        let limit = raw
            .parse::<usize>()
            .map_err(|_| RegistryError::validation(format!("invalid limit: {raw}")))?;
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(RegistryError::validation(format!(
                "limit must be between 1 and {MAX_LIMIT}"
            ))
            .with_context(error_context! { "limit" => limit }));
        }
        filters.limit = Some(limit);
    }
    if let Some(raw) = params.get("offset") {
        filters.offset = Some(
            raw.parse::<usize>()
                .map_err(|_| RegistryError::validation(format!("invalid offset: {raw}")))?,
        );
    }

    Ok(filters)
}

fn parse_list<T: std::str::FromStr<Err = RegistryError>>(
    raw: &str,
) -> Result<Vec<T>, RegistryError> {
    raw.split(',').map(|item| item.trim().parse()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_wallet() {
        assert_eq!(
            mask_wallet("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v"),
            "EPjFWdd5...ZwyTDt1v"
        );
        assert_eq!(mask_wallet("short"), "short");
    }

    #[test]
    fn test_parse_filters_multi_value() {
        let mut params = HashMap::new();
        params.insert("type".to_string(), "trading,oracle".to_string());
        params.insert("status".to_string(), "active".to_string());

        let filters = parse_filters(&params).unwrap();
        assert_eq!(filters.agent_type.as_ref().unwrap().len(), 2);
        assert_eq!(filters.status.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn test_parse_filters_rejects_unknown_enum_value() {
        let mut params = HashMap::new();
        params.insert("type".to_string(), "quant".to_string());
        assert!(parse_filters(&params).is_err());
    }

    #[test]
    fn test_parse_filters_limit_bounds() {
        let mut params = HashMap::new();
        params.insert("limit".to_string(), "0".to_string());
        assert!(parse_filters(&params).is_err());

        params.insert("limit".to_string(), "101".to_string());
        assert!(parse_filters(&params).is_err());

        params.insert("limit".to_string(), "100".to_string());
        assert_eq!(parse_filters(&params).unwrap().limit, Some(100));
    }

    #[test]
    fn test_parse_filters_min_reputation_range() {
        let mut params = HashMap::new();
        params.insert("minReputation".to_string(), "101".to_string());
        assert!(parse_filters(&params).is_err());

        params.insert("minReputation".to_string(), "70".to_string());
        assert_eq!(parse_filters(&params).unwrap().min_reputation, Some(70.0));
    }

    #[test]
    fn test_validate_deployment_wallet() {
        let config = DeploymentConfig {
            network: crate::agent::model::Network::Devnet,
            wallet: "not-a-wallet".to_string(),
            program_id: None,
            initial_funding: None,
            compute_units: None,
            priority_fee: None,
        };
        assert!(validate_deployment(&config).is_err());
    }
}
