//! REST endpoints for the lead-intake handshake.
//!
//! The browser flow is: fetch a bound token on form load, optionally upload
//! files straight to the gateway, submit metadata here, then poll status
//! here until the scan settles or the client-side deadline passes.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::token::{TokenService, bearer_token};
use crate::error::{ApiError, ApiResult, GatewayError};
use crate::gateway::{GatewayClient, StatusAck, SubmitAck, SubmitPayload};
use crate::net;

/// Shared state for intake routes.
#[derive(Clone)]
pub struct IntakeState {
    pub tokens: Arc<TokenService>,
    /// `None` when `INTAKE_GATEWAY_URL` is unset; submit/status then fail
    /// with a configuration error.
    pub gateway: Option<GatewayClient>,
}

/// Build the intake REST routes.
pub fn intake_routes(state: IntakeState) -> Router {
    Router::new()
        .route("/api/intake/token", get(issue_token))
        .route("/api/intake/submit", post(submit))
        .route("/api/intake/status", get(status))
        .with_state(state)
}

// ── Token issuance ──────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct TokenResponse {
    token: String,
}

/// GET /api/intake/token
///
/// Issues a token bound to the caller's IP + user-agent, valid 10 minutes.
/// Stateless; nothing is stored server-side.
async fn issue_token(
    State(state): State<IntakeState>,
    headers: HeaderMap,
) -> ApiResult<Json<TokenResponse>> {
    let ip = net::client_ip(&headers);
    let user_agent = net::user_agent(&headers);
    let token = state.tokens.issue(&ip, &user_agent)?;
    Ok(Json(TokenResponse { token }))
}

// ── Submission forwarding ───────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SubmitRequest {
    pub token: Option<String>,
    pub name: String,
    pub email: String,
    pub company: String,
    pub domains: Vec<String>,
    pub notes: Option<String>,
    #[serde(rename = "uploadIds")]
    pub upload_ids: Vec<String>,
    pub consent: bool,
    /// Hidden form field; any non-empty value marks the submission as spam.
    pub honeypot: String,
}

/// POST /api/intake/submit
///
/// Verifies the bound token carried in the body, drops honeypot-triggered
/// spam, validates required fields, and forwards to the gateway. A gateway
/// 429 surfaces as the distinct `rate_limited` error shape.
async fn submit(
    State(state): State<IntakeState>,
    headers: HeaderMap,
    Json(body): Json<SubmitRequest>,
) -> ApiResult<Json<SubmitAck>> {
    let token = body
        .token
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Token required".to_string()))?;

    let ip = net::client_ip(&headers);
    let user_agent = net::user_agent(&headers);
    state.tokens.verify(token, &ip, &user_agent)?;

    if !body.honeypot.is_empty() {
        warn!(ip = %ip, "honeypot triggered, dropping submission");
        return Err(ApiError::InvalidInput("Invalid submission".to_string()));
    }

    if body.name.trim().is_empty()
        || body.email.trim().is_empty()
        || body.company.trim().is_empty()
        || body.domains.is_empty()
    {
        return Err(ApiError::InvalidInput("Missing required fields".to_string()));
    }

    let gateway = state.gateway.as_ref().ok_or(GatewayError::NotConfigured)?;
    let payload = SubmitPayload {
        name: body.name,
        email: body.email,
        company: body.company,
        domains: body.domains,
        notes: body.notes.unwrap_or_default(),
        upload_ids: body.upload_ids,
        consent: body.consent,
    };
    let ack = gateway.submit(&payload, token).await?;
    Ok(Json(ack))
}

// ── Status polling ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct StatusQuery {
    demo_request_id: Option<String>,
}

/// GET /api/intake/status?demo_request_id=…
///
/// Requires the same bound token as the submit call, as a bearer header.
async fn status(
    State(state): State<IntakeState>,
    headers: HeaderMap,
    Query(query): Query<StatusQuery>,
) -> ApiResult<Json<StatusAck>> {
    let token = bearer_token(&headers)
        .map_err(|_| ApiError::Unauthorized("Token required".to_string()))?;

    let ip = net::client_ip(&headers);
    let user_agent = net::user_agent(&headers);
    state.tokens.verify(token, &ip, &user_agent)?;

    let demo_request_id = query
        .demo_request_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::InvalidInput("demo_request_id required".to_string()))?;

    let gateway = state.gateway.as_ref().ok_or(GatewayError::NotConfigured)?;
    let ack = gateway.status(demo_request_id, token).await?;
    Ok(Json(ack))
}
