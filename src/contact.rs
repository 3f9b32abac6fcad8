//! Contact form endpoint.
//!
//! Required-field validation and an acknowledgment; submissions are read off
//! the request logs, nothing is forwarded.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;

/// Build the contact route.
pub fn contact_routes() -> Router {
    Router::new().route("/api/contact", post(contact))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub company: String,
    pub message: String,
}

/// POST /api/contact
async fn contact(Json(body): Json<ContactRequest>) -> impl IntoResponse {
    if body.name.trim().is_empty()
        || body.email.trim().is_empty()
        || body.company.trim().is_empty()
        || body.message.trim().is_empty()
    {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "message": "Missing required fields" })),
        )
            .into_response();
    }

    info!(company = %body.company.trim(), "contact form submission");
    Json(serde_json::json!({ "ok": true })).into_response()
}
