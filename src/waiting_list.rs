//! Waiting-list sign-up endpoint.
//!
//! Validates the sign-up, then sends two emails through the transactional
//! provider: a confirmation to the submitter and a notification to the
//! internal address. Nothing is persisted here; the admin notification is
//! the durable record.

use std::sync::Arc;
use std::sync::LazyLock;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use regex::Regex;
use serde::Deserialize;
use tracing::error;

use crate::email::{Mailer, OutboundEmail};

/// Same permissive shape check the sign-up form applies client-side.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid")
});

/// Mailer plus addressing, present only when email is configured.
#[derive(Clone)]
pub struct MailerHandle {
    pub mailer: Arc<dyn Mailer>,
    pub from_address: String,
    pub admin_address: String,
}

/// Shared state for the waiting-list route.
#[derive(Clone, Default)]
pub struct WaitingListState {
    pub mail: Option<MailerHandle>,
}

/// Build the waiting-list route.
pub fn waiting_list_routes(state: WaitingListState) -> Router {
    Router::new()
        .route("/api/waiting-list", post(join_waiting_list))
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WaitingListRequest {
    pub name: String,
    pub email: String,
    pub company: String,
    #[serde(rename = "companySize")]
    pub company_size: String,
}

fn reject(message: &str) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "message": message })),
    )
        .into_response()
}

/// POST /api/waiting-list
///
/// All validation happens before any send attempt. Both sends run
/// concurrently; the submitter's confirmation failing outranks the admin
/// notification failing.
async fn join_waiting_list(
    State(state): State<WaitingListState>,
    Json(body): Json<WaitingListRequest>,
) -> impl IntoResponse {
    if body.name.trim().len() < 2 {
        return reject("Name is required (min 2 characters)");
    }
    if !EMAIL_RE.is_match(body.email.trim()) {
        return reject("Valid email is required");
    }
    if body.company.trim().len() < 2 {
        return reject("Company is required");
    }
    if body.company_size.trim().is_empty() {
        return reject("Company size is required");
    }

    let name = body.name.trim().to_string();
    let email = body.email.trim().to_lowercase();
    let company = body.company.trim().to_string();
    let company_size = body.company_size.trim().to_string();

    let Some(mail) = state.mail.as_ref() else {
        error!("waiting-list sign-up received but email is not configured");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({
                "message": "Email service is not configured. Please try again later."
            })),
        )
            .into_response();
    };

    let confirmation = OutboundEmail {
        from: mail.from_address.clone(),
        to: vec![email.clone()],
        subject: "You're on the list — Fusionstek".to_string(),
        html: thank_you_html(&name),
    };
    let notification = OutboundEmail {
        from: mail.from_address.clone(),
        to: vec![mail.admin_address.clone()],
        subject: format!("Waiting list: {company} — {name}"),
        html: admin_notification_html(&name, &email, &company, &company_size),
    };

    let (user_result, admin_result) = tokio::join!(
        mail.mailer.send(&confirmation),
        mail.mailer.send(&notification),
    );

    if let Err(e) = user_result {
        error!(error = %e, "waiting-list confirmation email failed");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "message": "Failed to send confirmation email. Please try again."
            })),
        )
            .into_response();
    }
    if let Err(e) = admin_result {
        error!(error = %e, "waiting-list admin notification failed");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "message": "Submission received but admin notification failed. We still have your details."
            })),
        )
            .into_response();
    }

    Json(serde_json::json!({ "ok": true })).into_response()
}

// ── Templates ───────────────────────────────────────────────────────────

const BODY_STYLE: &str = "font-family: system-ui, -apple-system, sans-serif; \
line-height: 1.6; color: #333; max-width: 560px; margin: 0 auto; padding: 24px;";

fn thank_you_html(name: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><meta name="viewport" content="width=device-width,initial-scale=1"></head>
<body style="{BODY_STYLE}">
  <p>Hi {name},</p>
  <p>Thank you for joining the Fusionstek waiting list.</p>
  <p>We'll contact you as soon as we go live. We're excited to have you on board.</p>
  <p>— The Fusionstek team</p>
</body>
</html>"#,
        name = escape_html(name),
    )
}

fn admin_notification_html(name: &str, email: &str, company: &str, company_size: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><meta name="viewport" content="width=device-width,initial-scale=1"></head>
<body style="{BODY_STYLE}">
  <p><strong>New waiting list sign-up</strong></p>
  <ul style="list-style: none; padding: 0;">
    <li><strong>Name:</strong> {name}</li>
    <li><strong>Email:</strong> {email}</li>
    <li><strong>Company:</strong> {company}</li>
    <li><strong>Company size:</strong> {company_size}</li>
  </ul>
</body>
</html>"#,
        name = escape_html(name),
        email = escape_html(email),
        company = escape_html(company),
        company_size = escape_html(company_size),
    )
}

/// Escape user-supplied text for interpolation into email HTML.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_html_metacharacters() {
        assert_eq!(
            escape_html(r#"<b>"A&B's"</b>"#),
            "&lt;b&gt;&quot;A&amp;B&#39;s&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn email_regex_matches_like_the_form() {
        assert!(EMAIL_RE.is_match("ada@example.com"));
        assert!(EMAIL_RE.is_match("a.b+c@sub.example.co"));
        assert!(!EMAIL_RE.is_match("not-an-email"));
        assert!(!EMAIL_RE.is_match("a b@example.com"));
        assert!(!EMAIL_RE.is_match("ada@example"));
        assert!(!EMAIL_RE.is_match("@example.com"));
    }

    #[test]
    fn thank_you_escapes_name() {
        let html = thank_you_html("<script>");
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn admin_notification_lists_all_fields() {
        let html = admin_notification_html("Ada", "ada@example.com", "Example Ltd", "11-50");
        assert!(html.contains("Ada"));
        assert!(html.contains("ada@example.com"));
        assert!(html.contains("Example Ltd"));
        assert!(html.contains("11-50"));
    }
}
