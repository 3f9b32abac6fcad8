//! Integration tests for the contact and waiting-list forms.
//!
//! The waiting-list tests swap in a recording mailer so no provider is
//! contacted; each test binds a real listener on a random port.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use intake_api::contact::contact_routes;
use intake_api::email::{Mailer, OutboundEmail};
use intake_api::error::EmailError;
use intake_api::waiting_list::{MailerHandle, WaitingListState, waiting_list_routes};

/// Mailer that records sends instead of performing them. Optionally fails
/// sends addressed to a specific recipient.
#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<OutboundEmail>>,
    fail_for: Option<String>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), EmailError> {
        if let Some(failing) = &self.fail_for {
            if email.to.contains(failing) {
                return Err(EmailError::Provider {
                    status: 500,
                    message: "stub failure".to_string(),
                });
            }
        }
        self.sent.lock().await.push(email.clone());
        Ok(())
    }
}

fn mail_handle(mailer: Arc<RecordingMailer>) -> MailerHandle {
    MailerHandle {
        mailer,
        from_address: "Fusionstek <onboarding@resend.dev>".to_string(),
        admin_address: "info@fusionstek.com".to_string(),
    }
}

async fn start_server(state: WaitingListState) -> String {
    let app = contact_routes().merge(waiting_list_routes(state));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    // Give the server a moment to start accepting connections.
    tokio::time::sleep(Duration::from_millis(50)).await;
    format!("http://127.0.0.1:{port}")
}

async fn post_json(url: &str, body: &Value) -> reqwest::Response {
    reqwest::Client::new()
        .post(url)
        .json(body)
        .send()
        .await
        .unwrap()
}

fn valid_signup() -> Value {
    json!({
        "name": "  Ada Lovelace ",
        "email": "Ada@Example.COM",
        "company": "Example Ltd",
        "companySize": "11-50"
    })
}

// ── Contact ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn contact_requires_all_fields() {
    let base = start_server(WaitingListState::default()).await;

    let res = post_json(
        &format!("{base}/api/contact"),
        &json!({ "name": "Ada", "email": "ada@example.com" }),
    )
    .await;
    assert_eq!(res.status(), 400);
    assert_eq!(
        res.json::<Value>().await.unwrap()["message"],
        "Missing required fields"
    );

    let res = post_json(
        &format!("{base}/api/contact"),
        &json!({
            "name": "Ada",
            "email": "ada@example.com",
            "company": "Example Ltd",
            "message": "Hello there"
        }),
    )
    .await;
    assert_eq!(res.status(), 200);
    assert_eq!(res.json::<Value>().await.unwrap()["ok"], true);
}

// ── Waiting list ────────────────────────────────────────────────────────

#[tokio::test]
async fn malformed_email_is_rejected_before_any_send() {
    let mailer = Arc::new(RecordingMailer::default());
    let base = start_server(WaitingListState {
        mail: Some(mail_handle(Arc::clone(&mailer))),
    })
    .await;

    let mut body = valid_signup();
    body["email"] = json!("not-an-email");
    let res = post_json(&format!("{base}/api/waiting-list"), &body).await;
    assert_eq!(res.status(), 400);
    assert_eq!(
        res.json::<Value>().await.unwrap()["message"],
        "Valid email is required"
    );

    assert!(mailer.sent.lock().await.is_empty());
}

#[tokio::test]
async fn short_name_and_missing_size_are_rejected() {
    let mailer = Arc::new(RecordingMailer::default());
    let base = start_server(WaitingListState {
        mail: Some(mail_handle(Arc::clone(&mailer))),
    })
    .await;
    let url = format!("{base}/api/waiting-list");

    let mut body = valid_signup();
    body["name"] = json!("A");
    let res = post_json(&url, &body).await;
    assert_eq!(res.status(), 400);
    assert_eq!(
        res.json::<Value>().await.unwrap()["message"],
        "Name is required (min 2 characters)"
    );

    let mut body = valid_signup();
    body["companySize"] = json!("  ");
    let res = post_json(&url, &body).await;
    assert_eq!(res.status(), 400);
    assert_eq!(
        res.json::<Value>().await.unwrap()["message"],
        "Company size is required"
    );

    assert!(mailer.sent.lock().await.is_empty());
}

#[tokio::test]
async fn signup_sends_confirmation_and_admin_notification() {
    let mailer = Arc::new(RecordingMailer::default());
    let base = start_server(WaitingListState {
        mail: Some(mail_handle(Arc::clone(&mailer))),
    })
    .await;

    let res = post_json(&format!("{base}/api/waiting-list"), &valid_signup()).await;
    assert_eq!(res.status(), 200);
    assert_eq!(res.json::<Value>().await.unwrap()["ok"], true);

    let sent = mailer.sent.lock().await;
    assert_eq!(sent.len(), 2);

    // Confirmation goes to the trimmed, lowercased submitter address.
    let confirmation = sent
        .iter()
        .find(|e| e.to == vec!["ada@example.com".to_string()])
        .expect("confirmation email");
    assert_eq!(confirmation.subject, "You're on the list — Fusionstek");
    assert!(confirmation.html.contains("Ada Lovelace"));

    let notification = sent
        .iter()
        .find(|e| e.to == vec!["info@fusionstek.com".to_string()])
        .expect("admin notification");
    assert_eq!(
        notification.subject,
        "Waiting list: Example Ltd — Ada Lovelace"
    );
    assert!(notification.html.contains("ada@example.com"));
    assert!(notification.html.contains("11-50"));
}

#[tokio::test]
async fn unconfigured_email_reports_service_unavailable() {
    let base = start_server(WaitingListState::default()).await;

    let res = post_json(&format!("{base}/api/waiting-list"), &valid_signup()).await;
    assert_eq!(res.status(), 503);
    assert_eq!(
        res.json::<Value>().await.unwrap()["message"],
        "Email service is not configured. Please try again later."
    );
}

#[tokio::test]
async fn failed_confirmation_send_is_a_server_error() {
    let mailer = Arc::new(RecordingMailer {
        sent: Mutex::new(Vec::new()),
        fail_for: Some("ada@example.com".to_string()),
    });
    let base = start_server(WaitingListState {
        mail: Some(mail_handle(mailer)),
    })
    .await;

    let res = post_json(&format!("{base}/api/waiting-list"), &valid_signup()).await;
    assert_eq!(res.status(), 500);
    assert_eq!(
        res.json::<Value>().await.unwrap()["message"],
        "Failed to send confirmation email. Please try again."
    );
}

#[tokio::test]
async fn failed_admin_notification_keeps_the_details() {
    let mailer = Arc::new(RecordingMailer {
        sent: Mutex::new(Vec::new()),
        fail_for: Some("info@fusionstek.com".to_string()),
    });
    let base = start_server(WaitingListState {
        mail: Some(mail_handle(mailer)),
    })
    .await;

    let res = post_json(&format!("{base}/api/waiting-list"), &valid_signup()).await;
    assert_eq!(res.status(), 500);
    assert_eq!(
        res.json::<Value>().await.unwrap()["message"],
        "Submission received but admin notification failed. We still have your details."
    );
}
