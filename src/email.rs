//! Transactional email via the provider's HTTP API.
//!
//! The provider accepts `{from, to, subject, html}` send requests behind a
//! bearer API key. Delivery itself (queuing, retries, bounces) is the
//! provider's problem; a non-2xx answer here is a hard failure.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::EmailError;

/// Default provider endpoint (Resend-compatible).
const DEFAULT_API_URL: &str = "https://api.resend.com/emails";

/// Email configuration, built from environment variables.
#[derive(Clone)]
pub struct EmailConfig {
    pub api_key: SecretString,
    pub api_url: String,
    /// Sender for outbound mail, e.g. `Fusionstek <onboarding@resend.dev>`.
    pub from_address: String,
    /// Internal address notified of waiting-list sign-ups.
    pub admin_address: String,
}

impl EmailConfig {
    /// Build config from environment variables.
    /// Returns `None` if `EMAIL_API_KEY` is not set (email disabled).
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("EMAIL_API_KEY").ok()?;

        let api_url =
            std::env::var("EMAIL_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let from_address = std::env::var("EMAIL_FROM_ADDRESS")
            .unwrap_or_else(|_| "Fusionstek <onboarding@resend.dev>".to_string());

        let admin_address = std::env::var("EMAIL_ADMIN_ADDRESS")
            .unwrap_or_else(|_| "info@fusionstek.com".to_string());

        Some(Self {
            api_key: SecretString::from(api_key),
            api_url,
            from_address,
            admin_address,
        })
    }
}

/// A single outbound message in the provider's wire shape.
#[derive(Debug, Clone, Serialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

/// Seam for sending email, so handlers can be tested with a stub.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<(), EmailError>;
}

/// Error body shape the provider uses for failures.
#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: Option<String>,
}

/// Mailer speaking the provider's HTTP API.
pub struct HttpMailer {
    api_url: String,
    api_key: SecretString,
    client: reqwest::Client,
}

impl HttpMailer {
    pub fn new(config: &EmailConfig) -> Self {
        Self {
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), EmailError> {
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(self.api_key.expose_secret())
            .json(email)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let message = response
            .json::<ProviderErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| "send failed".to_string());
        Err(EmailError::Provider {
            status: status.as_u16(),
            message,
        })
    }
}
