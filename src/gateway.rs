//! HTTP client for the external Intake Gateway.
//!
//! The gateway owns all real work (domain scanning, verification, evidence
//! generation); this service only forwards submissions and status checks and
//! relays the responses. No retry or queuing happens here; the browser polls.

use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// Metadata forwarded to the gateway's `/submit` endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitPayload {
    pub name: String,
    pub email: String,
    pub company: String,
    pub domains: Vec<String>,
    pub notes: String,
    #[serde(rename = "uploadIds")]
    pub upload_ids: Vec<String>,
    pub consent: bool,
}

/// Gateway acknowledgment of a submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitAck {
    pub demo_request_id: String,
    /// `"completed"`, `"scanning"`, `"pending"`, …
    pub status: String,
}

/// Gateway answer to a status check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusAck {
    pub status: String,
    pub demo_request_id: String,
}

/// Error body shape the gateway uses for failures.
#[derive(Debug, Deserialize)]
struct UpstreamErrorBody {
    message: Option<String>,
}

/// Thin forwarding client for the Intake Gateway.
#[derive(Clone)]
pub struct GatewayClient {
    base_url: String,
    client: reqwest::Client,
}

impl GatewayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Build from `INTAKE_GATEWAY_URL`. Returns `None` when unset
    /// (forwarding disabled; submit/status report a configuration error).
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var("INTAKE_GATEWAY_URL").ok()?;
        if base_url.trim().is_empty() {
            return None;
        }
        Some(Self::new(base_url))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Forward a submission; the verified intake token rides along as the
    /// bearer credential.
    pub async fn submit(
        &self,
        payload: &SubmitPayload,
        token: &str,
    ) -> Result<SubmitAck, GatewayError> {
        let response = self
            .client
            .post(format!("{}/submit", self.base_url))
            .bearer_auth(token)
            .json(payload)
            .send()
            .await?;

        let response = Self::check(response, "Submission failed").await?;
        Ok(response.json().await?)
    }

    /// Forward a status check for a previously issued request identifier.
    pub async fn status(
        &self,
        demo_request_id: &str,
        token: &str,
    ) -> Result<StatusAck, GatewayError> {
        let response = self
            .client
            .get(format!("{}/status", self.base_url))
            .query(&[("demo_request_id", demo_request_id)])
            .bearer_auth(token)
            .send()
            .await?;

        let response = Self::check(response, "Status check failed").await?;
        Ok(response.json().await?)
    }

    /// Map non-success responses: 429 becomes the distinct rate-limit error,
    /// everything else relays the gateway's status and message.
    async fn check(
        response: reqwest::Response,
        fallback_message: &str,
    ) -> Result<reqwest::Response, GatewayError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(GatewayError::RateLimited);
        }
        let message = response
            .json::<UpstreamErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| fallback_message.to_string());
        Err(GatewayError::Upstream {
            status: status.as_u16(),
            message,
        })
    }
}
