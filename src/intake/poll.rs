//! Bounded status polling.
//!
//! There is no server-side push: after a submission comes back `scanning` or
//! `pending`, the caller re-checks status on a fixed interval until the scan
//! settles or a wall-clock deadline passes, then gives up silently. This is
//! the loop the browser form runs; it lives here so the contract is
//! exercised by the integration tests and available to Rust consumers.

use std::time::Duration;

use tokio::time::Instant;

/// Fixed-interval polling bounds.
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    pub interval: Duration,
    /// Hard wall-clock cutoff measured from the first wait.
    pub deadline: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            deadline: Duration::from_secs(120),
        }
    }
}

/// Whether a status string means the scan has settled.
pub fn is_terminal(status: &str) -> bool {
    matches!(status, "completed" | "success")
}

/// Poll `check` on a fixed interval until it reports a terminal status or
/// the deadline elapses. Individual check failures are logged and retried;
/// a deadline timeout returns `None` (the silent give-up).
pub async fn poll_status<F, Fut, E>(config: PollConfig, mut check: F) -> Option<String>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<String, E>>,
    E: std::fmt::Display,
{
    let started = Instant::now();
    loop {
        if started.elapsed() >= config.deadline {
            return None;
        }
        tokio::time::sleep(config.interval).await;
        match check().await {
            Ok(status) if is_terminal(&status) => return Some(status),
            Ok(status) => {
                tracing::debug!(status = %status, "scan still in progress");
            }
            Err(e) => {
                // Transient poll failures are not fatal; the next tick retries.
                tracing::debug!(error = %e, "status poll attempt failed");
            }
        }
    }
}
