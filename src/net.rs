//! Client identity extraction from proxy headers.
//!
//! The service sits behind a reverse proxy, so the client address comes from
//! `x-forwarded-for` (first hop) or `x-real-ip`. These values are
//! proxy-supplied and spoofable behind shared NAT; the token binding built on
//! them is an abuse deterrent, not an authentication boundary.

use axum::http::HeaderMap;

/// Fallback identity when no usable header is present.
pub const UNKNOWN: &str = "unknown";

/// Client IP as seen through proxy headers.
///
/// Takes the first entry of `x-forwarded-for` (the original client in a
/// well-behaved proxy chain), then `x-real-ip`, then `"unknown"`.
pub fn client_ip(headers: &HeaderMap) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        let trimmed = real_ip.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    UNKNOWN.to_string()
}

/// User-agent header, or `"unknown"` when absent.
pub fn user_agent(headers: &HeaderMap) -> String {
    headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .filter(|ua| !ua.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN.to_string())
}
