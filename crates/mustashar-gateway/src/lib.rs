//! HTTP transports for the remote Mustashar functions.
//!
//! The chat and speech crates define their gateways as ports; this crate
//! supplies the `reqwest`-backed implementations that talk to the hosted
//! `legal-analysis` and `text-to-speech` functions. Both share one
//! configured client and the same bearer credential.

use std::time::Duration;

use mustashar_chat::gateway::GatewayErrorBody;
use mustashar_core::config::GatewayConfig;
use mustashar_core::error::GatewayError;

pub mod analysis;
pub mod speech;

pub use analysis::HttpAnalysisGateway;
pub use speech::HttpSpeechGateway;

/// Build the shared HTTP client from gateway settings.
pub fn http_client(config: &GatewayConfig) -> Result<reqwest::Client, GatewayError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| GatewayError::Request(e.to_string()))
}

/// Join the configured base URL with a function name.
///
/// Tolerates a trailing slash on the base so config edits do not produce
/// double-slash URLs.
pub(crate) fn endpoint(base_url: &str, function: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), function)
}

/// Extract a human-readable message from a non-success response body.
///
/// Both functions report failures as `{"error": "...", "details": "..."}`;
/// anything else falls back to the raw body, or the canonical status text
/// when the body is empty.
pub(crate) fn status_message(status: reqwest::StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<GatewayErrorBody>(body) {
        return match parsed.details {
            Some(details) => format!("{}: {}", parsed.error, details),
            None => parsed.error,
        };
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        status.canonical_reason().unwrap_or("unknown error").to_string()
    } else {
        trimmed.to_string()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ---- URL joining ----

    #[test]
    fn test_endpoint_joins_base_and_function() {
        assert_eq!(
            endpoint("http://localhost:54321/functions/v1", "legal-analysis"),
            "http://localhost:54321/functions/v1/legal-analysis"
        );
    }

    #[test]
    fn test_endpoint_tolerates_trailing_slash() {
        assert_eq!(
            endpoint("https://example.test/functions/v1/", "text-to-speech"),
            "https://example.test/functions/v1/text-to-speech"
        );
    }

    // ---- Error body parsing ----

    #[test]
    fn test_status_message_parses_error_body() {
        let status = reqwest::StatusCode::INTERNAL_SERVER_ERROR;
        assert_eq!(
            status_message(status, r#"{"error":"انتهت مهلة التحليل"}"#),
            "انتهت مهلة التحليل"
        );
    }

    #[test]
    fn test_status_message_includes_details() {
        let status = reqwest::StatusCode::BAD_GATEWAY;
        assert_eq!(
            status_message(status, r#"{"error":"upstream failed","details":"timeout after 60s"}"#),
            "upstream failed: timeout after 60s"
        );
    }

    #[test]
    fn test_status_message_falls_back_to_raw_body() {
        let status = reqwest::StatusCode::BAD_GATEWAY;
        assert_eq!(status_message(status, "<html>Bad Gateway</html>"), "<html>Bad Gateway</html>");
    }

    #[test]
    fn test_status_message_empty_body_uses_reason() {
        let status = reqwest::StatusCode::SERVICE_UNAVAILABLE;
        assert_eq!(status_message(status, ""), "Service Unavailable");
    }

    // ---- Client construction ----

    #[test]
    fn test_http_client_builds_from_defaults() {
        let config = GatewayConfig::default();
        assert!(http_client(&config).is_ok());
    }
}
