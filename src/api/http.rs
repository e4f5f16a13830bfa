//! HTTP utilities for CloudStack REST API calls

use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips non-printable characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        // Back off to a char boundary; slicing mid-character panics.
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!(
            "{}... [truncated, {} bytes total]",
            &body[..end],
            body.len()
        )
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Strip the query string before logging a URL; it carries the API key
/// and signature.
fn redact(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

/// HTTP client wrapper for CloudStack API calls
#[derive(Clone)]
pub struct ApiHttpClient {
    client: Client,
}

impl ApiHttpClient {
    /// Create a new HTTP client with a per-request timeout
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("csinv/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// GET a signed URL and parse the JSON body.
    ///
    /// CloudStack reports API-level failures with a non-2xx status and
    /// an `errortext` field somewhere in the body; that text is the
    /// useful part, so surface it when present.
    pub async fn get(&self, url: &str) -> Result<Value> {
        tracing::debug!("GET {}", redact(url));

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            let detail = error_text(&body).unwrap_or_else(|| sanitize_for_log(&body));
            tracing::error!("API error: {} - {}", status, detail);
            return Err(anyhow::anyhow!("API request failed: {}: {}", status, detail));
        }

        serde_json::from_str(&body).context("Failed to parse response JSON")
    }
}

/// Pull `errortext` out of an error body, wherever the envelope nests it
fn error_text(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    find_error_text(&value)
}

fn find_error_text(value: &Value) -> Option<String> {
    match value {
        Value::Object(map) => {
            if let Some(text) = map.get("errortext").and_then(|v| v.as_str()) {
                return Some(text.to_string());
            }
            map.values().find_map(find_error_text)
        }
        _ => None,
    }
}
