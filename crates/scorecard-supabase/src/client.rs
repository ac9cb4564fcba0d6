use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use std::time::Duration;
use tracing::{debug, error, info};

use scorecard_api::{ApiError, Evaluation, SyncResult};
use scorecard_core::{Result, SubmissionClient};

use crate::config::SupabaseConfig;

const MAX_ERROR_BODY_CHARS: usize = 500;

/// Inserts evaluations into a Supabase table through its PostgREST API.
pub struct SupabaseClient {
    endpoint: String,
    default_headers: HeaderMap,
    client: reqwest::Client,
}

impl SupabaseClient {
    pub fn new(config: &SupabaseConfig) -> Result<Self> {
        let endpoint = config.endpoint()?;

        let api_key = HeaderValue::from_str(config.api_key.trim())
            .map_err(|e| format!("Invalid API key format: {}", e))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key.trim()))
            .map_err(|e| format!("Invalid API key format: {}", e))?;

        let mut headers = HeaderMap::new();
        headers.insert("apikey", api_key);
        headers.insert(reqwest::header::AUTHORIZATION, bearer);
        headers.insert("Prefer", HeaderValue::from_static("return=minimal"));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {}", e))?;

        info!(
            "[SupabaseClient] Using {} (timeout {}s)",
            endpoint, config.timeout_secs
        );

        Ok(Self {
            endpoint,
            default_headers: headers,
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn format_reqwest_error(e: reqwest::Error, url: &str, operation: &str) -> String {
        if e.is_timeout() {
            format!(
                "Failed to {} for {}: timeout - request took too long (check network or increase timeout_secs)",
                operation, url
            )
        } else if e.is_connect() {
            format!(
                "Failed to {} for {}: connection error - server unreachable. Error: {}",
                operation, url, e
            )
        } else {
            format!("Failed to {} for {}: {}", operation, url, e)
        }
    }

    /// Read the body and map non-2xx statuses to `ApiError::Remote`.
    async fn handle_response(
        response: reqwest::Response,
        url: &str,
    ) -> std::result::Result<String, ApiError> {
        let status = response.status();
        let response_text = response.text().await.map_err(|e| ApiError::Network {
            message: format!("Failed to read response body from {}: {}", url, e),
        })?;

        if !status.is_success() {
            return Err(ApiError::Remote {
                status: status.as_u16(),
                message: truncate_body(response_text),
            });
        }

        Ok(response_text)
    }

    async fn insert(&self, rows: &[Evaluation], operation: &str) -> SyncResult {
        debug!(
            "[SupabaseClient] {}: {} rows to {}",
            operation,
            rows.len(),
            self.endpoint
        );

        let response = match self
            .client
            .post(&self.endpoint)
            .headers(self.default_headers.clone())
            .json(rows)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                let message = Self::format_reqwest_error(e, &self.endpoint, operation);
                error!("[SupabaseClient] {}", message);
                return SyncResult::Failure(ApiError::Network { message });
            }
        };

        match Self::handle_response(response, &self.endpoint).await {
            Ok(body) if body.trim().is_empty() => SyncResult::Success(serde_json::Value::Null),
            Ok(body) => SyncResult::Success(
                serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body)),
            ),
            Err(err) => {
                error!("[SupabaseClient] {} failed: {}", operation, err);
                SyncResult::Failure(err)
            }
        }
    }
}

fn truncate_body(body: String) -> String {
    if body.chars().count() > MAX_ERROR_BODY_CHARS {
        let head: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
        format!("{}... (truncated)", head)
    } else {
        body
    }
}

#[async_trait]
impl SubmissionClient for SupabaseClient {
    fn client_name(&self) -> &str {
        "supabase"
    }

    async fn insert_one(&self, record: &Evaluation) -> SyncResult {
        self.insert(std::slice::from_ref(record), "insert evaluation")
            .await
    }

    async fn insert_many(&self, records: &[Evaluation]) -> SyncResult {
        self.insert(records, "insert evaluation batch").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_body_keeps_short_bodies() {
        assert_eq!(truncate_body("oops".to_string()), "oops");
    }

    #[test]
    fn test_truncate_body_respects_char_boundaries() {
        let body = "é".repeat(MAX_ERROR_BODY_CHARS + 10);
        let truncated = truncate_body(body);
        assert!(truncated.ends_with("... (truncated)"));
        assert_eq!(
            truncated.chars().filter(|c| *c == 'é').count(),
            MAX_ERROR_BODY_CHARS
        );
    }

    #[test]
    fn test_new_rejects_unconfigured_url() {
        assert!(SupabaseClient::new(&SupabaseConfig::default()).is_err());
    }

    #[test]
    fn test_new_rejects_key_with_newline() {
        let config = SupabaseConfig::new("http://localhost:54321", "bad\nkey");
        assert!(SupabaseClient::new(&config).is_err());
    }
}
