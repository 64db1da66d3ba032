/// Resume Optimizer client — the single point of entry for optimization calls.
///
/// ARCHITECTURAL RULE: no other module may call the optimizer backend
/// directly. The backend wraps an LLM completion API; its failure modes are
/// classified here so callers can tell retryable conditions (rate limit,
/// server trouble) from terminal ones (bad input, auth).
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::resume::{ExperienceLevel, ResumeData};

const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum OptimizerError {
    /// The service rejected the input (empty resume text, unusable JD).
    #[error("Optimizer rejected the input: {0}")]
    BadInput(String),

    #[error("Optimizer authentication failed")]
    Auth,

    #[error("Optimizer rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("Optimizer server error (status {status}): {message}")]
    Server { status: u16, message: String },

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Optimizer returned a malformed resume payload: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}

impl OptimizerError {
    /// Whether the caller may usefully retry the same request.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            OptimizerError::RateLimited { .. }
                | OptimizerError::Server { .. }
                | OptimizerError::Transport(_)
        )
    }
}

/// Contact fields the user confirmed in the UI, overriding whatever the
/// optimizer extracts from the raw text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactOverrides {
    pub phone: Option<String>,
    pub email: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeRequest {
    pub raw_resume_text: String,
    pub job_description: String,
    pub experience_level: ExperienceLevel,
    #[serde(default)]
    pub contact_overrides: Option<ContactOverrides>,
}

/// The optimizer contract. Pluggable so tests and offline tooling can stub
/// the network service out.
#[async_trait]
pub trait ResumeOptimizer: Send + Sync {
    async fn optimize(&self, request: &OptimizeRequest) -> Result<ResumeData, OptimizerError>;
}

#[derive(Debug, Deserialize)]
struct BackendError {
    error: BackendErrorBody,
}

#[derive(Debug, Deserialize)]
struct BackendErrorBody {
    message: String,
}

/// HTTP implementation of the optimizer contract.
/// Retries on 429 and 5xx with exponential backoff.
#[derive(Clone)]
pub struct HttpResumeOptimizer {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpResumeOptimizer {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            base_url,
            api_key,
        }
    }
}

#[async_trait]
impl ResumeOptimizer for HttpResumeOptimizer {
    async fn optimize(&self, request: &OptimizeRequest) -> Result<ResumeData, OptimizerError> {
        let url = format!("{}/v1/optimize", self.base_url.trim_end_matches('/'));
        let mut last_error: Option<OptimizerError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "Optimizer call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&url)
                .header("x-api-key", &self.api_key)
                .json(request)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(OptimizerError::Transport(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Optimizer returned {}: {}", status, body);
                last_error = Some(OptimizerError::Server {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if status.as_u16() == 401 || status.as_u16() == 403 {
                return Err(OptimizerError::Auth);
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<BackendError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(OptimizerError::BadInput(message));
            }

            let text = response.text().await?;
            // The backend proxies LLM output; tolerate fenced JSON.
            let resume: ResumeData = serde_json::from_str(strip_code_fences(&text))?;
            debug!("Optimizer call succeeded for level {:?}", request.experience_level);
            return Ok(resume);
        }

        Err(last_error.unwrap_or(OptimizerError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from a payload.
fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(str::trim)
            .unwrap_or_else(|| stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(str::trim)
            .unwrap_or_else(|| stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fences_with_json_tag() {
        let input = "```json\n{\"name\": \"Jane\"}\n```";
        assert_eq!(strip_code_fences(input), "{\"name\": \"Jane\"}");
    }

    #[test]
    fn test_strip_code_fences_without_tag() {
        let input = "```\n{\"name\": \"Jane\"}\n```";
        assert_eq!(strip_code_fences(input), "{\"name\": \"Jane\"}");
    }

    #[test]
    fn test_strip_code_fences_no_fences() {
        let input = "{\"name\": \"Jane\"}";
        assert_eq!(strip_code_fences(input), "{\"name\": \"Jane\"}");
    }

    #[test]
    fn test_retryable_classification() {
        assert!(OptimizerError::RateLimited { retries: 3 }.is_retryable());
        assert!(OptimizerError::Server {
            status: 502,
            message: String::new()
        }
        .is_retryable());
        assert!(!OptimizerError::Auth.is_retryable());
        assert!(!OptimizerError::BadInput("empty resume".to_string()).is_retryable());
    }

    #[test]
    fn test_optimize_request_wire_shape() {
        let json = r#"{
            "rawResumeText": "plain resume",
            "jobDescription": "build things",
            "experienceLevel": "fresher",
            "contactOverrides": {"email": "jane@x.com"}
        }"#;
        let request: OptimizeRequest = serde_json::from_str(json).expect("parse");
        assert_eq!(request.experience_level, ExperienceLevel::Fresher);
        assert_eq!(
            request.contact_overrides.and_then(|o| o.email),
            Some("jane@x.com".to_string())
        );
    }
}
