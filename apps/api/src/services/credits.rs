//! Credit/subscription service client.
//!
//! One optimization run consumes one credit. The billing backend owns all
//! accounting; this client only asks it to consume and relays the outcome.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

const REQUEST_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Error)]
pub enum CreditError {
    #[error("No optimization credits remaining")]
    Insufficient { remaining: i64 },

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Credit service error (status {status}): {message}")]
    Service { status: u16, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditOutcome {
    pub success: bool,
    pub remaining_credits: i64,
}

/// The credit service contract.
#[async_trait]
pub trait CreditService: Send + Sync {
    /// Consumes one optimization credit for the user, or fails.
    async fn consume_one(&self, user_id: Uuid) -> Result<CreditOutcome, CreditError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConsumeRequest {
    user_id: Uuid,
}

/// HTTP implementation of the credit contract.
#[derive(Clone)]
pub struct HttpCreditService {
    client: Client,
    base_url: String,
}

impl HttpCreditService {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            base_url,
        }
    }
}

#[async_trait]
impl CreditService for HttpCreditService {
    async fn consume_one(&self, user_id: Uuid) -> Result<CreditOutcome, CreditError> {
        let url = format!("{}/v1/credits/consume", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .json(&ConsumeRequest { user_id })
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 402 {
            let outcome: CreditOutcome = response.json().await.unwrap_or(CreditOutcome {
                success: false,
                remaining_credits: 0,
            });
            return Err(CreditError::Insufficient {
                remaining: outcome.remaining_credits,
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Credit service returned {}: {}", status, body);
            return Err(CreditError::Service {
                status: status.as_u16(),
                message: body,
            });
        }

        let outcome: CreditOutcome = response.json().await?;
        if !outcome.success {
            return Err(CreditError::Insufficient {
                remaining: outcome.remaining_credits,
            });
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_wire_shape() {
        let outcome: CreditOutcome =
            serde_json::from_str(r#"{"success": true, "remainingCredits": 4}"#).expect("parse");
        assert!(outcome.success);
        assert_eq!(outcome.remaining_credits, 4);
    }

    #[tokio::test]
    async fn test_stub_service_insufficient_path() {
        struct Broke;

        #[async_trait]
        impl CreditService for Broke {
            async fn consume_one(&self, _user_id: Uuid) -> Result<CreditOutcome, CreditError> {
                Err(CreditError::Insufficient { remaining: 0 })
            }
        }

        let service: Box<dyn CreditService> = Box::new(Broke);
        let err = service.consume_one(Uuid::new_v4()).await.expect_err("broke");
        assert!(matches!(err, CreditError::Insufficient { remaining: 0 }));
    }
}
