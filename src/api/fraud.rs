//! Fraud service endpoints (`/frauds`).

use super::{ApiClient, ApiError};
use serde::{Deserialize, Serialize};

/// Outcome of a fraud check on one transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FraudCheck {
    pub transaction_id: String,
    pub fraudulent: bool,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Payload for an on-demand fraud check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FraudCheckRequest {
    pub transaction_id: String,
    pub amount: f64,
}

impl ApiClient {
    /// Run a fraud check against a transaction.
    pub async fn check_fraud(&self, req: &FraudCheckRequest) -> Result<FraudCheck, ApiError> {
        self.post_json("/frauds/check", req).await
    }

    /// Stored fraud outcome for a transaction.
    pub async fn fraud_check_for(&self, transaction_id: &str) -> Result<FraudCheck, ApiError> {
        self.get_json(&format!("/frauds/transactions/{transaction_id}"))
            .await
    }
}
