//! Transaction service endpoints (`/transactions`).
//!
//! Transfer submission is the one mutating call with a correctness contract
//! beyond "send the body": every logical submission carries a fresh
//! `Idempotency-Key` header so the backend can deduplicate retried requests.
//! A key is generated once per user-initiated submission and never reused
//! across distinct submissions; retrying the *same* submission with the same
//! key is safe.

use super::{reject_body, ApiClient, ApiError};
use serde::{Deserialize, Serialize};

const IDEMPOTENCY_HEADER: &str = "Idempotency-Key";

/// A transfer between two accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub from_account_id: String,
    pub to_account_id: String,
    pub amount: f64,
    pub status: String,
}

/// Payload for transfer submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransferRequest {
    pub from_account_id: String,
    pub to_account_id: String,
    pub amount: f64,
}

/// Generate a fresh idempotency key for one logical submission.
pub fn new_idempotency_key() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl ApiClient {
    /// Transactions belonging to the logged-in user (requires a session).
    pub async fn my_transactions(&self) -> Result<Vec<Transaction>, ApiError> {
        self.get_json("/transactions/me").await
    }

    /// All transactions touching an account.
    pub async fn transactions_for_account(
        &self,
        account_id: &str,
    ) -> Result<Vec<Transaction>, ApiError> {
        self.get_json(&format!("/transactions/account/{account_id}"))
            .await
    }

    /// Look up a transaction by id.
    pub async fn transaction(&self, transaction_id: &str) -> Result<Transaction, ApiError> {
        self.get_json(&format!("/transactions/{transaction_id}")).await
    }

    /// Submit a transfer under a caller-supplied idempotency key. Reuse the
    /// same key only when retrying this exact submission.
    pub async fn submit_transfer_with_key(
        &self,
        req: &CreateTransferRequest,
        idempotency_key: &str,
    ) -> Result<Transaction, ApiError> {
        tracing::info!(
            from = %req.from_account_id,
            to = %req.to_account_id,
            amount = req.amount,
            idempotency_key,
            "submitting transfer"
        );
        let resp = self
            .authorize(
                self.http
                    .post(self.url("/transactions/transfer"))
                    .header(IDEMPOTENCY_HEADER, idempotency_key)
                    .json(req),
            )
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ApiError::Transport(format!(
                "transfer failed {}",
                reject_body(resp).await
            )));
        }
        Ok(resp.json().await?)
    }

    /// Submit a new transfer, generating a fresh idempotency key.
    pub async fn submit_transfer(
        &self,
        req: &CreateTransferRequest,
    ) -> Result<Transaction, ApiError> {
        self.submit_transfer_with_key(req, &new_idempotency_key()).await
    }
}
