//! Account service endpoints (`/accounts`).

use super::{ApiClient, ApiError};
use serde::{Deserialize, Serialize};

/// A customer account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub owner_email: String,
    pub balance: f64,
}

/// Payload for account creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub owner_email: String,
    pub initial_balance: f64,
}

/// Payload for debit and credit operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustBalanceRequest {
    pub account_id: String,
    pub amount: f64,
}

impl ApiClient {
    /// Account belonging to the logged-in user (requires a session).
    pub async fn my_account(&self) -> Result<Account, ApiError> {
        self.get_json("/accounts/me").await
    }

    /// Look up an account by id.
    pub async fn account(&self, account_id: &str) -> Result<Account, ApiError> {
        self.get_json(&format!("/accounts/{account_id}")).await
    }

    /// Open a new account.
    pub async fn create_account(&self, req: &CreateAccountRequest) -> Result<Account, ApiError> {
        self.post_json("/accounts", req).await
    }

    /// Withdraw from an account.
    pub async fn debit(&self, req: &AdjustBalanceRequest) -> Result<Account, ApiError> {
        self.post_json("/accounts/debit", req).await
    }

    /// Deposit into an account.
    pub async fn credit(&self, req: &AdjustBalanceRequest) -> Result<Account, ApiError> {
        self.post_json("/accounts/credit", req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::authenticated_client;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn account_lookup_carries_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/accounts/acc-1"))
            .and(header("Authorization", "Bearer T"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "acc-1",
                "ownerEmail": "alice@finpay.io",
                "balance": 250.0,
            })))
            .mount(&server)
            .await;

        let client = authenticated_client(&server, "T");
        let account = client.account("acc-1").await.unwrap();

        assert_eq!(account.owner_email, "alice@finpay.io");
        assert_eq!(account.balance, 250.0);
    }

    #[tokio::test]
    async fn create_account_posts_camel_case_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/accounts"))
            .and(body_json(json!({
                "ownerEmail": "bob@finpay.io",
                "initialBalance": 100.0,
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "acc-2",
                "ownerEmail": "bob@finpay.io",
                "balance": 100.0,
            })))
            .mount(&server)
            .await;

        let client = authenticated_client(&server, "T");
        let account = client
            .create_account(&CreateAccountRequest {
                owner_email: "bob@finpay.io".into(),
                initial_balance: 100.0,
            })
            .await
            .unwrap();

        assert_eq!(account.id, "acc-2");
    }

    #[tokio::test]
    async fn debit_rejection_surfaces_as_transport_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/accounts/debit"))
            .respond_with(ResponseTemplate::new(422).set_body_string("insufficient funds"))
            .mount(&server)
            .await;

        let client = authenticated_client(&server, "T");
        let err = client
            .debit(&AdjustBalanceRequest {
                account_id: "acc-1".into(),
                amount: 1_000_000.0,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Transport(_)));
        assert!(err.to_string().contains("insufficient funds"));
    }
}
