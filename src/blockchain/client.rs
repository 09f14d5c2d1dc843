//! Node REST client and confirmation waiting.
//!
//! # Responsibilities
//! - Query transaction status from a node
//! - Poll until a broadcast transaction appears on chain
//! - Bound every request and the whole wait with timeouts

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tokio::time::{sleep, timeout};
use url::Url;

use crate::blockchain::types::{BlockchainError, BlockchainResult, TransactionStatus};
use crate::config::ConfirmationConfig;
use crate::observability::metrics;
use crate::resilience::Backoff;

/// Blocks until a transaction is on chain.
///
/// Implementations own their polling and timeout policy.
#[async_trait]
pub trait ConfirmationWaiter: Send + Sync {
    async fn wait_for_transaction(
        &self,
        id: &str,
        api_base: &Url,
    ) -> BlockchainResult<TransactionStatus>;
}

/// HTTP client for a node's REST API.
#[derive(Clone)]
pub struct NodeClient {
    http: reqwest::Client,
    config: ConfirmationConfig,
}

impl NodeClient {
    /// Create a new node client.
    pub fn new(config: ConfirmationConfig) -> BlockchainResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| BlockchainError::Rpc(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Fetch a transaction by id. `None` while the node does not know it yet.
    pub async fn transaction_info(
        &self,
        api_base: &Url,
        id: &str,
    ) -> BlockchainResult<Option<TransactionStatus>> {
        let url = info_url(api_base, id);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| BlockchainError::Rpc(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BlockchainError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<TransactionStatus>()
            .await
            .map(Some)
            .map_err(|e| BlockchainError::Rpc(format!("Malformed transaction info: {}", e)))
    }

    /// Poll `transaction_info` until the transaction appears.
    ///
    /// Transport errors and 5xx answers are retried; other 4xx answers end
    /// the wait.
    pub async fn wait_for(&self, api_base: &Url, id: &str) -> BlockchainResult<TransactionStatus> {
        let timeout_secs = self.config.timeout_secs;
        let mut backoff = Backoff::from_config(&self.config);

        let result = timeout(Duration::from_secs(timeout_secs), async {
            loop {
                sleep(backoff.next_delay()).await;
                metrics::record_confirmation_poll();

                match self.transaction_info(api_base, id).await {
                    Ok(Some(status)) => return Ok(status),
                    Ok(None) => {
                        tracing::debug!(tx_id = %id, attempt = backoff.attempts(), "Transaction pending");
                    }
                    Err(BlockchainError::UnexpectedStatus { status, body }) if status < 500 => {
                        return Err(BlockchainError::UnexpectedStatus { status, body });
                    }
                    Err(e) => {
                        tracing::warn!(tx_id = %id, error = %e, "Status poll failed, retrying");
                    }
                }
            }
        })
        .await;

        match result {
            Ok(status) => status,
            Err(_) => Err(BlockchainError::ConfirmationTimeout {
                id: id.to_string(),
                secs: timeout_secs,
            }),
        }
    }

    pub fn config(&self) -> &ConfirmationConfig {
        &self.config
    }
}

#[async_trait]
impl ConfirmationWaiter for NodeClient {
    async fn wait_for_transaction(
        &self,
        id: &str,
        api_base: &Url,
    ) -> BlockchainResult<TransactionStatus> {
        self.wait_for(api_base, id).await
    }
}

impl std::fmt::Debug for NodeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeClient")
            .field("timeout_secs", &self.config.timeout_secs)
            .field("poll_interval_ms", &self.config.poll_interval_ms)
            .finish()
    }
}

fn info_url(api_base: &Url, id: &str) -> String {
    format!(
        "{}/transactions/info/{}",
        api_base.as_str().trim_end_matches('/'),
        id
    )
}
