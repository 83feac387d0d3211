//! Node JSON-RPC client
//!
//! Thin client for the three node calls the core consumes: epoch
//! parameters, the cellbase reward breakdown, and the DAO maximum-withdraw
//! oracle. Transport failures and server errors are retried with
//! exponential backoff; JSON-RPC error objects are surfaced as typed
//! errors.

use crate::config::Config;
use crate::dao::WithdrawOracle;
use crate::reward::EpochProvider;
use crate::types::{Byte32, Capacity, EpochInfo, OutPoint, RewardBreakdown};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;

/// Exponential backoff configuration
#[derive(Debug, Clone)]
pub struct BackoffConfig {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
    pub max_retries: usize,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(5),
            multiplier: 2.0,
            max_retries: 10,
        }
    }
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

/// Node JSON-RPC client
#[derive(Debug)]
pub struct NodeClient {
    client: Client,
    endpoint: Url,
    backoff_config: BackoffConfig,
    next_id: AtomicU64,
}

impl NodeClient {
    /// Create a new node client
    pub fn new(endpoint: impl AsRef<str>, timeout: Duration, insecure: bool) -> Result<Self> {
        let endpoint = Url::parse(endpoint.as_ref())
            .map_err(|e| Error::config(format!("Invalid node URL: {}", e)))?;

        let client = ClientBuilder::new()
            .timeout(timeout)
            .danger_accept_invalid_certs(insecure)
            .build()
            .map_err(Error::from)?;

        Ok(Self {
            client,
            endpoint,
            backoff_config: BackoffConfig::default(),
            next_id: AtomicU64::new(0),
        })
    }

    /// Create a client from the loaded configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Self::new(
            config.node_url(),
            config.http_timeout_duration(),
            config.insecure,
        )?;
        Ok(client.with_backoff_config(BackoffConfig {
            initial_delay: config.retry_delay_duration(),
            max_delay: config.max_retry_delay_duration(),
            multiplier: 2.0,
            max_retries: config.max_retries,
        }))
    }

    /// Set custom backoff configuration
    pub fn with_backoff_config(mut self, config: BackoffConfig) -> Self {
        self.backoff_config = config;
        self
    }

    /// Fetch epoch parameters by epoch number
    pub async fn get_epoch_by_number(&self, number: u64) -> Result<EpochInfo> {
        self.call("get_epoch_by_number", json!([format!("{:#x}", number)]))
            .await
    }

    /// Fetch the cellbase reward breakdown for a block
    pub async fn get_cellbase_output_capacity_details(
        &self,
        block_hash: &Byte32,
    ) -> Result<RewardBreakdown> {
        self.call(
            "get_cellbase_output_capacity_details",
            json!([block_hash.to_hex()]),
        )
        .await
    }

    /// Compute the maximum withdrawable amount for a DAO deposit
    pub async fn calculate_dao_maximum_withdraw(
        &self,
        out_point: &OutPoint,
        block_hash: &Byte32,
    ) -> Result<Capacity> {
        self.call(
            "calculate_dao_maximum_withdraw",
            json!([out_point, block_hash.to_hex()]),
        )
        .await
    }

    /// Issue a single JSON-RPC call
    async fn call<T: DeserializeOwned>(&self, method: &str, params: serde_json::Value) -> Result<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = json!({
            "id": id,
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
        });

        debug!(method, id, "issuing node RPC call");

        let response = self.post_with_retry(&request).await?;
        let envelope: JsonRpcResponse<T> = response
            .json()
            .await
            .map_err(|e| Error::node(format!("Failed to parse {} response: {}", method, e)))?;

        if let Some(error) = envelope.error {
            return Err(Error::rpc(error.code, error.message));
        }
        envelope
            .result
            .ok_or_else(|| Error::node(format!("Empty result for {}", method)))
    }

    /// POST request with exponential backoff retry
    async fn post_with_retry(&self, body: &serde_json::Value) -> Result<Response> {
        let mut delay = self.backoff_config.initial_delay;
        let mut attempts = 0;

        loop {
            match self
                .client
                .post(self.endpoint.clone())
                .json(body)
                .send()
                .await
            {
                Ok(response) => {
                    if !response.status().is_server_error() {
                        return Ok(response);
                    }

                    if attempts >= self.backoff_config.max_retries {
                        return Err(Error::node(format!(
                            "node returned HTTP {} after {} attempts",
                            response.status(),
                            attempts + 1
                        )));
                    }
                }
                Err(e) => {
                    if !e.is_timeout() && !e.is_connect() || attempts >= self.backoff_config.max_retries {
                        return Err(Error::from(e));
                    }
                }
            }

            warn!(
                "RPC request failed, retrying in {:?} (attempt {}/{})",
                delay,
                attempts + 1,
                self.backoff_config.max_retries
            );
            sleep(delay).await;

            delay = Duration::from_millis(
                ((delay.as_millis() as f64) * self.backoff_config.multiplier) as u64,
            )
            .min(self.backoff_config.max_delay);

            attempts += 1;
        }
    }
}

#[async_trait]
impl WithdrawOracle for NodeClient {
    async fn max_withdraw(
        &self,
        deposit: &OutPoint,
        withdrawing_block_hash: &Byte32,
    ) -> Result<Capacity> {
        self.calculate_dao_maximum_withdraw(deposit, withdrawing_block_hash)
            .await
    }
}

#[async_trait]
impl EpochProvider for NodeClient {
    async fn get_epoch_by_number(&self, number: u64) -> Result<EpochInfo> {
        NodeClient::get_epoch_by_number(self, number).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_client_creation() {
        let client = NodeClient::new("http://localhost:8114", Duration::from_secs(30), false);
        assert!(client.is_ok());

        let bad = NodeClient::new("not a url", Duration::from_secs(30), false);
        assert_matches!(bad, Err(Error::Config { .. }));
    }

    #[test]
    fn test_epoch_envelope_parsing() {
        let raw = r#"{
            "jsonrpc": "2.0",
            "id": 1,
            "result": {"number": "0x2", "length": "0x708", "start_number": "0xe11"}
        }"#;
        let envelope: JsonRpcResponse<EpochInfo> = serde_json::from_str(raw).unwrap();
        let epoch = envelope.result.unwrap();
        assert_eq!(epoch.number, 2);
        assert_eq!(epoch.length, 1800);
        assert_eq!(epoch.start_number, 3601);
        assert!(envelope.error.is_none());
    }

    #[test]
    fn test_error_envelope_parsing() {
        let raw = r#"{
            "jsonrpc": "2.0",
            "id": 1,
            "result": null,
            "error": {"code": -32602, "message": "Invalid params"}
        }"#;
        let envelope: JsonRpcResponse<Capacity> = serde_json::from_str(raw).unwrap();
        let error = envelope.error.unwrap();
        assert_eq!(error.code, -32602);
        assert_eq!(error.message, "Invalid params");
    }

    #[test]
    fn test_max_withdraw_result_parsing() {
        let raw = r#"{"jsonrpc": "2.0", "id": 7, "result": "0x2ca86f2642"}"#;
        let envelope: JsonRpcResponse<Capacity> = serde_json::from_str(raw).unwrap();
        assert_eq!(envelope.result.unwrap().value(), 0x2ca86f2642);
    }

    #[test]
    fn test_backoff_config() {
        let config = BackoffConfig {
            initial_delay: Duration::from_millis(50),
            max_delay: Duration::from_secs(10),
            multiplier: 1.5,
            max_retries: 5,
        };

        let client = NodeClient::new("http://localhost:8114", Duration::from_secs(30), false)
            .unwrap()
            .with_backoff_config(config);

        assert_eq!(client.backoff_config.max_retries, 5);
        assert_eq!(client.backoff_config.multiplier, 1.5);
    }
}
