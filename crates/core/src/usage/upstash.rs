//! Upstash Redis REST counter store.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::config::UpstashConfig;

use super::{CounterStore, StoreError};

/// Reply envelope of the Upstash REST API.
#[derive(Debug, Deserialize)]
struct UpstashReply<T> {
    result: Option<T>,
    error: Option<String>,
}

/// Counters kept in a Redis database behind Upstash's REST interface.
pub struct UpstashCounterStore {
    client: Client,
    config: UpstashConfig,
}

impl UpstashCounterStore {
    pub fn new(config: UpstashConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// `INCRBY key delta`
    fn incrby_url(&self, key: &str, delta: i64) -> String {
        format!(
            "{}/incrby/{}/{}",
            self.config.url.trim_end_matches('/'),
            urlencoding::encode(key),
            delta
        )
    }

    /// `GET key`
    fn get_url(&self, key: &str) -> String {
        format!(
            "{}/get/{}",
            self.config.url.trim_end_matches('/'),
            urlencoding::encode(key)
        )
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Option<T>, StoreError> {
        let response = request
            .bearer_auth(&self.config.token)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    StoreError::Timeout
                } else if e.is_connect() {
                    StoreError::Connection(e.to_string())
                } else {
                    StoreError::Api(e.to_string())
                }
            })?;

        let status = response.status();
        let reply: UpstashReply<T> = response
            .json()
            .await
            .map_err(|e| StoreError::Api(format!("HTTP {}: failed to parse response: {}", status, e)))?;

        if let Some(error) = reply.error {
            return Err(StoreError::Api(format!("HTTP {}: {}", status, error)));
        }
        if !status.is_success() {
            return Err(StoreError::Api(format!("HTTP {}", status)));
        }

        Ok(reply.result)
    }
}

#[async_trait]
impl CounterStore for UpstashCounterStore {
    fn name(&self) -> &str {
        "upstash"
    }

    async fn increment(&self, key: &str, delta: i64) -> Result<i64, StoreError> {
        debug!(key, delta, "Incrementing Upstash counter");
        let value: Option<i64> = self.send(self.client.post(self.incrby_url(key, delta))).await?;
        value.ok_or_else(|| StoreError::Api(format!("INCRBY {} returned no result", key)))
    }

    async fn get(&self, key: &str) -> Result<Option<i64>, StoreError> {
        let value: Option<String> = self.send(self.client.get(self.get_url(key))).await?;
        value
            .map(|v| {
                v.parse::<i64>().map_err(|_| StoreError::InvalidValue {
                    key: key.to_string(),
                    value: v,
                })
            })
            .transpose()
    }
}
