use crate::adapters::http;
use crate::domain::model::{ImageBytes, SourceChef, SourceFood};
use crate::domain::ports::{ConfigProvider, SourceApi};
use crate::utils::error::Result;
use crate::utils::retry::RetryPolicy;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Seed endpoints reached over plain HTTP GET.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    foods_endpoint: String,
    chefs_endpoint: String,
    retry: RetryPolicy,
}

impl HttpSource {
    pub fn new(client: Client, foods_endpoint: String, chefs_endpoint: String) -> Self {
        Self {
            client,
            foods_endpoint,
            chefs_endpoint,
            retry: RetryPolicy::single_attempt(),
        }
    }

    pub fn from_config<C: ConfigProvider>(client: Client, config: &C) -> Self {
        Self::new(
            client,
            config.foods_endpoint().to_string(),
            config.chefs_endpoint().to_string(),
        )
        .with_retry(config.retry_policy())
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// A `null` body counts as an empty collection.
    async fn fetch_collection<T: DeserializeOwned>(&self, label: &str, url: &str) -> Result<Vec<T>> {
        let client = &self.client;
        let values: Option<Vec<Value>> = self
            .retry
            .run(label, || http::get_json(client, url))
            .await?;
        let values = values.unwrap_or_default();
        let total = values.len();
        let records = decode_records(label, values);
        tracing::debug!(
            "📥 {}: {} of {} records usable from {}",
            label,
            records.len(),
            total,
            url
        );
        Ok(records)
    }
}

/// Decodes each record on its own; records of the wrong shape are logged and skipped.
fn decode_records<T: DeserializeOwned>(label: &str, values: Vec<Value>) -> Vec<T> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("⚠️ {}: skipping record #{}: {}", label, index, e);
                None
            }
        })
        .collect()
}

#[async_trait]
impl SourceApi for HttpSource {
    async fn fetch_foods(&self) -> Result<Vec<SourceFood>> {
        self.fetch_collection("fetch foods", &self.foods_endpoint).await
    }

    async fn fetch_chefs(&self) -> Result<Vec<SourceChef>> {
        self.fetch_collection("fetch chefs", &self.chefs_endpoint).await
    }

    async fn fetch_image(&self, url: &str) -> Result<ImageBytes> {
        let client = &self.client;
        self.retry
            .run("fetch image", || http::get_bytes(client, url))
            .await
    }
}
