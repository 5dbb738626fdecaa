//! Content store client for a Sanity-style HTTP API.
//!
//! Two calls are needed: binary image upload on
//! `/v{version}/assets/images/{dataset}` and document creation through the
//! mutations endpoint `/v{version}/data/mutate/{dataset}`.

use crate::domain::model::{Document, ImageBytes};
use crate::domain::ports::{ConfigProvider, ContentStore};
use crate::utils::error::{ImportError, Result};
use crate::utils::retry::RetryPolicy;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    pub project_id: String,
    pub dataset: String,
    pub token: String,
    pub api_version: String,
    /// Overrides `https://{project_id}.api.sanity.io`.
    pub api_host: Option<String>,
}

impl StoreSettings {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self {
            project_id: config.project_id().to_string(),
            dataset: config.dataset().to_string(),
            token: config.token().to_string(),
            api_version: config.api_version().to_string(),
            api_host: config.api_host().map(str::to_string),
        }
    }

    pub fn base_url(&self) -> String {
        let host = match &self.api_host {
            Some(host) => host.trim_end_matches('/').to_string(),
            None => format!("https://{}.api.sanity.io", self.project_id),
        };
        let version = self.api_version.trim_start_matches('v');
        format!("{}/v{}", host, version)
    }
}

#[derive(Debug, Deserialize)]
struct AssetResponse {
    document: AssetDocument,
}

#[derive(Debug, Deserialize)]
struct AssetDocument {
    #[serde(rename = "_id")]
    id: String,
}

#[derive(Debug, Serialize)]
struct MutationRequest<'a> {
    mutations: Vec<Mutation<'a>>,
}

#[derive(Debug, Serialize)]
struct Mutation<'a> {
    create: &'a Document,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MutationResponse {
    transaction_id: Option<String>,
    #[serde(default)]
    results: Vec<MutationResult>,
}

#[derive(Debug, Deserialize)]
struct MutationResult {
    id: String,
    operation: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<ErrorDetail>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    description: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SanityStore {
    client: Client,
    settings: StoreSettings,
    base_url: String,
    retry: RetryPolicy,
}

impl SanityStore {
    pub fn new(client: Client, settings: StoreSettings) -> Self {
        let base_url = settings.base_url();
        Self {
            client,
            settings,
            base_url,
            retry: RetryPolicy::single_attempt(),
        }
    }

    pub fn from_config<C: ConfigProvider>(client: Client, config: &C) -> Self {
        Self::new(client, StoreSettings::from_config(config)).with_retry(config.retry_policy())
    }

    /// Applies to asset uploads only. Creates are never retried.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn assets_url(&self) -> String {
        format!("{}/assets/images/{}", self.base_url, self.settings.dataset)
    }

    pub fn mutate_url(&self) -> String {
        format!("{}/data/mutate/{}", self.base_url, self.settings.dataset)
    }

    async fn upload_once(&self, filename: &str, image: &ImageBytes) -> Result<String> {
        let content_type = image
            .content_type
            .as_deref()
            .unwrap_or(DEFAULT_CONTENT_TYPE);

        let response = self
            .client
            .post(self.assets_url())
            .query(&[("filename", filename)])
            .bearer_auth(&self.settings.token)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(image.data.clone())
            .send()
            .await?;

        let body: AssetResponse = read_success("asset upload", response).await?;
        Ok(body.document.id)
    }
}

async fn read_success<T: DeserializeOwned>(operation: &str, response: Response) -> Result<T> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        return Err(ImportError::StoreApi {
            operation: operation.to_string(),
            status: status.as_u16(),
            message: error_message(&text),
        });
    }

    serde_json::from_str(&text).map_err(|e| ImportError::UnexpectedResponse {
        operation: operation.to_string(),
        message: format!("{} (body: {})", e, text),
    })
}

fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            error: Some(detail),
            ..
        }) => match (detail.kind, detail.description) {
            (Some(kind), Some(description)) => format!("{}: {}", kind, description),
            (None, Some(description)) => description,
            (Some(kind), None) => kind,
            (None, None) => body.to_string(),
        },
        Ok(ErrorBody {
            message: Some(message),
            ..
        }) => message,
        _ => body.to_string(),
    }
}

impl ContentStore for SanityStore {
    async fn upload_image(&self, filename: &str, image: ImageBytes) -> Result<String> {
        tracing::debug!(
            "Uploading {} ({} bytes) to {}",
            filename,
            image.data.len(),
            self.assets_url()
        );
        let image = &image;
        self.retry
            .run("asset upload", || self.upload_once(filename, image))
            .await
    }

    async fn create_document(&self, document: &Document) -> Result<String> {
        let request = MutationRequest {
            mutations: vec![Mutation { create: document }],
        };

        let response = self
            .client
            .post(self.mutate_url())
            .query(&[("returnIds", "true")])
            .bearer_auth(&self.settings.token)
            .json(&request)
            .send()
            .await?;

        let body: MutationResponse = read_success("create", response).await?;
        tracing::debug!("Mutation transaction: {:?}", body.transaction_id);

        body.results
            .into_iter()
            .find(|r| r.operation.as_deref().is_none_or(|op| op == "create"))
            .map(|r| r.id)
            .ok_or_else(|| ImportError::UnexpectedResponse {
                operation: "create".to_string(),
                message: "mutation response carried no document id".to_string(),
            })
    }
}
