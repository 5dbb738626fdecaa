use crate::domain::model::ImageBytes;
use crate::utils::error::{ImportError, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

const USER_AGENT: &str = concat!("menu-import/", env!("CARGO_PKG_VERSION"));

/// One client for every call in a run.
pub fn build_client(timeout: Option<Duration>) -> Result<Client> {
    let mut builder = Client::builder().user_agent(USER_AGENT);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

pub async fn get_json<T: DeserializeOwned>(client: &Client, url: &str) -> Result<T> {
    tracing::debug!("GET {}", url);
    let response = client.get(url).send().await?;
    let status = response.status();
    tracing::debug!("{} -> {}", url, status);

    if !status.is_success() {
        return Err(ImportError::SourceStatus {
            endpoint: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

pub async fn get_bytes(client: &Client, url: &str) -> Result<ImageBytes> {
    tracing::debug!("GET {}", url);
    let response = client.get(url).send().await?;
    let status = response.status();

    if !status.is_success() {
        return Err(ImportError::SourceStatus {
            endpoint: url.to_string(),
            status: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let data = response.bytes().await?.to_vec();
    tracing::debug!("{} -> {} bytes ({:?})", url, data.len(), content_type);

    Ok(ImageBytes { data, content_type })
}
