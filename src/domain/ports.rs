use crate::domain::model::{Document, FailurePolicy, ImageBytes, SourceChef, SourceFood};
use crate::utils::error::Result;
use crate::utils::retry::RetryPolicy;
use async_trait::async_trait;
use std::time::Duration;

/// Read side: the seed endpoints and the image URLs they reference.
#[async_trait]
pub trait SourceApi: Send + Sync {
    async fn fetch_foods(&self) -> Result<Vec<SourceFood>>;
    async fn fetch_chefs(&self) -> Result<Vec<SourceChef>>;
    async fn fetch_image(&self, url: &str) -> Result<ImageBytes>;
}

/// Write side: the destination content store.
pub trait ContentStore: Send + Sync {
    /// Uploads an image asset and returns its id.
    fn upload_image(
        &self,
        filename: &str,
        image: ImageBytes,
    ) -> impl std::future::Future<Output = Result<String>> + Send;

    /// Creates a new document and returns its id.
    fn create_document(
        &self,
        document: &Document,
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn project_id(&self) -> &str;
    fn dataset(&self) -> &str;
    fn token(&self) -> &str;
    fn api_version(&self) -> &str;
    fn api_host(&self) -> Option<&str>;
    fn foods_endpoint(&self) -> &str;
    fn chefs_endpoint(&self) -> &str;
    fn timeout(&self) -> Option<Duration>;
    fn retry_policy(&self) -> RetryPolicy;
    fn on_image_error(&self) -> FailurePolicy;
    fn on_create_error(&self) -> FailurePolicy;
    fn dry_run(&self) -> bool;
}
