use crate::core::report::{EntryStatus, ImportEntry, ImportReport};
use crate::core::transform::{chef_document, food_document, image_filename, image_source};
use crate::domain::model::{Document, FailurePolicy, RecordKind};
use crate::domain::ports::{ConfigProvider, ContentStore, SourceApi};
use crate::utils::error::{ImportError, Result};
use chrono::Utc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportOptions {
    pub on_image_error: FailurePolicy,
    pub on_create_error: FailurePolicy,
    pub dry_run: bool,
}

impl ImportOptions {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self {
            on_image_error: config.on_image_error(),
            on_create_error: config.on_create_error(),
            dry_run: config.dry_run(),
        }
    }
}

/// One-shot sync of the seed endpoints into the content store.
///
/// Both collections are fetched concurrently; records are then imported one
/// at a time, every food before any chef.
pub struct Importer<R: SourceApi, S: ContentStore> {
    source: R,
    store: S,
    options: ImportOptions,
}

impl<R: SourceApi, S: ContentStore> Importer<R, S> {
    pub fn new(source: R, store: S) -> Self {
        Self {
            source,
            store,
            options: ImportOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ImportOptions) -> Self {
        self.options = options;
        self
    }

    pub async fn run(&self) -> Result<ImportReport> {
        let mut report = ImportReport::new(self.options.dry_run);
        self.run_into(&mut report).await?;
        Ok(report)
    }

    /// Like [`Importer::run`], but keeps the entries recorded before an abort.
    pub async fn run_into(&self, report: &mut ImportReport) -> Result<()> {
        tracing::info!("📡 Fetching food and chef data from source API...");

        let (foods, chefs) =
            match tokio::try_join!(self.source.fetch_foods(), self.source.fetch_chefs()) {
                Ok(collections) => collections,
                Err(e) => {
                    tracing::error!("❌ Error importing data: {}", e);
                    return Err(e);
                }
            };
        tracing::info!("📥 Fetched {} foods and {} chefs", foods.len(), chefs.len());

        for food in &foods {
            self.import_record(
                RecordKind::Food,
                food.name.as_deref(),
                image_source(&food.image),
                |asset| Document::Food(food_document(food, asset)),
                report,
            )
            .await?;
        }

        for chef in &chefs {
            self.import_record(
                RecordKind::Chef,
                chef.name.as_deref(),
                image_source(&chef.image),
                |asset| Document::Chef(chef_document(chef, asset)),
                report,
            )
            .await?;
        }

        report.finish();
        let foods_summary = report.summary(RecordKind::Food);
        let chefs_summary = report.summary(RecordKind::Chef);

        if self.options.dry_run {
            tracing::info!(
                "🔍 Dry run finished: {} foods and {} chefs would be created",
                foods_summary.fetched,
                chefs_summary.fetched
            );
        } else if report.failed_count() > 0 {
            tracing::warn!(
                "⚠️ Data import completed with failures: {} created, {} failed",
                report.created_count(),
                report.failed_count()
            );
        } else {
            tracing::info!(
                "✅ Data import completed successfully: {} foods, {} chefs",
                foods_summary.created,
                chefs_summary.created
            );
        }

        Ok(())
    }

    async fn import_record<F>(
        &self,
        kind: RecordKind,
        name: Option<&str>,
        image_url: Option<&str>,
        build: F,
        report: &mut ImportReport,
    ) -> Result<()>
    where
        F: Fn(Option<&str>) -> Document,
    {
        let display_name = name.unwrap_or("<unnamed>");
        tracing::info!("🍽️ Processing {}: {}", kind, display_name);

        let mut entry = ImportEntry {
            kind,
            name: display_name.to_string(),
            image_url: image_url.map(str::to_string),
            asset_id: None,
            document_id: None,
            status: EntryStatus::Planned,
            error: None,
            processed_at: Utc::now(),
        };

        if self.options.dry_run {
            let document = build(None);
            tracing::debug!("Would create {}: {}", kind, serde_json::to_string(&document)?);
            report.push(entry);
            return Ok(());
        }

        if let Some(url) = image_url {
            match self.upload_image(url).await {
                Ok(asset_id) => entry.asset_id = Some(asset_id),
                Err(e) => {
                    tracing::error!("❌ Failed to upload image: {}: {}", url, e);
                    entry.error = Some(format!("image {}: {}", url, e));
                    if self.options.on_image_error == FailurePolicy::Abort {
                        entry.status = EntryStatus::Failed;
                        report.push(entry);
                        return Err(ImportError::Aborted {
                            created: report.created_count(),
                            reason: format!("image upload failed for {}: {}", url, e),
                        });
                    }
                }
            }
        }

        let document = build(entry.asset_id.as_deref());
        tracing::info!("📤 Creating {} document: {}", kind, display_name);

        match self.store.create_document(&document).await {
            Ok(id) => {
                tracing::info!("✅ {} created: {}", kind, id);
                entry.document_id = Some(id);
                entry.status = if image_url.is_some() && entry.asset_id.is_none() {
                    EntryStatus::CreatedWithoutImage
                } else {
                    EntryStatus::Created
                };
                report.push(entry);
                Ok(())
            }
            Err(e) => {
                tracing::error!("❌ Failed to create {} '{}': {}", kind, display_name, e);
                entry.status = EntryStatus::Failed;
                entry.error = Some(match entry.error.take() {
                    Some(previous) => format!("{}; create: {}", previous, e),
                    None => format!("create: {}", e),
                });
                report.push(entry);

                match self.options.on_create_error {
                    FailurePolicy::Continue => Ok(()),
                    FailurePolicy::Abort => Err(ImportError::Aborted {
                        created: report.created_count(),
                        reason: format!("could not create {} '{}': {}", kind, display_name, e),
                    }),
                }
            }
        }
    }

    async fn upload_image(&self, url: &str) -> Result<String> {
        tracing::info!("🖼️ Uploading image: {}", url);
        let image = self.source.fetch_image(url).await?;
        let asset_id = self.store.upload_image(&image_filename(url), image).await?;
        tracing::info!("🖼️ Image uploaded successfully: {}", asset_id);
        Ok(asset_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ImageBytes, SourceChef, SourceFood};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::{HashMap, HashSet};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct MockSource {
        foods: Vec<SourceFood>,
        chefs: Vec<SourceChef>,
        images: HashMap<String, Vec<u8>>,
        fail_chefs: bool,
    }

    #[async_trait]
    impl SourceApi for MockSource {
        async fn fetch_foods(&self) -> Result<Vec<SourceFood>> {
            Ok(self.foods.clone())
        }

        async fn fetch_chefs(&self) -> Result<Vec<SourceChef>> {
            if self.fail_chefs {
                return Err(ImportError::SourceStatus {
                    endpoint: "http://seed/api/chefs".to_string(),
                    status: 500,
                });
            }
            Ok(self.chefs.clone())
        }

        async fn fetch_image(&self, url: &str) -> Result<ImageBytes> {
            self.images
                .get(url)
                .map(|data| ImageBytes {
                    data: data.clone(),
                    content_type: Some("image/jpeg".to_string()),
                })
                .ok_or_else(|| ImportError::SourceStatus {
                    endpoint: url.to_string(),
                    status: 404,
                })
        }
    }

    #[derive(Clone, Default)]
    struct MockStore {
        uploads: Arc<Mutex<Vec<String>>>,
        documents: Arc<Mutex<Vec<serde_json::Value>>>,
        reject_names: Arc<HashSet<String>>,
        fail_uploads: bool,
    }

    impl MockStore {
        fn rejecting(names: &[&str]) -> Self {
            Self {
                reject_names: Arc::new(names.iter().map(|n| n.to_string()).collect()),
                ..Self::default()
            }
        }

        async fn documents(&self) -> Vec<serde_json::Value> {
            self.documents.lock().await.clone()
        }

        async fn uploads(&self) -> Vec<String> {
            self.uploads.lock().await.clone()
        }
    }

    impl ContentStore for MockStore {
        async fn upload_image(&self, filename: &str, _image: ImageBytes) -> Result<String> {
            if self.fail_uploads {
                return Err(ImportError::StoreApi {
                    operation: "asset upload".to_string(),
                    status: 502,
                    message: "bad gateway".to_string(),
                });
            }
            let mut uploads = self.uploads.lock().await;
            uploads.push(filename.to_string());
            Ok(format!("image-{}", filename))
        }

        async fn create_document(&self, document: &Document) -> Result<String> {
            if document
                .name()
                .is_some_and(|name| self.reject_names.contains(name))
            {
                return Err(ImportError::StoreApi {
                    operation: "create".to_string(),
                    status: 400,
                    message: "invalid document".to_string(),
                });
            }
            let mut documents = self.documents.lock().await;
            documents.push(serde_json::to_value(document)?);
            Ok(format!("{}-{}", document.kind(), documents.len()))
        }
    }

    fn food(value: serde_json::Value) -> SourceFood {
        serde_json::from_value(value).unwrap()
    }

    fn chef(value: serde_json::Value) -> SourceChef {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_pasta_with_image() {
        let source = MockSource {
            foods: vec![food(json!({"name": "Pasta", "price": 12, "image": "http://x/pasta.jpg"}))],
            images: HashMap::from([("http://x/pasta.jpg".to_string(), vec![1, 2, 3])]),
            ..MockSource::default()
        };
        let store = MockStore::default();
        let importer = Importer::new(source, store.clone());

        let report = importer.run().await.unwrap();

        assert_eq!(store.uploads().await, vec!["pasta.jpg"]);
        let documents = store.documents().await;
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0]["_type"], json!("food"));
        assert_eq!(documents[0]["name"], json!("Pasta"));
        assert_eq!(documents[0]["price"], json!(12));
        assert_eq!(documents[0]["available"], json!(true));
        assert_eq!(documents[0]["tags"], json!([]));
        assert_eq!(documents[0]["image"]["asset"]["_ref"], json!("image-pasta.jpg"));
        assert_eq!(report.entries[0].status, EntryStatus::Created);
        assert_eq!(report.entries[0].document_id.as_deref(), Some("food-1"));
    }

    #[tokio::test]
    async fn test_image_failure_still_creates_document() {
        let source = MockSource {
            foods: vec![food(json!({"name": "Burger", "price": 9, "image": "http://x/burger.jpg"}))],
            images: HashMap::from([("http://x/burger.jpg".to_string(), vec![9])]),
            ..MockSource::default()
        };
        let store = MockStore {
            fail_uploads: true,
            ..MockStore::default()
        };
        let importer = Importer::new(source, store.clone());

        let report = importer.run().await.unwrap();

        let documents = store.documents().await;
        assert_eq!(documents.len(), 1);
        assert!(documents[0].get("image").is_none());
        assert_eq!(report.entries[0].status, EntryStatus::CreatedWithoutImage);
        assert!(report.entries[0]
            .error
            .as_deref()
            .unwrap()
            .contains("http://x/burger.jpg"));
    }

    #[tokio::test]
    async fn test_image_fetch_failure_is_not_fatal() {
        let source = MockSource {
            chefs: vec![chef(json!({"name": "Ana", "image": "http://x/missing.png"}))],
            ..MockSource::default()
        };
        let store = MockStore::default();
        let importer = Importer::new(source, store.clone());

        importer.run().await.unwrap();

        assert!(store.uploads().await.is_empty());
        let documents = store.documents().await;
        assert_eq!(documents[0]["_type"], json!("chef"));
        assert_eq!(documents[0]["experience"], json!(0));
        assert!(documents[0].get("image").is_none());
    }

    #[tokio::test]
    async fn test_chef_fetch_failure_creates_nothing() {
        let source = MockSource {
            foods: vec![food(json!({"name": "Pasta", "price": 12}))],
            chefs: vec![chef(json!({"name": "Ana"}))],
            fail_chefs: true,
            ..MockSource::default()
        };
        let store = MockStore::default();
        let importer = Importer::new(source, store.clone());

        let err = importer.run().await.unwrap_err();

        assert!(matches!(err, ImportError::SourceStatus { status: 500, .. }));
        assert!(store.documents().await.is_empty());
    }

    #[tokio::test]
    async fn test_foods_are_created_before_chefs() {
        let source = MockSource {
            foods: vec![
                food(json!({"name": "Pasta", "price": 12})),
                food(json!({"name": "Soup", "price": 6})),
            ],
            chefs: vec![chef(json!({"name": "Ana"}))],
            ..MockSource::default()
        };
        let store = MockStore::default();
        Importer::new(source, store.clone()).run().await.unwrap();

        let types: Vec<_> = store
            .documents()
            .await
            .iter()
            .map(|d| format!("{}:{}", d["_type"].as_str().unwrap(), d["name"].as_str().unwrap()))
            .collect();
        assert_eq!(types, vec!["food:Pasta", "food:Soup", "chef:Ana"]);
    }

    #[tokio::test]
    async fn test_create_failure_continues_by_default() {
        let source = MockSource {
            foods: vec![
                food(json!({"name": "Pasta", "price": 12})),
                food(json!({"name": "Broken", "price": 1})),
                food(json!({"name": "Soup", "price": 6})),
            ],
            ..MockSource::default()
        };
        let store = MockStore::rejecting(&["Broken"]);
        let report = Importer::new(source, store.clone()).run().await.unwrap();

        assert_eq!(store.documents().await.len(), 2);
        assert_eq!(report.created_count(), 2);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.entries[1].status, EntryStatus::Failed);
    }

    #[tokio::test]
    async fn test_create_failure_aborts_when_configured() {
        let source = MockSource {
            foods: vec![
                food(json!({"name": "Pasta", "price": 12})),
                food(json!({"name": "Broken", "price": 1})),
                food(json!({"name": "Soup", "price": 6})),
            ],
            ..MockSource::default()
        };
        let store = MockStore::rejecting(&["Broken"]);
        let importer = Importer::new(source, store.clone()).with_options(ImportOptions {
            on_create_error: FailurePolicy::Abort,
            ..ImportOptions::default()
        });

        let mut report = ImportReport::new(false);
        let err = importer.run_into(&mut report).await.unwrap_err();

        assert!(matches!(err, ImportError::Aborted { created: 1, .. }));
        assert_eq!(store.documents().await.len(), 1);
        assert_eq!(report.entries.len(), 2);
    }

    #[tokio::test]
    async fn test_dry_run_writes_nothing() {
        let source = MockSource {
            foods: vec![food(json!({"name": "Pasta", "price": 12, "image": "http://x/pasta.jpg"}))],
            chefs: vec![chef(json!({"name": "Ana"}))],
            images: HashMap::from([("http://x/pasta.jpg".to_string(), vec![1])]),
            ..MockSource::default()
        };
        let store = MockStore::default();
        let importer = Importer::new(source, store.clone()).with_options(ImportOptions {
            dry_run: true,
            ..ImportOptions::default()
        });

        let report = importer.run().await.unwrap();

        assert!(store.uploads().await.is_empty());
        assert!(store.documents().await.is_empty());
        assert_eq!(report.entries.len(), 2);
        assert!(report
            .entries
            .iter()
            .all(|e| e.status == EntryStatus::Planned));
    }
}
