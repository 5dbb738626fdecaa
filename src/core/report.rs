use crate::domain::model::RecordKind;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    Created,
    CreatedWithoutImage,
    Failed,
    Planned,
}

/// Outcome of one source record.
#[derive(Debug, Clone, Serialize)]
pub struct ImportEntry {
    pub kind: RecordKind,
    pub name: String,
    pub image_url: Option<String>,
    pub asset_id: Option<String>,
    pub document_id: Option<String>,
    pub status: EntryStatus,
    pub error: Option<String>,
    pub processed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindSummary {
    pub fetched: usize,
    pub created: usize,
    pub failed: usize,
    pub images_uploaded: usize,
    pub images_failed: usize,
}

#[derive(Debug, Clone)]
pub struct ImportReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub dry_run: bool,
    pub entries: Vec<ImportEntry>,
}

impl ImportReport {
    pub fn new(dry_run: bool) -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            dry_run,
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: ImportEntry) {
        self.entries.push(entry);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn summary(&self, kind: RecordKind) -> KindSummary {
        let mut summary = KindSummary::default();
        for entry in self.entries.iter().filter(|e| e.kind == kind) {
            summary.fetched += 1;
            match entry.status {
                EntryStatus::Created | EntryStatus::CreatedWithoutImage => summary.created += 1,
                EntryStatus::Failed => summary.failed += 1,
                EntryStatus::Planned => {}
            }
            if entry.asset_id.is_some() {
                summary.images_uploaded += 1;
            } else if entry.image_url.is_some() && entry.status != EntryStatus::Planned {
                summary.images_failed += 1;
            }
        }
        summary
    }

    pub fn created_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.status, EntryStatus::Created | EntryStatus::CreatedWithoutImage))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.status == EntryStatus::Failed)
            .count()
    }

    pub fn document_ids(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter_map(|e| e.document_id.as_deref())
            .collect()
    }

    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut writer = csv::Writer::from_path(path)?;
        for entry in &self.entries {
            writer.serialize(entry)?;
        }
        writer.flush()?;
        Ok(())
    }
}
