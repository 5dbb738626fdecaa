pub mod importer;
pub mod report;
pub mod transform;

pub use crate::domain::model::{Document, RecordKind};
pub use crate::domain::ports::{ConfigProvider, ContentStore, SourceApi};
pub use crate::utils::error::Result;
