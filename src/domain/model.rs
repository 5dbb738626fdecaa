use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A food as served by the seed endpoint.
///
/// Numeric fields are kept as raw JSON values and copied to the document
/// as sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SourceFood {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<Value>,
    pub original_price: Option<Value>,
    pub tags: Option<Vec<String>>,
    pub description: Option<String>,
    pub available: Option<bool>,
    pub image: Option<String>,
}

/// A chef as served by the seed endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SourceChef {
    pub name: Option<String>,
    pub position: Option<String>,
    pub experience: Option<Value>,
    pub specialty: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>,
    pub image: Option<String>,
}

/// Link from a document to an uploaded asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetReference {
    #[serde(rename = "_type")]
    pub type_name: String,
    #[serde(rename = "_ref")]
    pub asset_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageField {
    #[serde(rename = "_type")]
    pub type_name: String,
    pub asset: AssetReference,
}

impl ImageField {
    pub fn for_asset(asset_id: impl Into<String>) -> Self {
        Self {
            type_name: "image".to_string(),
            asset: AssetReference {
                type_name: "reference".to_string(),
                asset_id: asset_id.into(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodDocument {
    #[serde(rename = "_type")]
    pub type_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Value>,
    pub original_price: Option<Value>,
    pub tags: Vec<String>,
    pub description: String,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageField>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChefDocument {
    #[serde(rename = "_type")]
    pub type_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub position: Option<String>,
    pub experience: Value,
    pub specialty: String,
    pub description: String,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageField>,
}

/// A document ready to be created in the content store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Document {
    Food(FoodDocument),
    Chef(ChefDocument),
}

impl Document {
    pub fn kind(&self) -> RecordKind {
        match self {
            Document::Food(_) => RecordKind::Food,
            Document::Chef(_) => RecordKind::Chef,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Document::Food(doc) => doc.name.as_deref(),
            Document::Chef(doc) => doc.name.as_deref(),
        }
    }

    pub fn image(&self) -> Option<&ImageField> {
        match self {
            Document::Food(doc) => doc.image.as_ref(),
            Document::Chef(doc) => doc.image.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Food,
    Chef,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Food => write!(f, "food"),
            RecordKind::Chef => write!(f, "chef"),
        }
    }
}

/// Raw image payload fetched from a source URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBytes {
    pub data: Vec<u8>,
    pub content_type: Option<String>,
}

/// What to do when a single record's image or create step fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    #[default]
    Continue,
    Abort,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Continue => write!(f, "continue"),
            FailurePolicy::Abort => write!(f, "abort"),
        }
    }
}
