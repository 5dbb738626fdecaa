//! Source record → destination document mapping.
//!
//! Only renaming and defaulting happens here. Empty strings, `0` and `null`
//! count as "not set" for the optional fields; `name` and `price` pass
//! through untouched, even when missing.

use crate::domain::model::{ChefDocument, FoodDocument, ImageField, SourceChef, SourceFood};
use serde_json::Value;
use url::Url;

const FALLBACK_IMAGE_NAME: &str = "image";

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.is_empty()).cloned()
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn non_zero(value: &Option<Value>) -> Option<Value> {
    value.as_ref().filter(|v| truthy(v)).cloned()
}

/// The image URL to upload for a record, if it has one.
pub fn image_source(image: &Option<String>) -> Option<&str> {
    image.as_deref().filter(|s| !s.is_empty())
}

/// File name for an uploaded asset: the last path segment of the source URL.
pub fn image_filename(image_url: &str) -> String {
    let from_url = Url::parse(image_url).ok().and_then(|url| {
        url.path_segments()
            .and_then(|mut segments| segments.next_back().map(str::to_string))
            .filter(|segment| !segment.is_empty())
    });

    from_url
        .or_else(|| {
            image_url
                .split(['?', '#'])
                .next()
                .and_then(|path| path.rsplit('/').next())
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| FALLBACK_IMAGE_NAME.to_string())
}

pub fn food_document(food: &SourceFood, image_asset: Option<&str>) -> FoodDocument {
    FoodDocument {
        type_name: "food".to_string(),
        name: food.name.clone(),
        category: non_empty(&food.category),
        price: food.price.clone(),
        original_price: non_zero(&food.original_price),
        tags: food.tags.clone().unwrap_or_default(),
        description: non_empty(&food.description).unwrap_or_default(),
        available: food.available.unwrap_or(true),
        image: image_asset.map(ImageField::for_asset),
    }
}

pub fn chef_document(chef: &SourceChef, image_asset: Option<&str>) -> ChefDocument {
    ChefDocument {
        type_name: "chef".to_string(),
        name: chef.name.clone(),
        position: non_empty(&chef.position),
        experience: non_zero(&chef.experience).unwrap_or_else(|| Value::from(0)),
        specialty: non_empty(&chef.specialty).unwrap_or_default(),
        description: non_empty(&chef.description).unwrap_or_default(),
        available: chef.available.unwrap_or(true),
        image: image_asset.map(ImageField::for_asset),
    }
}
