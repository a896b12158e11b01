//! Wardrobe endpoints
//!
//! Item uploads are multipart: the image bytes plus optional category and
//! tags fields. Capture and compression happen upstream; this layer only
//! ships prepared JPEG bytes.

use super::client::{ApiClient, ApiError};
use crate::structs::{ClothingCategory, WardrobeItem};
use reqwest::multipart;

// The backend route really is spelled "warderobe".
const WARDROBE_PATH: &str = "/api/warderobe";

/// A new item to upload for classification.
#[derive(Debug, Clone)]
pub struct NewWardrobeItem {
    /// Prepared JPEG bytes.
    pub image: Vec<u8>,
    /// Optional category hint; the backend classifies when absent.
    pub category: Option<ClothingCategory>,
    /// Free-form tags, sent as a JSON array field.
    pub tags: Vec<String>,
}

impl NewWardrobeItem {
    pub fn new(image: Vec<u8>) -> Self {
        Self {
            image,
            category: None,
            tags: Vec::new(),
        }
    }

    fn into_form(self) -> Result<multipart::Form, ApiError> {
        let image_part = multipart::Part::bytes(self.image)
            .file_name("wardrobe-item.jpg")
            .mime_str("image/jpeg")
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let mut form = multipart::Form::new().part("image", image_part);

        if let Some(category) = self.category {
            form = form.text("category", category.as_str());
        }

        if !self.tags.is_empty() {
            let tags = serde_json::to_string(&self.tags)
                .map_err(|e| ApiError::Decode(e.to_string()))?;
            form = form.text("tags", tags);
        }

        Ok(form)
    }
}

impl ApiClient {
    /// Upload a new wardrobe item for classification.
    pub async fn create_wardrobe_item(
        &self,
        item: NewWardrobeItem,
    ) -> Result<WardrobeItem, ApiError> {
        let form = item.into_form()?;
        self.post_multipart(WARDROBE_PATH, form).await
    }

    /// Fetch all wardrobe items.
    pub async fn wardrobe_items(&self) -> Result<Vec<WardrobeItem>, ApiError> {
        self.get_json(&format!("{}/list", WARDROBE_PATH)).await
    }

    /// Delete a wardrobe item by id.
    pub async fn delete_wardrobe_item(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("{}/{}", WARDROBE_PATH, id)).await
    }
}
