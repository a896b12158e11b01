//! Domain models shared across the API surface and the front-ends.
//!
//! Field names use serde rename to match the backend's camelCase wire format.

use serde::{Deserialize, Serialize};

/// Clothing category assigned by the backend classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClothingCategory {
    Top,
    Bottom,
    Shoes,
    Accessories,
    Outerwear,
    Dress,
    Undergarment,
}

impl ClothingCategory {
    /// Wire value, as sent in multipart form fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClothingCategory::Top => "top",
            ClothingCategory::Bottom => "bottom",
            ClothingCategory::Shoes => "shoes",
            ClothingCategory::Accessories => "accessories",
            ClothingCategory::Outerwear => "outerwear",
            ClothingCategory::Dress => "dress",
            ClothingCategory::Undergarment => "undergarment",
        }
    }
}

/// Season tag for wardrobe items and outfit generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
    AllSeason,
}

/// Backend-side processing state of an uploaded item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    Uploading,
    Processing,
    Completed,
    Failed,
}

/// A single classified clothing item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WardrobeItem {
    pub id: String,
    pub image_url: String,
    pub category: ClothingCategory,
    pub color: String,
    pub season: Season,
    pub status: ProcessingStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// An AI-generated outfit suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outfit {
    pub id: String,
    pub name: String,
    pub items: Vec<WardrobeItem>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub occasion: String,
    pub created_at: String,
}
