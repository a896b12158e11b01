//! Outfit generation endpoints

use super::client::{ApiClient, ApiError};
use crate::structs::{Outfit, Season};
use serde::Serialize;

/// Body for `POST /api/outfits/generate`. All constraints are optional.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateOutfitRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occasion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<Season>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_colors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_items: Option<Vec<String>>,
}

impl ApiClient {
    /// Ask the backend for an AI-generated outfit suggestion.
    pub async fn generate_outfit(
        &self,
        request: &GenerateOutfitRequest,
    ) -> Result<Outfit, ApiError> {
        self.post_json("/api/outfits/generate", request).await
    }

    /// Fetch previously generated outfits.
    pub async fn outfits(&self) -> Result<Vec<Outfit>, ApiError> {
        self.get_json("/api/outfits").await
    }
}
