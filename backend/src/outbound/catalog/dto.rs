//! DTOs for decoding token endpoint and catalog JSON.
//!
//! Bodies are decoded into these transport shapes first and then mapped into
//! domain records, so presence checks live in one place.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::{EpisodeSummary, ShowId, ShowRecord};

#[derive(Debug, Deserialize)]
pub(super) struct TokenResponseDto {
    pub(super) access_token: Option<String>,
    pub(super) error: Option<String>,
    pub(super) error_description: Option<String>,
}

impl TokenResponseDto {
    /// Provider's explanation for a missing token, most specific first.
    pub(super) fn rejection_reason(&self) -> String {
        self.error_description
            .clone()
            .or_else(|| self.error.clone())
            .unwrap_or_else(|| "response did not include an access token".to_owned())
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ShowDto {
    name: String,
    #[serde(default)]
    description: String,
    publisher: String,
    #[serde(default)]
    images: Vec<ImageDto>,
    id: String,
}

#[derive(Debug, Deserialize)]
struct ImageDto {
    url: String,
}

impl ShowDto {
    pub(super) fn into_record(self) -> Result<ShowRecord, String> {
        let id = ShowId::new(&self.id).map_err(|err| format!("show id {:?}: {err}", self.id))?;
        Ok(ShowRecord {
            name: self.name,
            description: self.description,
            publisher: self.publisher,
            image_url: self.images.into_iter().next().map(|image| image.url),
            id,
        })
    }
}

#[derive(Debug, Deserialize)]
struct EpisodeDto {
    name: String,
    #[serde(default)]
    description: String,
}

/// Whether a decoded show body is the provider's error envelope.
pub(super) fn is_error_envelope(body: &Value) -> bool {
    body.get("error").is_some()
}

/// Extract the `items` page, or `None` when the key is absent or null.
///
/// Null entries inside the page are skipped.
pub(super) fn episode_items(body: &Value) -> Result<Option<Vec<EpisodeSummary>>, String> {
    let Some(items) = body.get("items").filter(|items| !items.is_null()) else {
        return Ok(None);
    };
    let decoded: Vec<Option<EpisodeDto>> =
        serde_json::from_value(items.clone()).map_err(|err| format!("invalid items: {err}"))?;
    Ok(Some(
        decoded
            .into_iter()
            .flatten()
            .map(|episode| EpisodeSummary {
                name: episode.name,
                description: episode.description,
            })
            .collect(),
    ))
}
