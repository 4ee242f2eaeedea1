use serde::{Deserialize, Serialize};

use crate::media::ResultItem;

// ---------------------------------------------------------------------------
// Search response
// ---------------------------------------------------------------------------

/// Body of `GET /gifs/search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub data: Vec<Gif>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
    #[serde(default)]
    pub meta: Option<Meta>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub total_count: Option<u64>,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub offset: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub response_id: Option<String>,
}

/// Error bodies come in two shapes: `{"meta": {"msg": ..}}` and `{"message": ..}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub meta: Option<Meta>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.meta
            .and_then(|m| m.msg)
            .or(self.message)
            .filter(|m| !m.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Gif
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gif {
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Page on giphy.com, not the asset.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(default)]
    pub images: Images,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Images {
    #[serde(default)]
    pub original: Option<Rendition>,
}

/// GIPHY encodes the numeric fields as strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Rendition {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub mp4: Option<String>,
    #[serde(default)]
    pub width: Option<String>,
    #[serde(default)]
    pub height: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
}

impl Gif {
    /// The directly playable asset: the original mp4, else the original gif.
    pub fn media_url(&self) -> Option<&str> {
        let original = self.images.original.as_ref()?;
        original
            .mp4
            .as_deref()
            .or(original.url.as_deref())
            .filter(|u| !u.is_empty())
    }

    /// Convert into an accepted result, or `None` when nothing is playable.
    pub fn to_result_item(&self) -> Option<ResultItem> {
        let url = self.media_url()?;
        Some(ResultItem {
            id: self.id.clone(),
            url: url.to_string(),
            title: self.title.trim().to_string(),
            page_url: self.url.clone().filter(|u| !u.is_empty()),
        })
    }
}
