use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::AppError;

/// Page metadata returned by `/metadata`.
///
/// Every field is always present. An empty string means "unknown"; a
/// non-empty `image` is an absolute URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub title: String,
    pub description: String,
    pub image: String,
}

/// `POST /metadata` body.
#[derive(Debug, Deserialize)]
pub struct MetadataRequest {
    pub url: String,
}

/// `GET /metadata?url=...` query.
#[derive(Debug, Default, Deserialize)]
pub struct MetadataQuery {
    pub url: Option<String>,
}

/// Best-effort payload sent with a 200 when fetching or parsing failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FallbackMetadata {
    pub error: String,
    pub title: String,
    pub description: String,
    pub image: String,
}

impl FallbackMetadata {
    /// The title falls back to the requested URL's hostname, or to an empty
    /// string when the URL is missing or does not parse.
    pub fn new(error: &AppError, requested_url: Option<&str>) -> Self {
        let title = requested_url
            .and_then(|u| Url::parse(u.trim()).ok())
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_default();

        FallbackMetadata {
            error: error.to_string(),
            title,
            description: String::new(),
            image: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MetadataResponse {
    Found(Metadata),
    Fallback(FallbackMetadata),
}

impl From<Metadata> for MetadataResponse {
    fn from(metadata: Metadata) -> Self {
        MetadataResponse::Found(metadata)
    }
}

impl From<FallbackMetadata> for MetadataResponse {
    fn from(fallback: FallbackMetadata) -> Self {
        MetadataResponse::Fallback(fallback)
    }
}
