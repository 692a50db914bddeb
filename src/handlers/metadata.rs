use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;

use crate::{
    error::{AppError, AppResult},
    models::{FallbackMetadata, MetadataQuery, MetadataRequest, MetadataResponse},
    state::AppState,
};

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET, POST, OPTIONS";
pub const PREFLIGHT_ALLOW_METHODS: &str = "POST, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type";

impl IntoResponse for MetadataResponse {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [
                (header::ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW_ORIGIN),
                (header::ACCESS_CONTROL_ALLOW_METHODS, ALLOW_METHODS),
                (header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS),
            ],
            Json(self),
        )
            .into_response()
    }
}

// ── Handlers ───────────────────────────────────────────────────────────────

/// POST /metadata with `{ "url": "..." }`
///
/// Always answers 200. The body is parsed by hand so that malformed JSON or a
/// missing `url` land in the same fallback path as a failed fetch.
pub async fn post_metadata(State(state): State<AppState>, body: Bytes) -> MetadataResponse {
    let requested = serde_json::from_slice::<MetadataRequest>(&body)
        .map(|req| req.url)
        .map_err(|e| AppError::InvalidRequest(e.to_string()));

    lookup(&state, requested).await
}

/// GET /metadata?url=<encoded-url>
///
/// Same pipeline and response shape as the POST form.
pub async fn get_metadata(
    State(state): State<AppState>,
    query: Option<Query<MetadataQuery>>,
) -> MetadataResponse {
    let requested = query
        .and_then(|Query(q)| q.url)
        .ok_or_else(|| AppError::InvalidRequest("missing query parameter `url`".into()));

    lookup(&state, requested).await
}

/// OPTIONS /metadata (CORS preflight)
pub async fn preflight() -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW_ORIGIN),
            (header::ACCESS_CONTROL_ALLOW_METHODS, PREFLIGHT_ALLOW_METHODS),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS),
        ],
    )
}

async fn lookup(state: &AppState, requested: AppResult<String>) -> MetadataResponse {
    let url = match requested {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected metadata request");
            return FallbackMetadata::new(&e, None).into();
        }
    };

    match state.fetcher.fetch(&url).await {
        Ok(metadata) => metadata.into(),
        Err(e) => {
            tracing::warn!(error = %e, url = %url, "Metadata fetch failed, returning fallback");
            FallbackMetadata::new(&e, Some(&url)).into()
        }
    }
}
