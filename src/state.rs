use crate::fetch::MetadataFetcher;

/// Shared application state passed to all handlers.
///
/// Read-only after startup; requests never share mutable data.
#[derive(Clone)]
pub struct AppState {
    pub fetcher: MetadataFetcher,
}
