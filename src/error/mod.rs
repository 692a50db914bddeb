use std::error::Error as _;

use thiserror::Error;

/// Everything that can go wrong between receiving a metadata request and
/// handing HTML to the extractor.
///
/// None of these ever reach the caller as a failure status: the metadata
/// handler turns them into a 200 fallback payload whose `error` field is the
/// `Display` text below.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("URL resolves to a private or reserved address: {0}")]
    BlockedAddress(String),

    #[error("Failed to fetch URL: {0}")]
    Fetch(String),

    #[error("Failed to fetch URL: {0}")]
    Upstream(u16),
}

/// A private-address rejection raised inside the HTTP client (by the resolver
/// or the redirect policy) travels up as a source of the reqwest error.
impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        let blocked = std::iter::successors(e.source(), |&err| err.source()).find_map(|err| {
            match err.downcast_ref::<AppError>() {
                Some(AppError::BlockedAddress(host)) => Some(host.clone()),
                _ => None,
            }
        });
        if let Some(host) = blocked {
            return AppError::BlockedAddress(host);
        }

        match e.status() {
            Some(status) => AppError::Upstream(status.as_u16()),
            None => AppError::Fetch(e.to_string()),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
