use std::error::Error as StdError;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use reqwest::dns::{Addrs, Name, Resolve, Resolving};
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::redirect::Policy;
use reqwest::{Client as ReqwestClient, ClientBuilder};
use tracing::debug;
use url::{Host, Url};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::extract::extract;
use crate::models::Metadata;

/// Sent on every outbound fetch; many sites block requests without a
/// browser-like agent.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (compatible; BookmarkManager/1.0)";
pub const BROWSER_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Same hop limit as reqwest's default redirect policy.
const MAX_REDIRECTS: usize = 10;

// ── Public helpers ─────────────────────────────────────────────────────────

/// Returns `true` if `ip` is a private, loopback, link-local or unspecified
/// address.
pub fn is_private_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            let o = v4.octets();
            matches!(
                o,
                [127, ..]
                    | [10, ..]
                    | [169, 254, ..]
                    | [192, 168, ..]
                    | [0, ..]
                    | [255, 255, 255, 255]
            ) || (o[0] == 172 && (16..=31).contains(&o[1]))
        }
        IpAddr::V6(v6) => {
            if let Some(v4) = v6.to_ipv4_mapped() {
                return is_private_ip(IpAddr::V4(v4));
            }
            v6.is_loopback()
                || v6.is_unspecified()
                || (v6.segments()[0] & 0xfe00 == 0xfc00)
                || (v6.segments()[0] & 0xffc0 == 0xfe80)
        }
    }
}

/// The host of `url` when it is a literal private address. Literal hosts are
/// connected to directly, without going through the resolver.
pub fn private_literal_host(url: &Url) -> Option<String> {
    match url.host()? {
        Host::Ipv4(ip) if is_private_ip(IpAddr::V4(ip)) => Some(ip.to_string()),
        Host::Ipv6(ip) if is_private_ip(IpAddr::V6(ip)) => Some(ip.to_string()),
        _ => None,
    }
}

/// Parse a requested URL and make sure it is something we can fetch.
pub fn parse_target(url: &str) -> AppResult<Url> {
    let parsed = Url::parse(url.trim())?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(AppError::UnsupportedScheme(other.to_string())),
    }
}

// ── Fetcher ────────────────────────────────────────────────────────────────

/// Fetches a page and runs the extractor over it.
///
/// Holds no per-request state; the inner client is shared and handles
/// connection reuse on its own.
#[derive(Clone)]
pub struct MetadataFetcher {
    client: ReqwestClient,
    block_private_networks: bool,
}

impl MetadataFetcher {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        Self::with_builder(ReqwestClient::builder(), config)
    }

    /// Apply `config` on top of a caller-supplied client builder.
    ///
    /// With `block_private_networks` every hostname lookup goes through
    /// [`PublicResolver`] and every redirect hop is checked for literal
    /// private addresses, so neither redirects nor a second DNS answer can
    /// reach a private target.
    pub fn with_builder(
        mut builder: ClientBuilder,
        config: &Config,
    ) -> Result<Self, reqwest::Error> {
        if let Some(timeout) = config.fetch_timeout {
            builder = builder.timeout(timeout);
        }

        if config.block_private_networks {
            builder = builder
                .dns_resolver(Arc::new(PublicResolver))
                .redirect(Policy::custom(|attempt| {
                    if attempt.previous().len() >= MAX_REDIRECTS {
                        return attempt.error("too many redirects");
                    }
                    match private_literal_host(attempt.url()) {
                        Some(host) => attempt.error(AppError::BlockedAddress(host)),
                        None => attempt.follow(),
                    }
                }));
        }

        Ok(MetadataFetcher {
            client: builder.build()?,
            block_private_networks: config.block_private_networks,
        })
    }

    /// GET `url` and extract its metadata, resolving relative images against
    /// `url` itself.
    pub async fn fetch(&self, url: &str) -> AppResult<Metadata> {
        let target = parse_target(url)?;

        if self.block_private_networks {
            if let Some(host) = private_literal_host(&target) {
                return Err(AppError::BlockedAddress(host));
            }
        }

        let response = self
            .client
            .get(target.clone())
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .header(ACCEPT, BROWSER_ACCEPT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream(status.as_u16()));
        }

        let html = response.text().await?;
        let metadata = extract(&html, url.trim());

        debug!(
            url = %target,
            title = %metadata.title,
            description = %metadata.description,
            image = %metadata.image,
            "Extracted metadata"
        );

        Ok(metadata)
    }
}

// ── Resolver ───────────────────────────────────────────────────────────────

/// DNS resolver that refuses names with any private address.
///
/// The check runs on the same answer the connection uses, so there is no
/// window between checking and connecting.
pub struct PublicResolver;

impl Resolve for PublicResolver {
    fn resolve(&self, name: Name) -> Resolving {
        Box::pin(resolve_public(name.as_str().to_string()))
    }
}

async fn resolve_public(host: String) -> Result<Addrs, Box<dyn StdError + Send + Sync>> {
    let addrs: Vec<SocketAddr> = tokio::net::lookup_host((host.as_str(), 0)).await?.collect();

    if addrs.iter().any(|addr| is_private_ip(addr.ip())) {
        return Err(Box::new(AppError::BlockedAddress(host)));
    }

    Ok(Box::new(addrs.into_iter()))
}
