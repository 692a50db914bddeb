use tracing::info;
use tracing_subscriber::EnvFilter;

use bookmark_metadata::config::Config;
use bookmark_metadata::fetch::MetadataFetcher;
use bookmark_metadata::state::AppState;

#[tokio::main]
async fn main() {
    // Load configuration first so APP_ENV from .env decides the log format.
    let config = Config::from_env().expect("Failed to load configuration");

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("bookmark_metadata=info,tower_http=info"));

    if config.is_production {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    info!("🔖 Bookmark metadata service starting...");

    match config.fetch_timeout {
        Some(timeout) => info!("⏱️ Outbound fetch timeout: {:?}", timeout),
        None => info!("⏱️ Outbound fetch timeout: client default"),
    }
    if config.block_private_networks {
        info!("🔒 Private network targets are blocked");
    }

    let fetcher = MetadataFetcher::new(&config).expect("Failed to build HTTP client");
    let app = bookmark_metadata::app(AppState { fetcher });

    let addr = config.server_addr();
    info!("🎧 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .await
        .expect("Server failed to start");
}
