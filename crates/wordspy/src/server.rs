//! `WordspyServer`: loads static content, builds the router, and runs
//! the accept loop.

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;

use wordspy_room::RoomRegistry;
use wordspy_words::{NameGenerator, WordDeck};

use crate::{handler, http, ServerConfig, ServerError};

/// Shared state passed to every request handler.
pub struct AppState {
    pub registry: RoomRegistry,
    pub names: NameGenerator,
}

/// A Wordspy server bound to a listener and ready to run.
///
/// # Example
///
/// ```rust,no_run
/// use wordspy::{ServerConfig, WordspyServer};
///
/// # async fn run() -> Result<(), wordspy::ServerError> {
/// let server = WordspyServer::bind(ServerConfig::default()).await?;
/// server.run().await
/// # }
/// ```
pub struct WordspyServer {
    listener: TcpListener,
    router: Router,
}

impl WordspyServer {
    /// Loads static content, builds the router, and binds the listener.
    ///
    /// # Errors
    /// Fails if the word deck or name lists can't be loaded, the CORS
    /// origin is malformed, or the address can't be bound.
    pub async fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        let deck = WordDeck::load(&config.static_dir.join("word_list.json"))?;
        let names = NameGenerator::load(
            &config.static_dir.join("adjectives.txt"),
            &config.static_dir.join("nouns.txt"),
        )?;
        tracing::info!(
            words = deck.len(),
            static_dir = %config.static_dir.display(),
            "static content loaded"
        );

        let registry = RoomRegistry::new(Arc::new(deck), config.room.clone());
        let state = Arc::new(AppState { registry, names });
        let router = build_router(state, &config)?;

        let listener = TcpListener::bind(&config.bind_addr).await?;
        Ok(Self { listener, router })
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves connections until the process is terminated.
    pub async fn run(self) -> Result<(), ServerError> {
        axum::serve(self.listener, self.router).await?;
        Ok(())
    }
}

/// Assembles the router: the two HTTP endpoints, the game socket, CORS
/// for the browser client, and request tracing.
fn build_router(
    state: Arc<AppState>,
    config: &ServerConfig,
) -> Result<Router, ServerError> {
    let origin = config
        .allowed_origin
        .parse::<HeaderValue>()
        .map_err(|_| ServerError::InvalidOrigin(config.allowed_origin.clone()))?;

    // Credentials are allowed, so methods and headers mirror the
    // request instead of using a wildcard.
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    Ok(Router::new()
        .route("/create-room", post(http::create_room))
        .route("/room-status/:room_id", get(http::room_status))
        .route("/ws/game/:room_id", get(handler::ws_upgrade))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}
