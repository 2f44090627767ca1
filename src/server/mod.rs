use std::net::Ipv4Addr;
use std::sync::Arc;

use anyhow::Result;
use axum::routing::{get, put};
use axum::Router;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{info, Level};
use url::Url;
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::database::Database;
use crate::notify::{NoopNotifier, Notifier, WebhookNotifier};
use crate::tracker::manager::IssueManager;

mod handlers;

pub struct Server {
    pub address: Ipv4Addr,
    pub port: u16,
    default_owner_id: Uuid,
    notify_webhook_url: Option<Url>,

    db: Arc<Database>,
}

#[derive(Clone)]
pub struct AppState {
    manager: Arc<IssueManager>,
}

impl Server {
    pub async fn new(config: &ServerConfig) -> Result<Self> {
        // Validate the configuration
        config.validate()?;

        let db = Database::connect(&config.database_url, 10)
            .await?
            .migrate(&config.migrations_path)
            .await?;

        Ok(Server {
            address: config.address,
            port: config.port,
            default_owner_id: config.default_owner_id,
            notify_webhook_url: config.notify_webhook_url.clone(),
            db: Arc::new(db),
        })
    }

    pub async fn start(&self) -> Result<()> {
        let notifier: Arc<dyn Notifier> = match &self.notify_webhook_url {
            Some(url) => Arc::new(WebhookNotifier::new(url.clone())),
            None => Arc::new(NoopNotifier),
        };
        let manager = IssueManager::new(self.db.clone(), notifier, self.default_owner_id);

        // Create the TCP listener
        let listener = tokio::net::TcpListener::bind((self.address, self.port)).await?;
        info!("Server started on {}", listener.local_addr()?);

        // Listen for incoming connections and serve the Axum router
        axum::serve(
            listener,
            get_router(AppState {
                manager: Arc::new(manager),
            }),
        )
        .await?;

        Ok(())
    }
}

/// Creates the Axum router with the necessary routes and middleware.
fn get_router(state: AppState) -> Router {
    let cors = tower_http::cors::CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any);

    Router::new()
        .route("/", get(handlers::health))
        .route(
            "/issues",
            get(handlers::issue::index).post(handlers::issue::create),
        )
        .route(
            "/issues/{id}",
            get(handlers::issue::show).delete(handlers::issue::destroy),
        )
        .route("/issues/{id}/status", put(handlers::issue::update_status))
        .route(
            "/issues/{id}/start-downtime",
            put(handlers::issue::toggle_downtime),
        )
        .route(
            "/categories",
            get(handlers::category::index).post(handlers::category::create),
        )
        .route(
            "/categories/{id}",
            put(handlers::category::update).delete(handlers::category::destroy),
        )
        .route("/users", get(handlers::user::index))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(tower_http::LatencyUnit::Micros),
                ),
        )
        .layer(cors)
        .with_state(state)
}
