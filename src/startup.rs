//! Application startup and lifecycle management.

use axum::{
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::AppError;
use crate::handlers::{devis, health, settings};
use crate::services::{DevisRepository, MongoDb, SettingsRepository};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: MongoDb,
    pub config: Config,
    pub settings: SettingsRepository,
    pub devis: DevisRepository,
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Connect to the store, prepare the repositories and bind the listener
    /// (port 0 binds a random port for tests).
    pub async fn build(config: Config) -> Result<Self, AppError> {
        let db = MongoDb::connect(&config.mongodb.uri, &config.mongodb.database).await?;
        db.initialize_indexes().await?;

        let state = AppState {
            settings: SettingsRepository::new(&db),
            devis: DevisRepository::new(&db),
            db,
            config: config.clone(),
        };

        let listener = TcpListener::bind((config.server.host.as_str(), config.server.port))
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to bind listener to {}:{}: {}",
                    config.server.host,
                    config.server.port,
                    e
                );
                AppError::from(e)
            })?;
        let port = listener.local_addr()?.port();

        tracing::info!("devis-service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn db(&self) -> &MongoDb {
        &self.state.db
    }

    pub fn router(state: AppState) -> Router {
        let api = Router::new()
            .route(
                "/company-settings",
                post(settings::upsert_settings).get(settings::get_settings),
            )
            .route("/devis", post(devis::create_devis).get(devis::list_devis))
            .route("/devis/:id", get(devis::get_devis))
            .route(
                "/devis/:id/convert-to-facture",
                put(devis::convert_to_facture),
            )
            .route("/factures", get(devis::list_factures));

        Router::new()
            .nest("/api", api)
            .route("/health", get(health::health_check))
            .route("/ready", get(health::readiness_check))
            .route("/metrics", get(health::metrics_endpoint))
            // Open to all origins; this service is not a security boundary.
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        version = ?request.version(),
                    )
                }),
            )
            .with_state(state)
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = Self::router(self.state);
        axum::serve(self.listener, router).await
    }
}
