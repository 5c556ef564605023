//! Blood Donation Backend - donor registrations, blood requests and contact
//! messages over a MongoDB store.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod routes;
pub mod state;

use axum::{
    http::{header, Method},
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::config::{AppConfig, Environment};
use crate::error::StartupError;
use crate::state::AppState;

/// Request bodies over 1 MB are refused before reaching a handler.
const BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// CORS policy: the configured allow-list when there is one, any origin
/// otherwise.
pub fn configure_cors(config: &AppConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if config.allowed_origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(config.allowed_origins.clone())
    }
}

/// Create and configure the application router.
pub fn create_app(state: AppState, config: &AppConfig) -> Router {
    let api = Router::new()
        .route(
            "/api/donors",
            get(routes::donors::list_donors).post(routes::donors::create_donor),
        )
        .route(
            "/api/requests",
            get(routes::requests::list_requests).post(routes::requests::create_request),
        )
        .route(
            "/api/contact",
            get(routes::contact::list_messages).post(routes::contact::create_message),
        )
        .route("/api/health", get(routes::health::health_ping))
        .with_state(state);

    let app = if config.environment.is_production() {
        tracing::info!(dist = %config.frontend_dist.display(), "serving frontend bundle");
        api.merge(routes::frontend::router(&config.frontend_dist))
    } else {
        api.route("/", get(routes::health::root_status))
            .fallback(routes::not_found)
    };

    let cors = configure_cors(config);
    tracing::info!("CORS configured");

    app.layer(logging::middleware::propagate_request_id_layer())
        .layer(middleware::from_fn(logging::middleware::log_request))
        .layer(logging::middleware::request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .layer(cors)
}

/// Run the server (used by main). Returns only on a fatal error, which has
/// already been logged.
pub async fn run() -> Result<(), StartupError> {
    let environment = Environment::from_env();

    // Production reads its settings from the real environment only.
    if !environment.is_production() {
        dotenvy::dotenv().ok();
    }

    // Guards MUST be held for the programme's lifetime; dropping them early
    // shuts down background log-writer threads and loses buffered log lines.
    let _log_guards = logging::init(&logging::config::LogConfig::from_env(environment));

    routes::health::init_start_time();

    let result = serve().await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "FATAL: server stopped");
    }
    result
}

async fn serve() -> Result<(), StartupError> {
    let config = AppConfig::from_env()?;

    let database = db::mongo::connect(&config.mongo).await?;
    let state = AppState::from_database(&database).await?;

    let app = create_app(state, &config);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;
    tracing::info!("Starting server on {}", addr);

    axum::serve(listener, app).await.map_err(StartupError::Serve)
}
