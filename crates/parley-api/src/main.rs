use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use parley_api::{
    config::Config,
    connectors::parse_connectors,
    middleware::logging,
    routes::{catalog, health, messages, threads},
    state::AppState,
};
use parley_engine::{EngineConfig, TurnEngine};
use parley_model::{ModelClient, OpenAiModelClient};
use parley_store::StoreConfig;
use parley_tools::builtin_registry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load().map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    init_logging(&config);

    tracing::info!("Starting Parley API server");
    tracing::info!("Config loaded: {}:{}", config.server.host, config.server.port);

    let connectors = parse_connectors(&config.connectors.spec)?;
    if !connectors.is_empty() {
        tracing::info!(count = connectors.len(), "Connector catalog loaded");
    }

    tracing::info!("Initializing model client");
    let mut model_client = OpenAiModelClient::new(config.openai_api_key.clone())?;
    if let Some(base_url) = &config.model.base_url {
        model_client = model_client.with_base_url(base_url.clone());
    }
    let model_client: Arc<dyn ModelClient> = Arc::new(model_client);

    let registry = Arc::new(builtin_registry(&config.tools.faq_data_path));

    let store_config = match config.store.backend.as_str() {
        "mongo" => StoreConfig::Mongo {
            uri: config.mongodb_uri.clone(),
            database: config.store.database.clone(),
        },
        "memory" => StoreConfig::Memory,
        other => anyhow::bail!("Unknown store backend '{}': expected \"mongo\" or \"memory\"", other),
    };
    tracing::info!(backend = %config.store.backend, "Connecting thread store");
    let store = parley_store::connect(store_config).await?;

    let engine = Arc::new(TurnEngine::new(
        model_client,
        store.clone(),
        registry.clone(),
        EngineConfig {
            max_round_trips: config.engine.max_round_trips,
        },
    ));

    let state = Arc::new(AppState {
        config: Arc::new(config),
        store,
        registry,
        engine,
        connectors: Arc::new(connectors),
    });

    let app = build_router(state.clone());

    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health & catalog
        .route("/health", get(health::health_check))
        .route("/config", get(catalog::get_catalog))
        // Threads
        .route("/threads", post(threads::create_thread))
        .route("/threads", get(threads::list_threads))
        .route("/threads/:thread_id", get(threads::get_thread))
        .route("/threads/:thread_id", patch(threads::patch_thread))
        .route("/threads/:thread_id", delete(threads::delete_thread))
        // Turns
        .route("/threads/:thread_id/messages", post(messages::send_message));

    Router::new()
        .merge(api_routes)
        .layer(middleware::from_fn(logging::log_request))
        .layer(TimeoutLayer::new(std::time::Duration::from_secs(300)))
        .layer(CompressionLayer::new())
        .layer(build_cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    if config.cors.enabled {
        let cors = CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PATCH,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers(Any);

        if config.cors.origins.iter().any(|origin| origin == "*") {
            cors.allow_origin(Any)
        } else {
            let parsed_origins: Vec<axum::http::HeaderValue> = config
                .cors
                .origins
                .iter()
                .filter_map(|origin| origin.parse::<axum::http::HeaderValue>().ok())
                .collect();

            cors.allow_origin(parsed_origins)
        }
    } else {
        CorsLayer::permissive()
    }
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
