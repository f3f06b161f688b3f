use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use agorhour_api::config::{ApiConfig, CorsConfig, StoreBackend};
use agorhour_api::handlers::AppState;
use agorhour_api::hour::SystemClock;
use agorhour_api::routes::configure_routes;
use agorhour_api::service::QuestionService;
use agorhour_api::storage::{PostgrestStore, QuestionStore, SqliteStore};
use anyhow::Context;
use clap::Parser;
use moderation_sdk::openai::OpenAIModerationClient;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "agorhour-api", about = "Question-of-the-hour backend", version)]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = ApiConfig::load(args.config.as_deref()).context("Invalid configuration")?;
    let timeout = Duration::from_secs(config.http.timeout_secs);

    let store = build_store(&config, timeout)?;

    let api_key = config.moderation.api_key.clone().unwrap_or_default();
    let moderation = OpenAIModerationClient::new(api_key)?
        .with_base_url(&config.moderation.base_url)
        .with_model(&config.moderation.model)
        .with_timeout(timeout)?;

    let service = QuestionService::new(store, Arc::new(moderation), Arc::new(SystemClock), timeout);
    info!(
        store = service.store_backend(),
        moderation = service.moderation_provider(),
        model = %config.moderation.model,
        "Services ready"
    );

    let state = web::Data::new(AppState::new(service));
    let cors_config = config.cors.clone();
    let bind_addr = config.bind_addr();
    info!("Starting agorhour-api server at http://{}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .wrap(build_cors(&cors_config))
            .app_data(state.clone())
            .configure(configure_routes)
    })
    .bind(&bind_addr)
    .with_context(|| format!("Failed to bind {bind_addr}"))?
    .run()
    .await?;

    Ok(())
}

fn build_store(config: &ApiConfig, timeout: Duration) -> anyhow::Result<Arc<dyn QuestionStore>> {
    match config.store.backend {
        StoreBackend::Sqlite => {
            info!("Using SQLite store at {}", config.store.path.display());
            Ok(Arc::new(SqliteStore::open(&config.store.path)?))
        }
        StoreBackend::Postgrest => {
            let url = config
                .store
                .url
                .clone()
                .context("SUPABASE_URL is not set")?;
            let key = config
                .store
                .service_key
                .clone()
                .context("SUPABASE_SERVICE_ROLE is not set")?;
            info!("Using PostgREST store at {}", url);
            Ok(Arc::new(PostgrestStore::new(url, key, timeout)?))
        }
    }
}

fn build_cors(config: &CorsConfig) -> Cors {
    if config.allowed_origins.iter().any(|origin| origin == "*") {
        return Cors::permissive();
    }

    config
        .allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allow_any_method()
        .allow_any_header()
        .max_age(3600)
}
