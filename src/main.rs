use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use lume_swipe::config::{LoggingSettings, Settings, StoreBackend};
use lume_swipe::core::{AgeRange, CandidateSelector};
use lume_swipe::error::{handle_json_payload_error, handle_path_error, handle_query_payload_error};
use lume_swipe::routes::{self, AppState};
use lume_swipe::services::{
    DatingService, DatingStore, HttpPaymentVerifier, MemoryStore, PaymentGate, PostgresStore,
    PromptCatalog,
};

fn init_tracing(logging: &LoggingSettings) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match logging.format.as_str() {
        "pretty" => subscriber.pretty().init(),
        "compact" => subscriber.compact().init(),
        _ => subscriber.json().init(),
    }
}

fn startup_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    error!("{}: {}", context, err);
    std::io::Error::other(format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return Err(std::io::Error::other(e.to_string()));
        }
    };

    init_tracing(&settings.logging);

    info!("Starting Lume swipe service...");

    let store: Arc<dyn DatingStore> = match settings.database.backend {
        StoreBackend::Postgres => {
            let store = PostgresStore::from_settings(&settings.database)
                .await
                .map_err(|e| startup_error("Failed to connect to PostgreSQL", e))?;
            info!(
                "PostgreSQL store initialized (max: {} connections)",
                settings.database.max_connections
            );
            Arc::new(store)
        }
        StoreBackend::Memory => {
            warn!("Using the in-memory store, data will not survive a restart");
            Arc::new(MemoryStore::new())
        }
    };

    let selector = CandidateSelector::new(
        AgeRange {
            min: settings.suggestions.default_min_age,
            max: settings.suggestions.default_max_age,
        },
        settings.suggestions.prompt_answer_limit,
    );
    let catalog = PromptCatalog::new(Duration::from_secs(settings.cache.prompt_ttl_secs));

    info!("Candidate selector initialized: {:?}", selector);

    let payment = if settings.payment.enabled {
        let verifier = HttpPaymentVerifier::new(
            &settings.payment.verifier_url,
            Duration::from_secs(settings.payment.timeout_secs),
        )
        .map_err(|e| startup_error("Failed to build payment verifier", e))?;

        info!(
            "Payment gate enabled ({:?} mode, verifier: {})",
            settings.payment.mode, settings.payment.verifier_url
        );

        Some(Arc::new(PaymentGate::from_settings(
            Arc::new(verifier),
            &settings.payment,
            Duration::from_secs(settings.cache.redeemed_signature_ttl_secs),
        )))
    } else {
        None
    };

    // Build application state
    let app_state = AppState {
        service: Arc::new(DatingService::new(store, selector, catalog)),
        payment,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .app_data(web::PathConfig::default().error_handler(handle_path_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
