use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use donor_match::config::{LogFormat, SessionBackend, Settings};
use donor_match::core::InvitationService;
use donor_match::routes::{self, handle_json_payload_error, handle_query_payload_error, AppState};
use donor_match::services::{EditStore, MemoryEditStore, PostgresClient, RedisEditStore};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Pretty => subscriber.pretty().init(),
        LogFormat::Full => subscriber.init(),
    }
}

fn startup_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    error!("{}: {}", context, err);
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    init_logging(&settings.logging.level, settings.logging.format);

    info!("Starting donor match service...");

    let postgres = Arc::new(
        PostgresClient::from_settings(
            &settings.database.url,
            settings.database.max_connections,
            settings.database.min_connections,
            settings.database.acquire_timeout_secs,
            settings.database.idle_timeout_secs,
        )
        .await
        .map_err(|e| startup_error("Failed to connect to PostgreSQL", e))?,
    );

    info!(
        "PostgreSQL client initialized (max: {} connections)",
        settings.database.max_connections.unwrap_or(10)
    );

    let edit_store: Arc<dyn EditStore> = match settings.session.backend {
        SessionBackend::Memory => {
            warn!("Pending donor edits are kept in memory and will be lost on restart");
            Arc::new(MemoryEditStore::new())
        }
        SessionBackend::Redis => {
            let store = RedisEditStore::new(&settings.session.redis_url)
                .await
                .map_err(|e| startup_error("Failed to connect to Redis", e))?;
            info!("Pending donor edits stored in Redis");
            Arc::new(store)
        }
    };

    let mut invitations = InvitationService::new(postgres.clone(), postgres, edit_store)
        .with_default_engagement(settings.matching.default_engagement);
    if let Some(seed) = settings.matching.random_seed {
        info!("Using fixed backfill seed {}", seed);
        invitations = invitations.with_seed(seed);
    }

    let app_state = AppState {
        invitations: Arc::new(invitations),
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
