use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use auraboard::application::reflection::ReflectionGenerator;
use auraboard::application::service::TaskService;
use auraboard::application::session_service::SessionService;
use auraboard::data::memory::InMemoryTaskRepository;
use auraboard::data::user_repository::InMemoryUserRepository;
use auraboard::infrastructure::config::AppConfig;
use auraboard::infrastructure::logging::init_logging;
use auraboard::presentation::handlers::AppState;
use auraboard::presentation::middleware::{RequestTracingMiddleware, SessionMiddleware};
use auraboard::presentation::routes::api_scope;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = AppConfig::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;

    init_logging(&config.log_level);
    info!(level = %config.log_level, "Logging initialized");

    if config.dev_sessions {
        warn!("Development sessions enabled: POST /api/auth/session issues tokens for any email");
    }

    let tasks = TaskService::new(
        Arc::new(InMemoryTaskRepository::new()),
        Arc::new(InMemoryUserRepository::new()),
    );
    let reflections = match config.reflection_seed {
        Some(seed) => {
            info!(seed, "Reflection generator seeded");
            ReflectionGenerator::with_seed(seed)
        }
        None => ReflectionGenerator::new(),
    };
    let sessions = Arc::new(SessionService::new(
        config.session_secret.clone(),
        config.session_ttl_secs,
    ));

    let state = web::Data::new(AppState {
        tasks,
        reflections,
        sessions: sessions.clone(),
    });
    info!("Application state initialized");

    let dev_sessions = config.dev_sessions;
    let cors_origin = config.cors_origin.clone();
    let server = HttpServer::new(move || {
        let cors = match &cors_origin {
            Some(origin) => Cors::default()
                .allowed_origin(origin)
                .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE"])
                .allow_any_header()
                .supports_credentials(),
            None => Cors::default(),
        };

        App::new()
            .app_data(state.clone())
            .wrap(SessionMiddleware::new(sessions.clone()))
            .wrap(cors)
            .wrap(RequestTracingMiddleware)
            .service(api_scope(dev_sessions))
    });

    let bind_addr = config.bind_address();
    let server = server.bind(&bind_addr)?;
    info!(
        address = %bind_addr,
        routes = %"GET /api/health, POST /api/reflection, GET|POST|PATCH|DELETE /api/tasks, GET /api/profile",
        "Starting HTTP server"
    );
    server.run().await
}
