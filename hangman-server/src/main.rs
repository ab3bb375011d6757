use std::sync::Arc;
use std::time::Duration;

use tokio::signal;
use tracing::info;

use hangman_core::SessionStore;
use hangman_persistence::connection::connect_and_migrate;
use hangman_persistence::repositories::{
    CourseRepository, HistoryRepository, UserRepository, WordRepository,
};
use hangman_server::{
    auth::AuthService, config::Config, create_routes, game_service::GameService,
    statistics_service::StatisticsService,
};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting hangman server...");

    let config = Config::new();

    // Initialize database connection and run migrations
    let db = match connect_and_migrate().await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to connect to database and run migrations: {}", e);
            std::process::exit(1);
        }
    };

    let user_repository = Arc::new(UserRepository::new(db.clone()));
    let word_repository = Arc::new(WordRepository::new(db.clone()));
    let course_repository = Arc::new(CourseRepository::new(db.clone()));
    let history_repository = Arc::new(HistoryRepository::new(db));

    let session_store = Arc::new(SessionStore::new());

    let game_service = Arc::new(GameService::new(
        session_store.clone(),
        word_repository,
        user_repository.clone(),
        history_repository.clone(),
    ));
    let statistics_service = Arc::new(StatisticsService::new(
        history_repository,
        course_repository,
    ));
    let auth_service = Arc::new(AuthService::new(user_repository));

    let routes = create_routes(game_service, statistics_service, auth_service);

    // Start the idle-session reaper
    let reaper_store = session_store.clone();
    let idle_timeout = Duration::from_secs(config.session_idle_timeout_minutes * 60);
    let cleanup_interval = Duration::from_secs(config.cleanup_interval_seconds);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(cleanup_interval);
        loop {
            interval.tick().await;
            let removed = reaper_store.remove_idle(idle_timeout);
            if !removed.is_empty() {
                info!(
                    "Reaped {} idle game sessions ({} still live)",
                    removed.len(),
                    reaper_store.len()
                );
            }
        }
    });

    info!("Server starting on {}:{}", config.host, config.port);

    let addr = (
        config.host.parse::<std::net::IpAddr>().unwrap(),
        config.port,
    );

    let (addr, server) = warp::serve(routes).bind_with_graceful_shutdown(addr, async {
        // Wait for SIGINT (Ctrl+C) or SIGTERM
        #[cfg(unix)]
        {
            let mut sigint = signal::unix::signal(signal::unix::SignalKind::interrupt()).unwrap();
            let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate()).unwrap();

            tokio::select! {
                _ = sigint.recv() => {
                    info!("Received SIGINT, shutting down gracefully...");
                }
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, shutting down gracefully...");
                }
            }
        }

        #[cfg(not(unix))]
        {
            signal::ctrl_c().await.expect("Failed to listen for ctrl+c");
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    });

    info!(
        "Server started successfully on {}. Press Ctrl+C to stop.",
        addr
    );
    server.await;
    info!("Server shutdown complete.");
}
