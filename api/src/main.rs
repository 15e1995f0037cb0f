use api::routes::routes;
use api::services::gemini::GeminiGrader;
use api::services::sweep;
use api::state::AppState;
use axum::Router;
use chrono::Duration;
use db::connect;
use migration::Migrator;
use sea_orm_migration::MigratorTrait;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_appender::rolling;
use util::config;

#[tokio::main]
async fn main() {
    // Load configuration and initialize logging
    let _log_guard = init_logging(&config::log_file());

    // Set up dependencies
    let db = connect().await;
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    let grader = Arc::new(GeminiGrader::from_config());
    let app_state = AppState::new(db, grader);

    // Spawn the periodic reconciliation sweep, if configured
    spawn_reconciliation_sweeper(app_state.clone());

    // Configure middleware
    let cors = CorsLayer::very_permissive();

    // Build app router
    let app = Router::new()
        .nest("/api", routes(app_state.clone()))
        .layer(cors);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config::host(), config::port())
        .parse()
        .expect("Invalid address");

    println!(
        "Starting {} on http://{}:{}",
        config::project_name(),
        config::host(),
        config::port()
    );

    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Server crashed");
}

fn init_logging(log_file: &str) -> tracing_appender::non_blocking::WorkerGuard {
    use std::fs;
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    fs::create_dir_all("logs").ok();

    let file_appender = rolling::daily("logs", log_file);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true);

    let log_to_stdout = config::log_to_stdout();

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_target(true)
        .with_thread_ids(true);

    let env_filter =
        EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new("api=info"));

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer);

    if log_to_stdout {
        registry.with(stdout_layer).init();
    } else {
        registry.init();
    }

    guard
}

/// Periodically re-drives stuck submissions in the background. Disabled
/// when `SWEEP_INTERVAL_SECONDS` is 0; the admin reconcile endpoint can
/// always trigger a sweep by hand.
fn spawn_reconciliation_sweeper(app_state: AppState) {
    let interval_seconds = config::sweep_interval_seconds();
    if interval_seconds == 0 {
        tracing::info!("reconciliation sweeper disabled");
        return;
    }

    let db = app_state.db_clone();
    let grader = app_state.grader();

    tokio::spawn(async move {
        let interval = std::time::Duration::from_secs(interval_seconds);
        loop {
            tokio::time::sleep(interval).await;
            let older_than = Duration::minutes(config::sweep_older_than_minutes());
            let max_retries = config::sweep_max_retries();
            if let Err(e) = sweep::sweep(&db, grader.as_ref(), older_than, max_retries).await {
                tracing::error!(error = %e, "background reconciliation sweep failed");
            }
        }
    });
}
