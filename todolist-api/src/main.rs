//! # Todolist API Server
//!
//! REST service for users, their tasks, and the tags attached to those tasks.
//!
//! ## Usage
//!
//! ```bash
//! # Create the database if needed and apply pending migrations
//! cargo run -p todolist-api -- migrate
//!
//! # Start the server (add --migrate to apply migrations first)
//! cargo run -p todolist-api -- serve
//! ```

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use todolist_api::{
    app::{build_router, AppState},
    config::Config,
};
use todolist_shared::{
    db::{
        migrations::{ensure_database_exists, run_migrations},
        pool::{close_pool, create_pool, DatabaseConfig},
    },
    store::PgStore,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "todolist-api")]
#[command(about = "Todolist REST API server")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server (default)
    Serve {
        /// Apply pending migrations before accepting requests
        #[arg(long)]
        migrate: bool,
    },
    /// Create the database if missing and apply pending migrations, then exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "todolist_api=debug,todolist_shared=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("failed to load configuration")?;

    tracing::info!(
        "Todolist API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    match cli.command.unwrap_or(Commands::Serve { migrate: false }) {
        Commands::Migrate => migrate(&config).await,
        Commands::Serve { migrate } => serve(config, migrate).await,
    }
}

fn pool_config(config: &Config) -> DatabaseConfig {
    DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        timezone: Some(config.database.timezone.clone()),
        ..Default::default()
    }
}

async fn migrate(config: &Config) -> anyhow::Result<()> {
    let created = ensure_database_exists(&config.database.url)
        .await
        .context("failed to create database")?;
    if created {
        tracing::info!("Created an empty database");
    }

    let pool = create_pool(pool_config(config))
        .await
        .context("failed to connect to the database")?;

    let applied = run_migrations(&pool).await.context("migration failed")?;
    match applied.last() {
        Some(latest) => tracing::info!(
            applied = applied.len(),
            latest_version = latest,
            "Schema migrated"
        ),
        None => tracing::info!("Schema is already up to date"),
    }

    close_pool(pool).await;
    Ok(())
}

async fn serve(config: Config, migrate: bool) -> anyhow::Result<()> {
    let pool = create_pool(pool_config(&config))
        .await
        .context("failed to connect to the database")?;

    if migrate {
        run_migrations(&pool).await.context("migration failed")?;
    }

    let bind_address = config.bind_address();
    let state = AppState::new(Arc::new(PgStore::new(pool.clone())), config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {}", bind_address))?;

    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown signal received, closing connections...");
    close_pool(pool).await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
    }
}
