//! Reelbase admin API server.
//!
//! `reelbase-server` serves the catalog admin API; `reelbase-server db
//! migrate` applies pending database migrations and exits.

use std::sync::Arc;

use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reelbase_core::database::PostgresDatabase;
use reelbase_core::storage::FsBlobStore;
use reelbase_server::{AppState, Config, routes};

#[derive(Parser, Debug)]
#[command(name = "reelbase-server")]
#[command(about = "Admin catalog API for the Reelbase VOD platform")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(ClapArgs, Debug, Clone)]
struct ServeArgs {
    /// Server host (overrides config)
    #[arg(long, env = "SERVER_HOST")]
    host: Option<String>,

    /// Server port (overrides config)
    #[arg(short, long, env = "SERVER_PORT")]
    port: Option<u16>,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(subcommand)]
    Db(DbCommand),
}

#[derive(Debug, Subcommand)]
enum DbCommand {
    /// Apply database migrations and exit
    Migrate,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(
                    "info,reelbase_server=debug,reelbase_core=debug",
                )
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    if let Some(command) = cli.command {
        match command {
            Command::Db(DbCommand::Migrate) => {
                run_db_migrate().await?;
                return Ok(());
            }
        }
    }

    run_server(cli.serve).await
}

async fn run_db_migrate() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let db = PostgresDatabase::connect(&config.database.url)
        .await
        .context("failed to connect to database")?;
    db.migrate().await.context("failed to apply migrations")?;
    info!("migrations applied");
    Ok(())
}

async fn run_server(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = Config::from_env()?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.ensure_directories()?;

    let db = PostgresDatabase::connect(&config.database.url)
        .await
        .context("failed to connect to database")?;
    db.migrate().await.context("failed to apply migrations")?;

    let store = Arc::new(FsBlobStore::new(config.storage.root.clone()));
    let state = AppState::new(db, store);
    let app = routes::router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "reelbase-server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to install ctrl-c handler");
    }
    info!("shutdown requested");
}
