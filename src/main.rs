//! Gridtoe - N×N tic-tac-toe over HTTP.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod cli;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::{Cli, Command};
use gridtoe::{
    AppState, GameService, GameStore, MemoryGameStore, ServerConfig, SqliteGameStore, build_router,
    move_log,
};
use gridtoe_rules::detect;
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            config,
            host,
            port,
            db_path,
            memory,
        } => {
            let config = ServerConfig::load(config.as_deref())?.with_overrides(host, port, db_path);
            init_tracing(config.log_filter());
            serve(config, memory).await
        }
        Command::Migrate { config, db_path } => {
            let config = load_config(config, db_path)?;
            init_tracing(config.log_filter());
            migrate(&config)
        }
        Command::Show {
            id,
            config,
            db_path,
            step,
        } => {
            let config = load_config(config, db_path)?;
            init_tracing("warn");
            show(&config, id, step)
        }
    }
}

fn load_config(path: Option<PathBuf>, db_path: Option<String>) -> Result<ServerConfig> {
    Ok(ServerConfig::load(path.as_deref())?.with_overrides(None, None, db_path))
}

/// `RUST_LOG` wins over the configured filter.
fn init_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();
}

/// Run the HTTP game server until Ctrl-C or SIGTERM.
#[instrument(skip(config), fields(address = %config.address()))]
async fn serve(config: ServerConfig, memory: bool) -> Result<()> {
    let store: Arc<dyn GameStore> = if memory {
        warn!("Using in-memory store; games are lost on exit");
        Arc::new(MemoryGameStore::new())
    } else {
        Arc::new(
            SqliteGameStore::open(config.database_path())
                .context("Failed to open game database")?,
        )
    };

    let state = AppState::new(GameService::new(store));
    let app = build_router(state, config.cors_origin());

    let listener = tokio::net::TcpListener::bind(config.address())
        .await
        .with_context(|| format!("Failed to bind {}", config.address()))?;
    info!("Server listening on http://{}", config.address());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl-C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}

#[instrument(skip(config), fields(db_path = %config.database_path()))]
fn migrate(config: &ServerConfig) -> Result<()> {
    let store = SqliteGameStore::open(config.database_path())?;
    let pending = store.run_migrations()?;
    println!("Database ready at {} ({} pending migrations applied)", store.db_path(), pending);
    Ok(())
}

/// Print a stored game, optionally as it stood after `step` moves.
fn show(config: &ServerConfig, id: i32, step: Option<usize>) -> Result<()> {
    let store = SqliteGameStore::open(config.database_path())?;
    let Some(game) = store.find_game(id)? else {
        bail!("Game with ID {} not found", id);
    };
    let log = move_log(&store.moves(id)?)?;

    let shown = step.unwrap_or(log.len()).min(log.len());
    let board = log.board_at(game.board_size, shown)?;

    println!(
        "Game {} ({}, {} to win): {}",
        game.id,
        game.board_size,
        game.board_size.win_length(),
        game.status
    );
    println!("After move {} of {}:", shown, log.len());
    println!("{}", board.display());
    println!("Outcome: {}", detect(&board));
    if let Some(winner) = game.winner {
        println!("Recorded winner: {}", winner);
    }
    Ok(())
}
