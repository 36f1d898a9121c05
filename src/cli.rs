//! Command-line interface for gridtoe.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Gridtoe - N×N tic-tac-toe game server
#[derive(Parser, Debug)]
#[command(name = "gridtoe")]
#[command(about = "REST server for N×N tic-tac-toe", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve {
        /// TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Host to bind to (overrides config and HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides config and PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// SQLite database file (overrides config and DATABASE_PATH)
        #[arg(long)]
        db_path: Option<String>,

        /// Keep games in memory instead of SQLite
        #[arg(long, conflicts_with = "db_path")]
        memory: bool,
    },

    /// Apply pending database migrations
    Migrate {
        /// TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// SQLite database file
        #[arg(long)]
        db_path: Option<String>,
    },

    /// Print a stored game's board and outcome
    Show {
        /// Game id
        id: i32,

        /// TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// SQLite database file
        #[arg(long)]
        db_path: Option<String>,

        /// Show the board after this many moves
        #[arg(long)]
        step: Option<usize>,
    },
}
