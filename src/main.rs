pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod event;
pub mod media;
pub mod search;
pub mod ui;

use std::io::stdout;

use app::App;
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use cli::{Cli, CliCommand};
use config::load_config;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    // Initialize tracing (logs to stderr if RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        // No subcommand or explicit `tui` → launch the interactive TUI.
        None | Some(CliCommand::Tui) => run_tui().await,
        Some(cmd) => cli::run_command(cmd).await,
    }
}

/// Launch the interactive TUI.
async fn run_tui() -> color_eyre::Result<()> {
    let config = load_config();

    // Tolerate a missing key: searches then settle with a hint instead.
    let api_client = match cli::build_api_client() {
        Ok(client) => Some(client),
        Err(e) => {
            tracing::warn!("no API client: {e}");
            eprintln!("Warning: {e}. Searches will fail until it is set.");
            None
        }
    };

    let terminal = ratatui::init();
    // Mouse capture makes the header's reset control clickable.
    let result = match execute!(stdout(), EnableMouseCapture) {
        Ok(()) => App::new(config, api_client).run(terminal).await,
        Err(e) => Err(e.into()),
    };
    if let Err(e) = execute!(stdout(), DisableMouseCapture) {
        tracing::warn!("failed to disable mouse capture: {e}");
    }
    ratatui::restore();
    result
}
