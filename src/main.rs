// roster - searchable, sortable user table in the terminal
//
// Fetches a list of users from an HTTP endpoint once, then lets you filter
// it with a free-text query and sort it by column.
//
// Architecture:
// - Loader (reqwest): one GET on a background task, result sent back once
// - Directory: query/sort/source state cells and the derived view
// - TUI (ratatui): search box, sortable table, loading/error states
// - Headless: the same derived view printed to stdout

mod cli;
mod config;
mod headless;
mod logging;
mod tui;
mod users;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use config::{Config, VERSION};
use logging::LogBuffer;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config helpers exit before any logging or network setup
    if let Some(command) = &cli.command {
        if cli::handle_config_command(command) {
            return Ok(());
        }
    }

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();

    let mut config = Config::from_env();
    if let Some(endpoint) = cli.endpoint {
        config.endpoint = endpoint;
    }

    let list_options = cli.command.as_ref().and_then(|c| c.list_options());
    let tui_mode = config.enable_tui && list_options.is_none();

    // In TUI mode logs are captured to a buffer (prevents garbling the display)
    let log_buffer = LogBuffer::new();
    let _file_guard = logging::init(&config.logging, tui_mode, &log_buffer);

    tracing::info!("roster v{} loading users from {}", VERSION, config.endpoint);

    if tui_mode {
        tui::run_tui(config, log_buffer).await
    } else {
        headless::run(&config, list_options.unwrap_or_default()).await
    }
}
