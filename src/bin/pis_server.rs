//! Passenger information board server.
//!
//! Serves the board page and JSON API, ticks the clock once per second and
//! runs the footer ticker and route scroller at frame rate.
//!
//! # Usage
//!
//! ```bash
//! # Built-in demo run on 0.0.0.0:8080
//! cargo run --bin pis-server
//!
//! # Explicit config file (or set PIS_CONFIG)
//! cargo run --bin pis-server -- board.toml
//!
//! # Override single settings from the environment
//! PIS_WEB__PORT=3000 PIS_DISPLAY__ALWAYS_SHOW_CONNECTIONS=true cargo run --bin pis-server
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use log::info;
use pis_board::config::Config;
use pis_board::hal::SystemClock;
use pis_board::logging::setup_logging;
use pis_board::services::{self, SharedDisplayState};
use pis_board::{FileSource, FixtureSource};

/// Environment variable naming the config file when no argument is given.
const CONFIG_ENV: &str = "PIS_CONFIG";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(CONFIG_ENV).ok())
        .map(PathBuf::from);

    let config = Config::load(config_path.as_deref()).context("loading configuration")?;
    setup_logging(&config.log.level).context("installing logger")?;

    info!("pis-board {} starting", env!("CARGO_PKG_VERSION"));
    if config.display.always_show_connections {
        info!("connections panel forced visible");
    }

    let state = match &config.source.journey_file {
        Some(path) => SharedDisplayState::new(FileSource::new(path), SystemClock, &config),
        None => SharedDisplayState::new(FixtureSource, SystemClock, &config),
    }
    .context("loading journey")?;

    services::run(Arc::new(state), &config)
        .await
        .context("web server")?;
    Ok(())
}
