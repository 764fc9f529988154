//! Board configuration.
//!
//! Every setting has a default, so `Config::default()` runs the demo board.
//! [`Config::load`] layers an optional TOML file and `PIS_*` environment
//! variables on top (nested keys use a double underscore, e.g.
//! `PIS_WEB__PORT=3000` or `PIS_DISPLAY__ALWAYS_SHOW_CONNECTIONS=true`).
//!
//! # Example
//!
//! ```rust
//! use pis_board::config::{Config, DisplayConfig, WebConfig};
//!
//! // Use defaults
//! let config = Config::default();
//! assert!(!config.display.always_show_connections);
//!
//! // Or customize
//! let config = Config::default()
//!     .with_web(WebConfig::default().with_port(3000))
//!     .with_display(DisplayConfig::default().with_always_show_connections(true));
//! assert_eq!(config.web.port, 3000);
//! ```

use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::timing::VisibilityOptions;

/// File stem looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_NAME: &str = "pis-board";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "PIS";

// ============================================================================
// Main Config
// ============================================================================

/// Complete application configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration
    pub web: WebConfig,
    /// Derived-view behaviour
    pub display: DisplayConfig,
    /// Animator timing
    pub animation: AnimationConfig,
    /// Simulated layout metrics for the animators
    pub layout: LayoutConfig,
    /// Where the journey record comes from
    pub source: SourceConfig,
    /// Logging
    pub log: LogConfig,
}

impl Config {
    /// Load defaults, then the config file, then `PIS_*` environment variables.
    ///
    /// With `path` the file must exist; without it `pis-board.{toml,json,...}`
    /// in the working directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        builder = match path {
            Some(path) => {
                info!("loading config from {}", path.display());
                builder.add_source(config::File::from(path).required(true))
            }
            None => builder.add_source(config::File::with_name(DEFAULT_CONFIG_NAME).required(false)),
        };
        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        settings.try_deserialize()
    }

    /// Set web configuration
    pub fn with_web(mut self, web: WebConfig) -> Self {
        self.web = web;
        self
    }

    /// Set display configuration
    pub fn with_display(mut self, display: DisplayConfig) -> Self {
        self.display = display;
        self
    }

    /// Set animation configuration
    pub fn with_animation(mut self, animation: AnimationConfig) -> Self {
        self.animation = animation;
        self
    }

    /// Set layout configuration
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Set source configuration
    pub fn with_source(mut self, source: SourceConfig) -> Self {
        self.source = source;
        self
    }

    /// Set logging configuration
    pub fn with_log(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }
}

// ============================================================================
// Web Config
// ============================================================================

/// Web server configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Address to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Whether to enable CORS for all origins
    pub cors_permissive: bool,
    /// Polling interval hint for the board page (milliseconds)
    pub poll_interval_ms: u32,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_permissive: true,
            poll_interval_ms: 250,
        }
    }
}

impl WebConfig {
    /// Set the bind address
    pub fn with_host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    /// Set the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set CORS permissiveness
    pub fn with_cors(mut self, permissive: bool) -> Self {
        self.cors_permissive = permissive;
        self
    }

    /// `host:port` string for binding
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// ============================================================================
// Display Config
// ============================================================================

/// Derived-view behaviour
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Show connections regardless of the arrival countdown
    pub always_show_connections: bool,
    /// Clock sampling period (milliseconds)
    pub clock_tick_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            always_show_connections: false,
            clock_tick_ms: 1000,
        }
    }
}

impl DisplayConfig {
    /// Set the connections override
    pub fn with_always_show_connections(mut self, always: bool) -> Self {
        self.always_show_connections = always;
        self
    }

    /// Options handed to the visibility evaluator
    pub fn visibility(&self) -> VisibilityOptions {
        VisibilityOptions {
            always_show_connections: self.always_show_connections,
        }
    }
}

// ============================================================================
// Animation Config
// ============================================================================

/// Animator timing
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Frame interval (milliseconds)
    pub frame_ms: u64,
    /// Delay before the ticker starts moving
    pub ticker_start_delay_ms: u64,
    /// Ticker movement per frame (pixels)
    pub ticker_speed_px: f32,
    /// Delay before the first route scroll pass
    pub scroll_initial_delay_ms: u64,
    /// Period between route scroll passes
    pub scroll_cycle_ms: u64,
    /// Route scroll movement per frame while descending (pixels)
    pub scroll_speed_px: f32,
    /// Duration of the eased return to the top
    pub scroll_return_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            frame_ms: 16,
            ticker_start_delay_ms: 1000,
            ticker_speed_px: 1.5,
            scroll_initial_delay_ms: 10_000,
            scroll_cycle_ms: 45_000,
            scroll_speed_px: 0.3,
            scroll_return_ms: 800,
        }
    }
}

// ============================================================================
// Layout Config
// ============================================================================

/// Layout metrics used to size the simulated animations
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Footer container width (pixels)
    pub container_width_px: f32,
    /// Average rendered width of one ticker character (pixels)
    pub char_width_px: f32,
    /// Route list viewport height (pixels)
    pub viewport_height_px: f32,
    /// Height of one route list row (pixels)
    pub row_height_px: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            container_width_px: 1920.0,
            char_width_px: 17.0,
            viewport_height_px: 540.0,
            row_height_px: 150.0,
        }
    }
}

impl LayoutConfig {
    /// Rendered width of `text` in the ticker.
    pub fn text_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.char_width_px
    }

    /// Rendered height of `rows` route list rows.
    pub fn list_height(&self, rows: usize) -> f32 {
        rows as f32 * self.row_height_px
    }
}

// ============================================================================
// Source Config
// ============================================================================

/// Where the journey record comes from
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// JSON file to load; the built-in fixture when unset
    pub journey_file: Option<String>,
}

// ============================================================================
// Log Config
// ============================================================================

/// Logging
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Level filter: `error`, `warn`, `info`, `debug` or `trace`
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_board_timings() {
        let config = Config::default();
        assert_eq!(config.animation.ticker_start_delay_ms, 1000);
        assert_eq!(config.animation.scroll_initial_delay_ms, 10_000);
        assert_eq!(config.animation.scroll_cycle_ms, 45_000);
        assert_eq!(config.animation.scroll_return_ms, 800);
        assert_eq!(config.display.clock_tick_ms, 1000);
        assert_eq!(config.web.bind_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn load_from_toml_file_keeps_unset_defaults() {
        let path = std::env::temp_dir().join(format!("pis-board-config-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "[web]\nport = 3000\n\n[display]\nalways_show_connections = true\n",
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.web.port, 3000);
        assert!(config.display.always_show_connections);
        assert_eq!(config.web.host, "0.0.0.0");
        assert_eq!(config.animation, AnimationConfig::default());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let path = Path::new("/nonexistent/pis-board.toml");
        assert!(Config::load(Some(path)).is_err());
    }

    #[test]
    fn layout_sizes() {
        let layout = LayoutConfig::default();
        assert_eq!(layout.text_width("abcd"), 68.0);
        assert_eq!(layout.list_height(4), 600.0);
    }

    #[test]
    fn visibility_follows_flag() {
        let display = DisplayConfig::default().with_always_show_connections(true);
        assert!(display.visibility().always_show_connections);
    }
}
