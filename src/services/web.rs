//! Axum-based HTTP server for the passenger information board.
//!
//! Provides REST endpoints for:
//! - GET `/api/train` - Current journey record
//! - PUT `/api/train` - Replace the whole record
//! - POST `/api/train/reload` - Reseed the record from its source
//! - POST `/api/controls` - Apply a developer command
//! - GET `/api/display` - Derived view plus animation frame
//! - GET `/` - Board page (serves index.html)

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use log::{error, info, warn};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tower_http::cors::{Any, CorsLayer};

use crate::config::{Config, WebConfig};
use crate::controls::DevCommand;
use crate::journey::JourneyState;

use super::api::{ApiResponse, ControlResponse, DisplayResponse, FETCH_TRAIN_ERROR};
use super::shared::{SharedDisplayState, StateError};

const INDEX_HTML: &str = include_str!("../../www/index.html");

type ApiResult<T> = (StatusCode, Json<ApiResponse<T>>);

fn ok<T>(data: T) -> ApiResult<T> {
    (StatusCode::OK, Json(ApiResponse::ok(data)))
}

fn fail<T>(status: StatusCode, message: impl Into<String>) -> ApiResult<T> {
    (status, Json(ApiResponse::err(message)))
}

/// Status code for a state failure.
pub fn status_for(err: &StateError) -> StatusCode {
    match err {
        StateError::Invalid(_) | StateError::Control(_) => StatusCode::BAD_REQUEST,
        StateError::Poisoned | StateError::Source(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /api/train - Returns the current journey record
async fn get_train(State(state): State<Arc<SharedDisplayState>>) -> ApiResult<JourneyState> {
    match state.journey() {
        Ok(journey) => ok(journey),
        Err(e) => {
            error!("GET /api/train: {}", e);
            fail(StatusCode::INTERNAL_SERVER_ERROR, FETCH_TRAIN_ERROR)
        }
    }
}

/// PUT /api/train - Replace the whole record
///
/// Accepts a complete journey document in the same shape `GET` returns.
async fn put_train(
    State(state): State<Arc<SharedDisplayState>>,
    body: Bytes,
) -> ApiResult<JourneyState> {
    let journey: JourneyState = match serde_json::from_slice(&body) {
        Ok(journey) => journey,
        Err(e) => {
            warn!("PUT /api/train: unreadable body: {}", e);
            return fail(StatusCode::BAD_REQUEST, format!("Invalid train data: {}", e));
        }
    };

    match state.replace_state(journey.clone()) {
        Ok(()) => ok(journey),
        Err(e) => fail(status_for(&e), e.to_string()),
    }
}

/// POST /api/train/reload - Reseed from the configured source
async fn reload_train(State(state): State<Arc<SharedDisplayState>>) -> ApiResult<JourneyState> {
    match state.reload() {
        Ok(journey) => ok(journey),
        Err(e) => fail(status_for(&e), e.to_string()),
    }
}

/// POST /api/controls - Apply a developer command
///
/// Accepts JSON such as `{"action": "next_stop"}` or
/// `{"action": "set_delay", "minutes": 5}`.
async fn post_control(
    State(state): State<Arc<SharedDisplayState>>,
    body: Bytes,
) -> ApiResult<ControlResponse> {
    let command: DevCommand = match serde_json::from_slice(&body) {
        Ok(command) => command,
        Err(e) => {
            warn!("POST /api/controls: unreadable command: {}", e);
            return fail(StatusCode::BAD_REQUEST, format!("Invalid command: {}", e));
        }
    };

    match state.apply_command(&command) {
        Ok(journey) => ok(ControlResponse {
            action: command.name().to_string(),
            state: journey,
        }),
        Err(e) => fail(status_for(&e), e.to_string()),
    }
}

/// GET /api/display - Derived view and animation frame
async fn get_display(State(state): State<Arc<SharedDisplayState>>) -> ApiResult<DisplayResponse> {
    let result = state
        .view()
        .and_then(|view| state.frame().map(|frame| DisplayResponse { view, frame }));
    match result {
        Ok(display) => ok(display),
        Err(e) => {
            error!("GET /api/display: {}", e);
            fail(status_for(&e), e.to_string())
        }
    }
}

/// Fallback handler for 404
async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::err("Not found")),
    )
}

// ============================================================================
// Server Builder
// ============================================================================

/// Configuration for the web server
#[derive(Debug, Clone)]
pub struct WebServerConfig {
    /// `host:port` to bind to
    pub bind_addr: String,
    /// Whether to enable CORS for all origins
    pub cors_permissive: bool,
    /// Polling interval the board page uses (milliseconds)
    pub poll_interval_ms: u32,
}

impl Default for WebServerConfig {
    fn default() -> Self {
        Self::from_config(&WebConfig::default())
    }
}

impl WebServerConfig {
    /// Create a new config with the given address
    pub fn new(bind_addr: impl Into<String>) -> Self {
        Self {
            bind_addr: bind_addr.into(),
            ..Default::default()
        }
    }

    /// Set whether CORS should be permissive
    pub fn cors(mut self, permissive: bool) -> Self {
        self.cors_permissive = permissive;
        self
    }

    /// Create from shared WebConfig
    pub fn from_config(config: &WebConfig) -> Self {
        Self {
            bind_addr: config.bind_addr(),
            cors_permissive: config.cors_permissive,
            poll_interval_ms: config.poll_interval_ms,
        }
    }
}

/// Build the Axum router with all routes
pub fn build_router(state: Arc<SharedDisplayState>, config: &WebServerConfig) -> Router {
    let page = INDEX_HTML.replace("{{POLL_INTERVAL_MS}}", &config.poll_interval_ms.to_string());

    let mut router = Router::new()
        // API routes
        .route("/api/train", get(get_train).put(put_train))
        .route("/api/train/reload", post(reload_train))
        .route("/api/controls", post(post_control))
        .route("/api/display", get(get_display))
        // Board page
        .route("/", get(move || async move { Html(page) }))
        // Fallback
        .fallback(not_found)
        .with_state(state);

    // Add CORS if requested
    if config.cors_permissive {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    router
}

// ============================================================================
// Background Tasks
// ============================================================================

/// Re-derive the view every `tick_ms`.
pub fn spawn_clock_loop(state: Arc<SharedDisplayState>, tick_ms: u64) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(tick_ms.max(1)));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            if let Err(e) = state.tick() {
                error!("clock tick failed: {}", e);
            }
        }
    })
}

/// Step the display session roughly once per frame.
pub fn spawn_animation_loop(state: Arc<SharedDisplayState>, frame_ms: u64) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(frame_ms.max(1)));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut last_ms = state.now_ms();
        loop {
            interval.tick().await;
            let now_ms = state.now_ms();
            if let Err(e) = state.advance_animation(now_ms.saturating_sub(last_ms)) {
                error!("animation step failed: {}", e);
            }
            last_ms = now_ms;
        }
    })
}

/// Start the web server with shared state
///
/// This function blocks until the server is shut down. The clock and
/// animation loops are not started here; see [`run`].
pub async fn run_server_with_state(
    state: Arc<SharedDisplayState>,
    config: WebServerConfig,
) -> Result<(), std::io::Error> {
    let router = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("board listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router).await
}

/// Start the background loops and serve until shut down.
pub async fn run(state: Arc<SharedDisplayState>, config: &Config) -> Result<(), std::io::Error> {
    let clock = spawn_clock_loop(Arc::clone(&state), config.display.clock_tick_ms);
    let animation = spawn_animation_loop(Arc::clone(&state), config.animation.frame_ms);

    let result = run_server_with_state(Arc::clone(&state), WebServerConfig::from_config(&config.web)).await;

    clock.abort();
    animation.abort();
    if let Err(e) = state.shutdown() {
        warn!("display session shutdown: {}", e);
    }
    result
}
