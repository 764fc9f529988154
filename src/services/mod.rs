//! Board services: shared state and the HTTP API.
//!
//! - [`SharedDisplayState`] holds the one journey record, the derived view
//!   and the display session behind `Arc`, for handlers and background tasks.
//! - `web` feature: Axum-based HTTP server with JSON endpoints and the
//!   clock/animation loops.
//!
//! ```ignore
//! use std::sync::Arc;
//! use pis_board::services::{build_router, SharedDisplayState, WebServerConfig};
//!
//! let state = Arc::new(SharedDisplayState::new(source, SystemClock, &config)?);
//! let router = build_router(Arc::clone(&state), &WebServerConfig::from_config(&config.web));
//! ```

pub mod api;
pub mod shared;

#[cfg(feature = "web")]
pub mod web;

// Re-exports
pub use api::*;
pub use shared::*;

#[cfg(feature = "web")]
pub use web::*;
