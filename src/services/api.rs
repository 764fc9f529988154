//! API request and response types for the board's HTTP interface.

use serde::{Deserialize, Serialize};

use crate::display::DisplayView;
use crate::journey::JourneyState;
use crate::session::AnimationFrame;

/// Error text for a failed `GET /api/train`.
pub const FETCH_TRAIN_ERROR: &str = "Failed to fetch train data";

// ============================================================================
// Response Types
// ============================================================================

/// API response wrapper for consistent JSON structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful
    pub success: bool,
    /// Response data (present when success=true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error message (present when success=false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response with data
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Body of `GET /api/display`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayResponse {
    /// Panel content at the last tick
    pub view: DisplayView,
    /// Animation state
    pub frame: AnimationFrame,
}

/// Body of `POST /api/controls`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlResponse {
    /// Action that was applied
    pub action: String,
    /// Record after the command
    pub state: JourneyState,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::fixture_journey;

    #[test]
    fn ok_envelope_omits_error() {
        let json = serde_json::to_value(ApiResponse::ok(1u32)).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true, "data": 1 }));
    }

    #[test]
    fn err_envelope_omits_data() {
        let json = serde_json::to_value(ApiResponse::<()>::err(FETCH_TRAIN_ERROR)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "success": false, "error": "Failed to fetch train data" })
        );
    }

    #[test]
    fn journey_envelope_uses_camel_case() {
        let json = serde_json::to_value(ApiResponse::ok(fixture_journey())).unwrap();
        assert_eq!(json["data"]["trainNumber"], "ICE 621");
        assert_eq!(json["data"]["nextIndex"], 1);
    }

    #[test]
    fn control_response_serde() {
        let response = ControlResponse {
            action: "next_stop".into(),
            state: fixture_journey(),
        };
        let json = serde_json::to_string(&response).unwrap();
        let back: ControlResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(back.action, "next_stop");
        assert_eq!(back.state, fixture_journey());
    }
}
