//! Huecast Example API Server
//!
//! Serves the palette endpoint the browser engine fetches from, the
//! per-client toggle endpoint, and the static demo page.
//!
//! ## Protocol
//!
//! ```json
//! GET  /api/theme          -> { "success": true, "colors": {...}, "styling_rules": {...} }
//! POST /api/theme/toggle   <- { "clientId": "..." }
//! ```
//!
//! The toggle flips a per-client boolean between the accessible
//! (cividis-derived) palette and the traditional one. The browser client
//! sends the toggle as a one-way notification and never reads the response;
//! it is returned anyway for curl and for future readable-channel clients.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use dashmap::DashMap;
use huecast_core::palette::{PaletteResponse, StylingRule};
use serde::Deserialize;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;

const LISTEN_PORT: u16 = 3030;

/// Shared application state
struct AppState {
    /// Per-client flag: true = accessible palette, false = traditional.
    /// Clients start accessible.
    accessible: DashMap<String, bool>,
}

impl AppState {
    fn new() -> Self {
        Self {
            accessible: DashMap::new(),
        }
    }

    /// Flip the client's palette and report the new setting.
    fn toggle(&self, client_id: &str) -> bool {
        let mut entry = self.accessible.entry(client_id.to_string()).or_insert(true);
        *entry = !*entry;
        *entry
    }
}

/// Toggle request body sent by the engine's CTA button.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ToggleRequest {
    client_id: String,
}

fn colors(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// The accessible palette: cividis-derived, distinguishable under the
/// common color vision deficiencies.
fn accessible_palette() -> BTreeMap<String, String> {
    colors(&[
        ("primary", "#00204c"),
        ("secondary", "#414d6b"),
        ("accent", "#bbaf71"),
        ("success", "#7f7c75"),
        ("warning", "#ffea46"),
        ("info", "#575d6d"),
        ("background", "#ffffff"),
        ("text", "#212529"),
        ("border", "#dee2e6"),
    ])
}

/// The traditional palette clients toggle back to.
fn traditional_palette() -> BTreeMap<String, String> {
    colors(&[
        ("primary", "#0d6efd"),
        ("secondary", "#6c757d"),
        ("accent", "#6610f2"),
        ("success", "#198754"),
        ("warning", "#ffc107"),
        ("info", "#0dcaf0"),
        ("background", "#ffffff"),
        ("text", "#212529"),
        ("border", "#dee2e6"),
    ])
}

/// Generate the styling rules for a palette. The engine guards every
/// selector so its own CTA button is never repainted by these.
fn styling_rules_for(palette: &BTreeMap<String, String>) -> BTreeMap<String, StylingRule> {
    let color = |key: &str| palette.get(key).cloned().unwrap_or_default();
    BTreeMap::from([
        (
            "buttons".to_string(),
            StylingRule {
                selector: "button, .btn, input[type=\"submit\"]".to_string(),
                background: color("primary"),
                text_color: "#ffffff".to_string(),
                border_color: Some(color("secondary")),
                description: Some("Primary action controls".to_string()),
            },
        ),
        (
            "links".to_string(),
            StylingRule {
                selector: "a".to_string(),
                background: "transparent".to_string(),
                text_color: color("primary"),
                border_color: None,
                description: Some("Inline links".to_string()),
            },
        ),
        (
            "panels".to_string(),
            StylingRule {
                selector: ".card, .panel, .alert".to_string(),
                background: color("background"),
                text_color: color("text"),
                border_color: Some(color("border")),
                description: Some("Content panels".to_string()),
            },
        ),
    ])
}

fn palette_response(palette: BTreeMap<String, String>) -> PaletteResponse {
    let styling_rules = styling_rules_for(&palette);
    PaletteResponse {
        success: true,
        colors: palette,
        styling_rules: Some(styling_rules),
    }
}

fn static_dir() -> String {
    std::env::var("HUECAST_STATIC_DIR")
        .unwrap_or_else(|_| "crates/huecast-server/static".to_string())
}

fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/theme", get(get_theme))
        .route("/api/theme/toggle", post(toggle_theme))
        .route("/health", get(health))
        .fallback_service(ServeDir::new(static_dir()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "huecast_server=info,tower_http=info".into()),
        )
        .init();

    let state = Arc::new(AppState::new());

    let addr = SocketAddr::from(([0, 0, 0, 0], LISTEN_PORT));
    info!("Huecast example server listening on {}", addr);
    info!("Palette endpoint: http://localhost:{}/api/theme", LISTEN_PORT);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app(state)).await.unwrap();
}

/// Palette endpoint: every client reads the accessible palette by default.
async fn get_theme() -> Json<PaletteResponse> {
    Json(palette_response(accessible_palette()))
}

/// Toggle endpoint: flip the caller's palette and return the one now
/// active.
async fn toggle_theme(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ToggleRequest>,
) -> Json<PaletteResponse> {
    let accessible = state.toggle(&request.client_id);
    info!(
        "client {} toggled to {}",
        request.client_id,
        if accessible { "accessible" } else { "traditional" }
    );
    let palette = if accessible {
        accessible_palette()
    } else {
        traditional_palette()
    };
    Json(palette_response(palette))
}

/// Health check
async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn toggle_request(client_id: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/theme/toggle")
            .header("content-type", "application/json")
            .body(Body::from(format!("{{\"clientId\":\"{client_id}\"}}")))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_get_theme_returns_accessible_palette() {
        let response = app(Arc::new(AppState::new()))
            .oneshot(
                Request::builder()
                    .uri("/api/theme")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["colors"]["primary"], "#00204c");
        assert_eq!(json["colors"]["warning"], "#ffea46");
        assert!(json["styling_rules"]["buttons"]["selector"].is_string());
    }

    #[tokio::test]
    async fn test_toggle_alternates_per_client() {
        let state = Arc::new(AppState::new());

        let first = app(state.clone()).oneshot(toggle_request("alice")).await.unwrap();
        let first_json = body_json(first).await;
        assert_eq!(first_json["colors"]["primary"], "#0d6efd");

        let second = app(state.clone()).oneshot(toggle_request("alice")).await.unwrap();
        let second_json = body_json(second).await;
        assert_eq!(second_json["colors"]["primary"], "#00204c");

        // A different client starts from its own state
        let other = app(state).oneshot(toggle_request("bob")).await.unwrap();
        let other_json = body_json(other).await;
        assert_eq!(other_json["colors"]["primary"], "#0d6efd");
    }

    #[tokio::test]
    async fn test_toggle_responses_carry_styling_rules() {
        let response = app(Arc::new(AppState::new()))
            .oneshot(toggle_request("carol"))
            .await
            .unwrap();
        let json = body_json(response).await;
        // Traditional palette rules are generated from the active palette
        assert_eq!(json["styling_rules"]["links"]["text_color"], "#0d6efd");
        assert_eq!(json["styling_rules"]["links"]["background"], "transparent");
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(Arc::new(AppState::new()))
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_wire_shape_matches_client_validation() {
        // The same types the engine validates must round-trip our payload.
        let value = serde_json::to_value(palette_response(accessible_palette())).unwrap();
        let parsed = huecast_core::palette::validate_response(value).unwrap();
        assert!(parsed.success);
        assert_eq!(parsed.colors["accent"], "#bbaf71");
        assert_eq!(parsed.styling_rules.unwrap().len(), 3);
    }
}
