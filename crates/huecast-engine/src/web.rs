//! WebAssembly bootstrap and page-level helpers.

use huecast_core::ThemeConfig;
use wasm_bindgen::prelude::*;

/// URL parameters recognized by the demo host page.
pub struct UrlOverrides {
    /// Palette endpoint override (e.g. "http://localhost:3030/api/theme")
    pub api: Option<String>,
    /// Enable debug logging
    pub debug: bool,
}

/// Parse URL query parameters for endpoint and debug overrides.
/// Supports formats like `?api=http://localhost:3030/api/theme&debug=1`
pub fn get_url_overrides() -> UrlOverrides {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return UrlOverrides { api: None, debug: false },
    };
    let location = window.location();

    let mut api = None;
    let mut debug = false;

    // Try query string first (?api=...&debug=1)
    if let Ok(search) = location.search() {
        let params = parse_params(&search);
        if api.is_none() {
            api = params.0;
        }
        debug = debug || params.1;
    }

    // Try hash fragment (#api=...&debug=1)
    if let Ok(hash) = location.hash() {
        let params = parse_params(&hash);
        if api.is_none() {
            api = params.0;
        }
        debug = debug || params.1;
    }

    UrlOverrides { api, debug }
}

/// Parse api and debug parameters from a query string or hash.
fn parse_params(s: &str) -> (Option<String>, bool) {
    // Remove leading ? or #
    let s = s.trim_start_matches(|c| c == '?' || c == '#');

    let mut api = None;
    let mut debug = false;

    for pair in s.split('&') {
        let mut parts = pair.splitn(2, '=');
        if let (Some(key), Some(value)) = (parts.next(), parts.next()) {
            if !value.is_empty() {
                match key {
                    "api" => api = Some(value.to_string()),
                    "debug" => debug = value == "1" || value == "true",
                    _ => {}
                }
            }
        }
    }

    (api, debug)
}

/// Default configuration with URL overrides folded in, as a plain object
/// ready to hand to the `ThemeEngine` constructor.
#[wasm_bindgen(js_name = configFromUrl)]
pub fn config_from_url() -> JsValue {
    let overrides = get_url_overrides();
    let mut config = ThemeConfig::default();
    if let Some(api) = overrides.api {
        config.api_endpoint = api;
    }
    config.debug = overrides.debug;

    serde_json::to_string(&config)
        .ok()
        .and_then(|json| js_sys::JSON::parse(&json).ok())
        .unwrap_or(JsValue::UNDEFINED)
}

/// Module bootstrap: panic hook and console logging. The host page still
/// constructs and owns the engine instance itself.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    let level = if get_url_overrides().debug {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    console_log::init_with_level(level).expect("Failed to initialize logger");

    log::info!("Huecast engine loaded");
}
