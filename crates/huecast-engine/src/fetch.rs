//! Network paths: the palette fetch with abort-based timeouts and the
//! one-way toggle notification.

use std::cell::Cell;
use std::rc::Rc;

use huecast_core::palette::{self, PaletteResponse};
use huecast_core::{ThemeConfig, ThemeError, ThemeResult};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortController, Request, RequestInit, RequestMode, Response, Window};

/// Per-attempt time limit. Enforced via `AbortController`, not a flag.
pub const FETCH_TIMEOUT_MS: i32 = 10_000;

fn transport(context: &str, err: &JsValue) -> ThemeError {
    ThemeError::Transport(format!("{context}: {err:?}"))
}

/// Fetch and validate the palette, retrying transport failures.
///
/// Attempts run strictly sequentially with a fixed delay between them. A
/// validation failure is surfaced immediately: retrying will not change a
/// malformed payload. On terminal failure the last error is returned; this
/// layer never substitutes fallback colors.
pub async fn fetch_palette(config: &ThemeConfig) -> ThemeResult<PaletteResponse> {
    let attempts = config.effective_attempts();
    let mut last_error = ThemeError::Transport("no attempt was made".to_string());

    for attempt in 1..=attempts {
        match fetch_once(&config.api_endpoint, config.debug).await {
            Ok(value) => return palette::validate_response(value),
            Err(err) if !err.is_retryable() => return Err(err),
            Err(err) => {
                log::warn!("palette fetch attempt {attempt}/{attempts} failed: {err}");
                last_error = err;
                if attempt < attempts {
                    sleep_ms(config.retry_delay_for(attempt)).await;
                }
            }
        }
    }

    Err(last_error)
}

async fn fetch_once(endpoint: &str, debug: bool) -> ThemeResult<serde_json::Value> {
    let window =
        web_sys::window().ok_or_else(|| ThemeError::Dom("no window object".to_string()))?;
    let started = web_time::Instant::now();

    let controller = AbortController::new()
        .map_err(|e| transport("failed to create abort controller", &e))?;

    let init = RequestInit::new();
    init.set_method("GET");
    init.set_mode(RequestMode::Cors);
    init.set_signal(Some(&controller.signal()));

    let request = Request::new_with_str_and_init(endpoint, &init)
        .map_err(|e| transport("failed to build request", &e))?;
    request
        .headers()
        .set("Accept", "application/json")
        .map_err(|e| transport("failed to set headers", &e))?;

    // Arm the timeout: fires once, aborts the in-flight request.
    let timed_out = Rc::new(Cell::new(false));
    let abort = {
        let controller = controller.clone();
        let timed_out = timed_out.clone();
        Closure::once(move || {
            timed_out.set(true);
            controller.abort();
        })
    };
    let timer = window
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            abort.as_ref().unchecked_ref(),
            FETCH_TIMEOUT_MS,
        )
        .map_err(|e| transport("failed to arm timeout", &e))?;

    let outcome = JsFuture::from(window.fetch_with_request(&request)).await;
    window.clear_timeout_with_handle(timer);
    drop(abort);

    let response = outcome.map_err(|e| {
        if timed_out.get() {
            ThemeError::Transport(format!("request timed out after {FETCH_TIMEOUT_MS}ms"))
        } else {
            transport("request failed", &e)
        }
    })?;
    let response: Response = response
        .dyn_into()
        .map_err(|_| ThemeError::Transport("fetch returned a non-Response value".to_string()))?;

    if !response.ok() {
        return Err(ThemeError::Transport(format!("HTTP {}", response.status())));
    }

    let body = JsFuture::from(
        response
            .text()
            .map_err(|e| transport("failed to read body", &e))?,
    )
    .await
    .map_err(|e| transport("failed to read body", &e))?
    .as_string()
    .ok_or_else(|| ThemeError::Transport("response body is not text".to_string()))?;

    if debug {
        log::debug!("palette fetch completed in {:?}", started.elapsed());
    }

    serde_json::from_str(&body)
        .map_err(|e| ThemeError::Validation(format!("body is not valid JSON: {e}")))
}

/// Resolve after `ms` milliseconds on the browser event loop.
async fn sleep_ms(ms: u64) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        if let Some(window) = web_sys::window() {
            let _ = window
                .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms as i32);
        }
    });
    let _ = JsFuture::from(promise).await;
}

/// Best-effort, one-way toggle notification.
///
/// `sendBeacon` first: it is never blocked by a CORS preflight and survives
/// navigation. If the beacon is refused, fall back to a fire-and-forget
/// no-cors POST whose response is opaque. Either way no acknowledgment can
/// be read back; delivery is send-without-ack by design.
pub fn send_toggle(window: &Window, endpoint: &str, client_id: &str) {
    let body = serde_json::json!({ "clientId": client_id }).to_string();

    match window.navigator().send_beacon_with_opt_str(endpoint, Some(&body)) {
        Ok(true) => {
            log::debug!("toggle dispatched via beacon");
            return;
        }
        Ok(false) => log::debug!("beacon refused, falling back to no-cors fetch"),
        Err(err) => log::debug!("beacon unavailable ({err:?}), falling back to no-cors fetch"),
    }

    let init = RequestInit::new();
    init.set_method("POST");
    init.set_mode(RequestMode::NoCors);
    init.set_body(&JsValue::from_str(&body));
    match Request::new_with_str_and_init(endpoint, &init) {
        Ok(request) => {
            // Fire and forget: the promise is dropped, not awaited.
            let _ = window.fetch_with_request(&request);
        }
        Err(err) => log::warn!("toggle notification could not be built: {err:?}"),
    }
}
